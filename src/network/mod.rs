pub mod dns;
pub mod packet;
pub mod server;

pub use dns::DnsResolver;
pub use packet::Packet;
pub use server::Server;
