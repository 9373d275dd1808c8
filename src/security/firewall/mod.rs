pub mod filter;
pub mod rules;

pub use filter::Firewall;
pub use rules::{FirewallRules, RejectReason, Verdict};
