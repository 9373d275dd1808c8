pub mod error;
pub mod manager;
pub mod router;
pub mod routing_table;

pub use error::{ManagerError, RouteError};
pub use manager::NetworkManager;
pub use router::Router;
