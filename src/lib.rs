pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod security;
pub mod setup_logger;
