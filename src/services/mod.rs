pub mod config;
pub mod log;
pub mod store;

pub use config::*;
pub use log::*;
pub use store::*;
