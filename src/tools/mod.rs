// Modular tools
pub mod artifact;
pub mod batch;
pub mod compare;
pub mod extract;
pub mod server;
