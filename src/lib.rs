#![doc = include_str!("../README.md")]

pub mod api;
pub mod cli;
pub mod error;
pub mod services;
pub mod templates;
pub mod tools;
pub mod types;


pub use api::*;
pub use error::*;
pub use types::*;
