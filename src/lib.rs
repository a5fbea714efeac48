#![doc = include_str!("../README.md")]

pub mod config;
pub mod engine;
pub mod error;
pub mod macros;
pub mod selectors;
pub mod server;
pub mod tools;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use engine::{extract_product, Extraction};
pub use error::{ProdexError, Result};
pub use types::*;
