pub mod config;
pub mod error;
pub mod inference;
pub mod llm;
pub mod server;
pub mod structuring;

pub use error::{Error, Result};
