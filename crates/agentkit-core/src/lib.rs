pub mod agent;
pub mod catalog;
pub mod compose;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod types;

pub use error::{AgentkitError, Result};
