pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod mcp;
pub mod precision;
pub mod tokens;
pub mod tools;

pub use config::Config;
pub use error::{DashboardError, Result};
pub use mcp::{Session, ToolClient};
