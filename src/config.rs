use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub upstream_url: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let upstream_url = env::var("UPSTREAM_MCP_URL")
            .map_err(|_| DashboardError::ConfigError("UPSTREAM_MCP_URL not set".to_string()))?;

        upstream_url.parse::<url::Url>().map_err(|e| {
            DashboardError::ConfigError(format!("Invalid UPSTREAM_MCP_URL: {}", e))
        })?;

        let bind_addr =
            env::var("GATEWAY_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        Ok(Config {
            upstream_url,
            bind_addr,
        })
    }

    pub fn from_url(upstream_url: String) -> Self {
        Config {
            upstream_url,
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_url() {
        let config = Config::from_url("http://localhost:8000/mcp/".to_string());
        assert_eq!(config.upstream_url, "http://localhost:8000/mcp/");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }
}
