use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::mcp::{Session, ToolClient};

const TOOL_NAME: &str = "get_token_prices";

/// Current quotes keyed by token symbol.
pub type TokenPrices = BTreeMap<String, TokenPrice>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrice {
    pub usd: f64,
}

pub struct PricesTool {
    client: ToolClient,
}

impl PricesTool {
    pub fn new(client: ToolClient) -> Self {
        PricesTool { client }
    }

    /// Fetch current USD quotes for a set of token symbols.
    pub async fn prices(&self, session: &Session, tokens: &[String]) -> Result<TokenPrices> {
        debug!("Fetching prices for {} token(s)", tokens.len());

        self.client
            .call_tool(session, TOOL_NAME, json!({ "tokens": tokens }))
            .await
    }
}
