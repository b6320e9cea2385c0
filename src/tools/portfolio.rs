use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::mcp::{Session, ToolClient};

const TOOL_NAME: &str = "get_portfolio_summary";

/// Balances aggregated across all supported chains for a set of wallets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_portfolio_value: Decimal,
    pub positions: Vec<PortfolioPosition>,
    pub chains: Vec<String>,
}

/// One wallet's balances, keyed chain -> token -> amount string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub address: String,
    pub balances: BTreeMap<String, BTreeMap<String, String>>,
    pub usd_value: Decimal,
}

pub struct PortfolioTool {
    client: ToolClient,
}

impl PortfolioTool {
    pub fn new(client: ToolClient) -> Self {
        PortfolioTool { client }
    }

    /// Fetch the aggregated portfolio summary for the given wallets.
    pub async fn summary(
        &self,
        session: &Session,
        wallet_addresses: &[String],
    ) -> Result<PortfolioSummary> {
        debug!(
            "Fetching portfolio summary for {} wallet(s)",
            wallet_addresses.len()
        );

        self.client
            .call_tool(
                session,
                TOOL_NAME,
                json!({ "wallet_addresses": wallet_addresses }),
            )
            .await
    }
}
