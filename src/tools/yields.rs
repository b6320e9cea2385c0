use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::mcp::{Session, ToolClient};

const TOOL_NAME: &str = "get_yield_opportunities";

/// One ranked yield opportunity for a given deposit amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldOpportunity {
    pub protocol: String,
    pub apy: Decimal,
    pub risk_score: f64,
    pub estimated_monthly: f64,
}

pub struct YieldsTool {
    client: ToolClient,
}

impl YieldsTool {
    pub fn new(client: ToolClient) -> Self {
        YieldsTool { client }
    }

    /// Fetch yield opportunities for a wallet and a deposit amount.
    pub async fn opportunities(
        &self,
        session: &Session,
        wallet_address: &str,
        amount: f64,
    ) -> Result<Vec<YieldOpportunity>> {
        debug!(
            "Fetching yield opportunities for {} (amount {})",
            wallet_address, amount
        );

        self.client
            .call_tool(
                session,
                TOOL_NAME,
                json!({
                    "wallet_address": wallet_address,
                    "amount": amount,
                }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunities_deserialization() {
        let opportunities: Vec<YieldOpportunity> = serde_json::from_value(json!([
            {"protocol": "Aave", "apy": "3.2", "risk_score": 2.1, "estimated_monthly": 1330.0},
            {"protocol": "Uniswap", "apy": "7.1", "risk_score": 3.5, "estimated_monthly": 2950.0}
        ]))
        .unwrap();

        assert_eq!(opportunities.len(), 2);
        assert_eq!(opportunities[0].protocol, "Aave");
        assert_eq!(opportunities[1].apy, "7.1".parse::<Decimal>().unwrap());
    }
}
