use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::mcp::{Session, ToolClient};

const TOOL_NAME: &str = "get_defi_positions";

/// Detailed protocol positions held by one wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefiPositions {
    pub total_positions: u32,
    pub protocols: Vec<String>,
    pub positions: Vec<DefiPosition>,
}

/// A single lending or liquidity position. Lending positions carry an
/// `asset` label, LP positions a `pair` label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefiPosition {
    pub protocol: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    pub amount: String,
    pub apy: Decimal,
}

impl DefiPosition {
    /// Asset or pair label, whichever the protocol reported.
    pub fn instrument(&self) -> &str {
        self.asset
            .as_deref()
            .or(self.pair.as_deref())
            .unwrap_or("-")
    }
}

pub struct PositionsTool {
    client: ToolClient,
}

impl PositionsTool {
    pub fn new(client: ToolClient) -> Self {
        PositionsTool { client }
    }

    /// Fetch the DeFi positions held by a single wallet.
    pub async fn positions(
        &self,
        session: &Session,
        wallet_address: &str,
    ) -> Result<DefiPositions> {
        debug!("Fetching DeFi positions for {}", wallet_address);

        self.client
            .call_tool(
                session,
                TOOL_NAME,
                json!({ "wallet_address": wallet_address }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_deserialization() {
        let positions: DefiPositions = serde_json::from_value(json!({
            "total_positions": 2,
            "protocols": ["Aave", "Uniswap"],
            "positions": [
                {
                    "protocol": "Aave",
                    "type": "lending",
                    "asset": "USDC",
                    "amount": "500.0",
                    "apy": "3.2"
                },
                {
                    "protocol": "Uniswap",
                    "type": "lp",
                    "pair": "ETH/USDC",
                    "amount": "1.0 ETH + 1800 USDC",
                    "apy": "7.1"
                }
            ]
        }))
        .unwrap();

        assert_eq!(positions.total_positions, 2);
        assert_eq!(positions.positions[0].instrument(), "USDC");
        assert_eq!(positions.positions[1].instrument(), "ETH/USDC");
        assert_eq!(positions.positions[1].kind, "lp");
    }

    #[test]
    fn test_instrument_without_labels() {
        let position = DefiPosition {
            protocol: "Aave".to_string(),
            kind: "lending".to_string(),
            asset: None,
            pair: None,
            amount: "0".to_string(),
            apy: Decimal::ZERO,
        };

        assert_eq!(position.instrument(), "-");
    }
}
