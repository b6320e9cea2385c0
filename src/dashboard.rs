//! Presentational state behind the dashboard: wallet input, quick-pick
//! selection, one in-flight operation flag, one error line and four
//! independently replaced result buffers.

use tracing::warn;

use crate::error::Result;
use crate::mcp::{Session, ToolClient};
use crate::tokens::TokenRegistry;
use crate::tools::portfolio::PortfolioSummary;
use crate::tools::positions::DefiPositions;
use crate::tools::prices::TokenPrices;
use crate::tools::yields::YieldOpportunity;
use crate::tools::{PortfolioTool, PositionsTool, PricesTool, YieldsTool};

/// Deposit amount used when ranking yield opportunities.
pub const DEFAULT_YIELD_AMOUNT: f64 = 1000.0;

/// Which of the four fetch operations is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Portfolio,
    Positions,
    Yields,
    Prices,
}

pub struct Dashboard {
    client: ToolClient,
    portfolio_tool: PortfolioTool,
    positions_tool: PositionsTool,
    yields_tool: YieldsTool,
    prices_tool: PricesTool,
    registry: TokenRegistry,
    session: Option<Session>,

    pub wallets: String,
    pub selected: Vec<String>,
    pub loading: Option<Operation>,
    pub error: Option<String>,
    pub portfolio: Option<PortfolioSummary>,
    pub positions: Option<DefiPositions>,
    pub yields: Option<Vec<YieldOpportunity>>,
    pub prices: Option<TokenPrices>,
}

impl Dashboard {
    pub fn new(client: ToolClient) -> Self {
        Dashboard {
            portfolio_tool: PortfolioTool::new(client.clone()),
            positions_tool: PositionsTool::new(client.clone()),
            yields_tool: YieldsTool::new(client.clone()),
            prices_tool: PricesTool::new(client.clone()),
            client,
            registry: TokenRegistry::new(),
            session: None,
            wallets: String::new(),
            selected: Vec::new(),
            loading: None,
            error: None,
            portfolio: None,
            positions: None,
            yields: None,
            prices: None,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Comma-separated wallet input, trimmed, empties dropped.
    pub fn wallet_addresses(&self) -> Vec<String> {
        self.wallets
            .split(',')
            .map(str::trim)
            .filter(|wallet| !wallet.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn first_wallet(&self) -> Option<String> {
        self.wallet_addresses().into_iter().next()
    }

    /// Free-text wallet input; editing it clears the quick-pick selection.
    pub fn set_wallets(&mut self, value: impl Into<String>) {
        self.wallets = value.into();
        self.selected.clear();
    }

    /// Toggle a quick-pick address; the text input tracks the selection.
    pub fn toggle_address(&mut self, address: &str) {
        if let Some(index) = self.selected.iter().position(|a| a == address) {
            self.selected.remove(index);
        } else {
            self.selected.push(address.to_owned());
        }
        self.wallets = self.selected.join(", ");
    }

    /// Establish the tool session on first use; at most one per dashboard.
    async fn ensure_session(&mut self) -> Result<Session> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }

        let session = self.client.initialize().await?;
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Fetch the portfolio summary for every entered wallet. A no-op when
    /// the wallet input is empty.
    pub async fn fetch_portfolio(&mut self) {
        let addresses = self.wallet_addresses();
        if addresses.is_empty() {
            return;
        }

        self.loading = Some(Operation::Portfolio);
        self.error = None;

        match self.request_portfolio(&addresses).await {
            Ok(summary) => self.portfolio = Some(summary),
            Err(e) => self.record_error(Operation::Portfolio, e),
        }

        self.loading = None;
    }

    async fn request_portfolio(&mut self, addresses: &[String]) -> Result<PortfolioSummary> {
        let session = self.ensure_session().await?;
        self.portfolio_tool.summary(&session, addresses).await
    }

    /// Fetch the DeFi positions of the first entered wallet. A no-op when
    /// the wallet input is empty.
    pub async fn fetch_positions(&mut self) {
        let Some(wallet) = self.first_wallet() else {
            return;
        };

        self.loading = Some(Operation::Positions);
        self.error = None;

        match self.request_positions(&wallet).await {
            Ok(positions) => self.positions = Some(positions),
            Err(e) => self.record_error(Operation::Positions, e),
        }

        self.loading = None;
    }

    async fn request_positions(&mut self, wallet: &str) -> Result<DefiPositions> {
        let session = self.ensure_session().await?;
        self.positions_tool.positions(&session, wallet).await
    }

    /// Fetch yield opportunities for the first entered wallet. A no-op when
    /// the wallet input is empty.
    pub async fn fetch_yields(&mut self) {
        let Some(wallet) = self.first_wallet() else {
            return;
        };

        self.loading = Some(Operation::Yields);
        self.error = None;

        match self.request_yields(&wallet).await {
            Ok(yields) => self.yields = Some(yields),
            Err(e) => self.record_error(Operation::Yields, e),
        }

        self.loading = None;
    }

    async fn request_yields(&mut self, wallet: &str) -> Result<Vec<YieldOpportunity>> {
        let session = self.ensure_session().await?;
        self.yields_tool
            .opportunities(&session, wallet, DEFAULT_YIELD_AMOUNT)
            .await
    }

    /// Fetch current quotes for the registry's default token set. No wallet
    /// precondition.
    pub async fn fetch_prices(&mut self) {
        self.loading = Some(Operation::Prices);
        self.error = None;

        match self.request_prices().await {
            Ok(prices) => self.prices = Some(prices),
            Err(e) => self.record_error(Operation::Prices, e),
        }

        self.loading = None;
    }

    async fn request_prices(&mut self) -> Result<TokenPrices> {
        let session = self.ensure_session().await?;
        let tokens = self.registry.price_tokens();
        self.prices_tool.prices(&session, &tokens).await
    }

    /// A failed fetch sets the error line and leaves the previous buffer
    /// contents untouched.
    fn record_error(&mut self, operation: Operation, error: crate::error::DashboardError) {
        warn!("Fetch failed ({:?}): {}", operation, error);
        self.error = Some(error.to_string());
    }
}
