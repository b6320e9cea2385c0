use std::collections::BTreeMap;

/// Chains the dashboard understands and the token symbols tracked on each.
pub struct TokenRegistry {
    chains: BTreeMap<String, ChainTokens>,
}

/// Native symbol plus the token set tracked on one chain.
#[derive(Debug, Clone)]
pub struct ChainTokens {
    pub native: String,
    pub tokens: Vec<String>,
}

impl TokenRegistry {
    /// Create a registry covering the chains the upstream server aggregates.
    pub fn new() -> Self {
        let mut chains = BTreeMap::new();

        let entries = [
            ("ethereum", "ETH", &["ETH", "USDC"][..]),
            ("polygon", "MATIC", &["MATIC", "USDC"][..]),
            ("base", "ETH", &["ETH", "USDC"][..]),
            ("arbitrum", "ETH", &["ETH", "USDC"][..]),
        ];

        for (chain, native, tokens) in entries {
            chains.insert(
                chain.to_string(),
                ChainTokens {
                    native: native.to_string(),
                    tokens: tokens.iter().map(|t| t.to_string()).collect(),
                },
            );
        }

        TokenRegistry { chains }
    }

    pub fn is_supported(&self, chain: &str) -> bool {
        self.chains.contains_key(&chain.to_lowercase())
    }

    /// Native symbol for a chain
    pub fn native_symbol(&self, chain: &str) -> Option<&str> {
        self.chains
            .get(&chain.to_lowercase())
            .map(|entry| entry.native.as_str())
    }

    /// Register an additional chain
    pub fn register(&mut self, chain: String, entry: ChainTokens) {
        self.chains.insert(chain.to_lowercase(), entry);
    }

    /// All supported chain identifiers
    pub fn chains(&self) -> Vec<String> {
        self.chains.keys().cloned().collect()
    }

    /// Union of tracked tokens across chains, used as the default set for
    /// price queries.
    pub fn price_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        for entry in self.chains.values() {
            for token in &entry.tokens {
                if !tokens.contains(token) {
                    tokens.push(token.clone());
                }
            }
        }
        tokens
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}
