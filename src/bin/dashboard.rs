use std::io::{self, Write};

use defi_dashboard::dashboard::Dashboard;
use defi_dashboard::precision;
use defi_dashboard::ToolClient;

/// Well-known mainnet wallets offered as quick picks.
const DEMO_ADDRESSES: [&str; 3] = [
    "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
    "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B",
    "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
];

#[tokio::main]
async fn main() -> eyre::Result<()> {
    println!("╔═══════════════════════════════════════════════════════╗");
    println!("║   DeFi Dashboard - Terminal Client v1.0              ║");
    println!("╚═══════════════════════════════════════════════════════╝\n");

    let gateway_url = std::env::var("GATEWAY_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000/api/mcp-proxy".to_string());
    println!("Gateway endpoint: {}\n", gateway_url);

    let client = ToolClient::new(gateway_url)?;
    let mut dashboard = Dashboard::new(client);

    loop {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║ Available Commands:                                  ║");
        println!("║ 1. wallets     - Enter wallet address(es)           ║");
        println!("║ 2. pick        - Toggle a demo address              ║");
        println!("║ 3. portfolio   - Portfolio summary                  ║");
        println!("║ 4. positions   - DeFi positions                     ║");
        println!("║ 5. yields      - Yield opportunities                ║");
        println!("║ 6. prices      - Token prices                       ║");
        println!("║ 7. exit        - Quit                               ║");
        println!("╚═══════════════════════════════════════════════════════╝");
        println!("Wallets: {}", display_or(&dashboard.wallets, "<none>"));

        let choice = prompt("\nEnter command number (1-7): ")?;

        match choice.as_str() {
            "1" => {
                let input = prompt("Enter wallet address(es), comma separated: ")?;
                dashboard.set_wallets(input);
            }
            "2" => {
                toggle_demo_address(&mut dashboard)?;
            }
            "3" => {
                dashboard.fetch_portfolio().await;
                render_portfolio(&dashboard);
            }
            "4" => {
                dashboard.fetch_positions().await;
                render_positions(&dashboard);
            }
            "5" => {
                dashboard.fetch_yields().await;
                render_yields(&dashboard);
            }
            "6" => {
                dashboard.fetch_prices().await;
                render_prices(&dashboard);
            }
            "7" => {
                println!("\nGoodbye!");
                break;
            }
            _ => println!("Invalid choice. Please enter 1-7."),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn toggle_demo_address(dashboard: &mut Dashboard) -> io::Result<()> {
    println!();
    for (index, address) in DEMO_ADDRESSES.iter().enumerate() {
        let mark = if dashboard.selected.iter().any(|a| a == address) {
            "x"
        } else {
            " "
        };
        println!("  {}. [{}] {}", index + 1, mark, address);
    }

    let choice = prompt("Toggle which address (1-3)? ")?;
    match choice.parse::<usize>() {
        Ok(index) if (1..=DEMO_ADDRESSES.len()).contains(&index) => {
            dashboard.toggle_address(DEMO_ADDRESSES[index - 1]);
        }
        _ => println!("Invalid choice."),
    }

    Ok(())
}

fn render_error(dashboard: &Dashboard) {
    if let Some(error) = &dashboard.error {
        println!("\n⚠️  Error: {}", error);
    }
}

fn render_portfolio(dashboard: &Dashboard) {
    render_error(dashboard);

    println!("\n── Portfolio Summary ──────────────────────────────────");
    let Some(portfolio) = &dashboard.portfolio else {
        println!("No data");
        return;
    };

    println!(
        "Total Value: {}",
        precision::format_usd(&portfolio.total_portfolio_value)
    );
    println!(
        "{:<44} {:<10} {:<34} {:>12}",
        "Wallet", "Chain", "Balances", "USD Value"
    );

    for position in &portfolio.positions {
        for (chain, balances) in &position.balances {
            let balance_list = balances
                .iter()
                .map(|(token, amount)| format!("{}: {}", token, amount))
                .collect::<Vec<_>>()
                .join("  ");

            println!(
                "{:<44} {:<10} {:<34} {:>12}",
                position.address,
                chain,
                balance_list,
                precision::format_usd(&position.usd_value)
            );
        }
    }

    println!("Chains: {}", portfolio.chains.join(", "));
}

fn render_positions(dashboard: &Dashboard) {
    render_error(dashboard);

    println!("\n── DeFi Positions ─────────────────────────────────────");
    let Some(positions) = &dashboard.positions else {
        println!("No data");
        return;
    };

    println!(
        "{} position(s) across: {}",
        positions.total_positions,
        positions.protocols.join(", ")
    );
    println!(
        "{:<12} {:<10} {:<14} {:<24} {:>8}",
        "Protocol", "Type", "Asset/Pair", "Amount", "APY"
    );

    for position in &positions.positions {
        println!(
            "{:<12} {:<10} {:<14} {:<24} {:>8}",
            position.protocol,
            position.kind,
            position.instrument(),
            position.amount,
            precision::format_percent(&position.apy)
        );
    }
}

fn render_yields(dashboard: &Dashboard) {
    render_error(dashboard);

    println!("\n── Yield Opportunities ────────────────────────────────");
    let Some(yields) = &dashboard.yields else {
        println!("No data");
        return;
    };

    println!(
        "{:<12} {:>8} {:>6} {:>14}",
        "Protocol", "APY", "Risk", "Est. Monthly"
    );

    for opportunity in yields {
        println!(
            "{:<12} {:>8} {:>6.1} {:>14}",
            opportunity.protocol,
            precision::format_percent(&opportunity.apy),
            opportunity.risk_score,
            format!("${:.2}", opportunity.estimated_monthly)
        );
    }
}

fn render_prices(dashboard: &Dashboard) {
    render_error(dashboard);

    println!("\n── Token Prices ───────────────────────────────────────");
    let Some(prices) = &dashboard.prices else {
        println!("No data");
        return;
    };

    for (token, price) in prices {
        println!("{:<8} ${}", token, price.usd);
    }
}
