use rust_decimal::{Decimal, RoundingStrategy};

/// Format a USD amount with two fraction digits, rounding half away from
/// zero the way quote feeds display cents.
///
/// # Examples
/// ```ignore
/// let value = "1250".parse::<Decimal>()?;
/// assert_eq!(format_usd(&value), "$1250.00");
/// ```
pub fn format_usd(value: &Decimal) -> String {
    let cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", cents)
}

/// Format an APY-style percentage, trailing zeros stripped.
pub fn format_percent(value: &Decimal) -> String {
    format!("{}%", value.normalize())
}
