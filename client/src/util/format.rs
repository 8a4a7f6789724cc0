//! Display formatting for plans and prices.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use crate::net::types::Plan;

/// Marketing tier, derived from a plan's price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanTier {
    Basic,
    Pro,
    Enterprise,
}

/// Highest monthly amount (minor units) still sold as `Pro`.
const PRO_MAX_AMOUNT: i64 = 2_900;

impl PlanTier {
    #[must_use]
    pub fn for_amount(amount: i64) -> Self {
        match amount {
            0 => Self::Basic,
            a if a <= PRO_MAX_AMOUNT => Self::Pro,
            _ => Self::Enterprise,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
        }
    }

    #[must_use]
    pub fn features(self) -> &'static [&'static str] {
        match self {
            Self::Basic => &[
                "Basic analytics dashboard",
                "Limited data visualizations",
                "Standard support",
                "Up to 5 projects",
            ],
            Self::Pro => &[
                "Advanced analytics dashboard",
                "Full data visualizations",
                "Heat map visualization",
                "Advanced filters",
                "Priority support",
                "Up to 20 projects",
            ],
            Self::Enterprise => &[
                "Custom analytics dashboard",
                "Unlimited data visualizations",
                "Heat map visualization",
                "Advanced filters",
                "Team collaboration",
                "Dedicated support",
                "Unlimited projects",
            ],
        }
    }
}

/// "Monthly" for single-interval plans, else "Every {n} {interval}s".
#[must_use]
pub fn plan_cadence(plan: &Plan) -> String {
    if plan.interval_count == 1 {
        "Monthly".to_owned()
    } else {
        format!("Every {} {}s", plan.interval_count, plan.interval)
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_lowercase().as_str() {
        "usd" | "cad" | "aud" | "nzd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        "jpy" => Some("¥"),
        "inr" => Some("₹"),
        _ => None,
    }
}

/// Format minor units as a price, dropping fraction digits when whole.
///
/// Unknown currencies fall back to an uppercase code prefix (`CHF 12`).
#[must_use]
pub fn format_price(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let (major, minor) = (abs / 100, abs % 100);
    let number = if minor == 0 { group_thousands(major) } else { format!("{}.{minor:02}", group_thousands(major)) };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{} {number}", currency.to_ascii_uppercase()),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
