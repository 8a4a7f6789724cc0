use super::*;

fn plan(amount: i64, interval: &str, interval_count: u32) -> Plan {
    Plan {
        id: "price_1".to_owned(),
        amount,
        currency: "usd".to_owned(),
        interval: interval.to_owned(),
        interval_count,
        active: true,
    }
}

#[test]
fn tier_boundaries() {
    assert_eq!(PlanTier::for_amount(0), PlanTier::Basic);
    assert_eq!(PlanTier::for_amount(1), PlanTier::Pro);
    assert_eq!(PlanTier::for_amount(2900), PlanTier::Pro);
    assert_eq!(PlanTier::for_amount(2901), PlanTier::Enterprise);
}

#[test]
fn tier_features_differ_by_tier() {
    assert_eq!(PlanTier::Basic.features().len(), 4);
    assert!(PlanTier::Pro.features().contains(&"Heat map visualization"));
    assert!(PlanTier::Enterprise.features().contains(&"Team collaboration"));
    assert!(!PlanTier::Pro.features().contains(&"Team collaboration"));
}

#[test]
fn cadence_single_interval_is_monthly() {
    assert_eq!(plan_cadence(&plan(2900, "month", 1)), "Monthly");
}

#[test]
fn cadence_multi_interval_is_spelled_out() {
    assert_eq!(plan_cadence(&plan(9900, "month", 3)), "Every 3 months");
    assert_eq!(plan_cadence(&plan(9900, "week", 2)), "Every 2 weeks");
}

#[test]
fn price_drops_fraction_when_whole() {
    assert_eq!(format_price(2900, "usd"), "$29");
    assert_eq!(format_price(0, "USD"), "$0");
}

#[test]
fn price_keeps_cents_when_fractional() {
    assert_eq!(format_price(2999, "usd"), "$29.99");
    assert_eq!(format_price(1005, "eur"), "€10.05");
}

#[test]
fn price_groups_thousands() {
    assert_eq!(format_price(123_456_700, "gbp"), "£1,234,567");
}

#[test]
fn price_unknown_currency_uses_code() {
    assert_eq!(format_price(1200, "chf"), "CHF 12");
}

#[test]
fn price_negative_amount() {
    assert_eq!(format_price(-500, "usd"), "-$5");
}
