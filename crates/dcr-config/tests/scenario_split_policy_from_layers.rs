//! Scenario: the split policy is read from layered config
//!
//! GREEN when:
//! - No revenue section gives the 5% / 5% / no-redirect defaults.
//! - An overlay can switch on redirection of the unused doctor share.
//! - Rates summing past 100% are rejected at load time.

use dcr_config::{load_layered_yaml_from_strings, report_settings_from_config, split_policy_from_config};
use dcr_revenue::{compute_split, Money, SplitPolicy};

#[test]
fn defaults_without_revenue_section() {
    let loaded = load_layered_yaml_from_strings(&["report:\n  currency: BDT\n"]).unwrap();
    let policy = split_policy_from_config(&loaded.config_json).unwrap();
    assert_eq!(policy, SplitPolicy::default());
}

#[test]
fn overlay_enables_redirect() {
    let base = "revenue:\n  doctor_commission_bps: 500\n  broker_commission_bps: 500\n";
    let overlay = "revenue:\n  redirect_unused_doctor_share: true\n";
    let loaded = load_layered_yaml_from_strings(&[base, overlay]).unwrap();
    let policy = split_policy_from_config(&loaded.config_json).unwrap();
    assert!(policy.redirect_unused_doctor_share);

    let s = compute_split(Money::from_taka(1000), false, true, &policy).unwrap();
    assert_eq!(s.hospital, Money::from_taka(950));
    assert_eq!(s.unallocated, Money::ZERO);
}

#[test]
fn rates_over_100_percent_rejected() {
    let yaml = "revenue:\n  doctor_commission_bps: 6000\n  broker_commission_bps: 5000\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let err = split_policy_from_config(&loaded.config_json).unwrap_err();
    assert!(format!("{err:#}").contains("CONFIG_INVALID_POLICY"));
}

#[test]
fn report_settings_read_currency_and_sort() {
    let yaml = "report:\n  currency: Taka\n  sort: revenue_desc\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let s = report_settings_from_config(&loaded.config_json).unwrap();
    assert_eq!(s.currency, "Taka");
    assert_eq!(s.sort.as_deref(), Some("revenue_desc"));
}
