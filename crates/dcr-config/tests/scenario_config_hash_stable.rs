//! Scenario: config hash stability
//!
//! GREEN when:
//! - Loading the same YAML twice yields the same hash.
//! - Reordering keys within YAML doesn't change the hash.
//! - Different values produce different hashes.
//! - Overlay layers take effect and hash deterministically.

use dcr_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
revenue:
  doctor_commission_bps: 500
  broker_commission_bps: 500
  redirect_unused_doctor_share: false
report:
  currency: "BDT"
  sort: "insertion"
"#;

const BASE_YAML_REORDERED: &str = r#"
report:
  sort: "insertion"
  currency: "BDT"
revenue:
  redirect_unused_doctor_share: false
  broker_commission_bps: 500
  doctor_commission_bps: 500
"#;

const OVERLAY_YAML: &str = r#"
revenue:
  redirect_unused_doctor_share: true
report:
  sort: "revenue_desc"
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(
        a.config_hash, b.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_base_and_keeps_siblings() {
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    let v = &merged.config_json;

    assert_eq!(
        v.pointer("/revenue/redirect_unused_doctor_share"),
        Some(&serde_json::json!(true))
    );
    assert_eq!(
        v.pointer("/revenue/doctor_commission_bps"),
        Some(&serde_json::json!(500)),
        "keys absent from the overlay survive the merge"
    );
    assert_eq!(v.pointer("/report/sort"), Some(&serde_json::json!("revenue_desc")));
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}
