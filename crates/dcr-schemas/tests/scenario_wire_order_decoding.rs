//! Scenario: decoding order documents from the JSON boundary
//!
//! # Invariants under test
//!
//! 1. `agentName` is accepted as an alias of `brokerName`.
//! 2. Amounts arrive as numbers or strings and are parsed exactly, digits
//!    beyond f64 precision included.
//! 3. Non-numeric amounts fail conversion with the order index attached.
//! 4. Timestamps are reduced to their calendar date.
//! 5. A lone paid or due amount is completed from the order total.

use dcr_revenue::Money;
use dcr_schemas::{orders_from_wire, WireOrder};

fn decode(json: &str) -> Vec<WireOrder> {
    serde_json::from_str(json).expect("orders json must decode")
}

#[test]
fn agent_name_maps_to_broker() {
    let orders = decode(r#"[{"amount": 1000, "agentName": "Rahim", "date": "2024-01-01"}]"#);
    let core = orders_from_wire(&orders).unwrap();
    assert_eq!(core[0].broker(), Some("Rahim"));
}

#[test]
fn amounts_as_numbers_or_strings() {
    let orders = decode(
        r#"[
            {"amount": 1000, "date": "2024-01-01"},
            {"amount": 12.5, "date": "2024-01-01"},
            {"amount": "99.99", "date": "2024-01-01"}
        ]"#,
    );
    let core = orders_from_wire(&orders).unwrap();
    assert_eq!(core[0].amount, Money::from_taka(1000));
    assert_eq!(core[1].amount, Money::from_minor(1250));
    assert_eq!(core[2].amount, Money::from_minor(9999));
}

#[test]
fn large_number_amounts_keep_every_digit() {
    let orders = decode(r#"[{"amount": 12345678901234567.89, "date": "2024-01-01"}]"#);
    let core = orders_from_wire(&orders).unwrap();
    assert_eq!(core[0].amount, Money::from_minor(1_234_567_890_123_456_789));
}

#[test]
fn exponent_amounts_are_rejected() {
    let orders = decode(r#"[{"amount": 1e3, "date": "2024-01-01"}]"#);
    let err = orders_from_wire(&orders).unwrap_err();
    assert_eq!(err.index, 0);
    assert!(err.source.is_invalid_amount());
}

#[test]
fn unparseable_amount_is_located() {
    let orders = decode(
        r#"[
            {"amount": 10, "date": "2024-01-01"},
            {"_id": "65a1", "amount": "NaN", "date": "2024-01-01"}
        ]"#,
    );
    let err = orders_from_wire(&orders).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.order_id.as_deref(), Some("65a1"));
    assert!(err.source.is_invalid_amount());
}

#[test]
fn timestamp_dates_keep_calendar_day() {
    let orders = decode(
        r#"[
            {"amount": 1, "date": "2024-03-05T18:45:00Z"},
            {"amount": 1, "date": "2024-03-06T08:00:00.000"}
        ]"#,
    );
    let core = orders_from_wire(&orders).unwrap();
    assert_eq!(core[0].date.to_string(), "2024-03-05");
    assert_eq!(core[1].date.to_string(), "2024-03-06");
}

#[test]
fn lone_paid_amount_derives_due() {
    let orders = decode(r#"[{"amount": 500, "paidAmount": 200, "date": "2024-01-01"}]"#);
    let core = orders_from_wire(&orders).unwrap();
    let p = core[0].payment.unwrap();
    assert_eq!(p.paid, Money::from_taka(200));
    assert_eq!(p.due, Money::from_taka(300));
}

#[test]
fn tests_are_parsed_with_prices() {
    let orders = decode(
        r#"[{"amount": 800, "date": "2024-01-01",
             "tests": [{"name": "CBC", "price": 300}, {"name": "X-Ray", "price": "500"}]}]"#,
    );
    let core = orders_from_wire(&orders).unwrap();
    assert_eq!(core[0].tests.len(), 2);
    assert!(core[0].validate().is_ok());
}
