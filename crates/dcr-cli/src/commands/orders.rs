//! Order file loading (JSON array or CSV).

use anyhow::{Context, Result};
use dcr_revenue::Order;
use dcr_schemas::{parse_order_date, RawAmount, WireOrder};
use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;

use super::OrderFormat;

/// One CSV row. Empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct CsvOrderRow {
    #[serde(default)]
    id: Option<String>,
    date: String,
    amount: String,
    #[serde(default)]
    doctor_name: Option<String>,
    #[serde(default, alias = "agent_name")]
    broker_name: Option<String>,
    #[serde(default)]
    paid_amount: Option<String>,
    #[serde(default)]
    due_amount: Option<String>,
}

impl CsvOrderRow {
    fn into_wire(self, row_no: usize) -> Result<WireOrder> {
        let date = parse_order_date(&self.date)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("csv row {row_no}: bad date"))?;
        Ok(WireOrder {
            id: self.id,
            amount: RawAmount(self.amount),
            doctor_name: self.doctor_name,
            broker_name: self.broker_name,
            date,
            tests: Vec::new(),
            paid_amount: self.paid_amount.map(RawAmount),
            due_amount: self.due_amount.map(RawAmount),
        })
    }
}

/// `--format` wins; otherwise `.csv` means CSV and anything else JSON.
pub fn detect_format(path: &str, explicit: Option<OrderFormat>) -> OrderFormat {
    if let Some(f) = explicit {
        return f;
    }
    match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => OrderFormat::Csv,
        _ => OrderFormat::Json,
    }
}

pub fn load_wire_orders(path: &str, format: OrderFormat) -> Result<Vec<WireOrder>> {
    match format {
        OrderFormat::Json => {
            let s = fs::read_to_string(path).with_context(|| format!("read orders: {path}"))?;
            let orders: Vec<WireOrder> =
                serde_json::from_str(&s).with_context(|| format!("parse orders json: {path}"))?;
            Ok(orders)
        }
        OrderFormat::Csv => {
            let file = File::open(path).with_context(|| format!("open orders csv: {path}"))?;
            let mut rdr = csv::Reader::from_reader(file);
            let mut out = Vec::new();
            for (i, rec) in rdr.deserialize::<CsvOrderRow>().enumerate() {
                // 1-based data row number, header excluded.
                let row_no = i + 1;
                let row = rec.with_context(|| format!("csv row {row_no}: malformed"))?;
                out.push(row.into_wire(row_no)?);
            }
            Ok(out)
        }
    }
}

/// Load and convert to core orders. Amount errors name the order index/id.
pub fn load_orders(path: &str, format: OrderFormat) -> Result<Vec<Order>> {
    let wire = load_wire_orders(path, format)?;
    let orders = dcr_schemas::orders_from_wire(&wire)
        .with_context(|| format!("orders file rejected: {path}"))?;
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension_unless_explicit() {
        assert_eq!(detect_format("a/b/orders.csv", None), OrderFormat::Csv);
        assert_eq!(detect_format("orders.CSV", None), OrderFormat::Csv);
        assert_eq!(detect_format("orders.json", None), OrderFormat::Json);
        assert_eq!(detect_format("orders", None), OrderFormat::Json);
        assert_eq!(
            detect_format("orders.json", Some(OrderFormat::Csv)),
            OrderFormat::Csv
        );
    }
}
