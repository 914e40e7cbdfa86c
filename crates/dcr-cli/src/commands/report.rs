//! `dcr report`: load orders, filter, aggregate, emit the JSON report.

use anyhow::{Context, Result};
use dcr_revenue::{aggregate, validate_orders, OrderFilter};
use dcr_schemas::{SortOrder, WireReport};
use tracing::info;

use super::{orders, OrderFormat};

pub struct ReportArgs {
    pub orders_path: String,
    pub format: Option<OrderFormat>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub doctor_name: Option<String>,
    pub sort: Option<String>,
    pub config_paths: Vec<String>,
    pub strict_config: bool,
    pub out: Option<String>,
}

pub fn run(args: ReportArgs) -> Result<()> {
    let loaded = super::load_config(&args.config_paths, args.strict_config)?;
    let policy = dcr_config::split_policy_from_config(&loaded.config_json)?;
    let settings = dcr_config::report_settings_from_config(&loaded.config_json)?;

    // --sort overrides /report/sort.
    let sort: SortOrder = match args.sort.as_deref().or(settings.sort.as_deref()) {
        Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
        None => SortOrder::default(),
    };

    let filter = OrderFilter {
        from: args
            .from
            .as_deref()
            .map(|s| super::parse_date_flag("from", s))
            .transpose()?,
        to: args
            .to
            .as_deref()
            .map(|s| super::parse_date_flag("to", s))
            .transpose()?,
        doctor_name: args.doctor_name,
    };
    filter.validate().context("--from/--to")?;

    let format = orders::detect_format(&args.orders_path, args.format);
    let all = orders::load_orders(&args.orders_path, format)?;
    validate_orders(&all).with_context(|| format!("orders file rejected: {}", args.orders_path))?;

    let mut report = aggregate(filter.apply(&all), &policy).context("aggregate orders failed")?;
    if sort == SortOrder::RevenueDesc {
        report.sort_by_revenue_desc();
    }

    info!(
        loaded = all.len(),
        counted = report.order_count,
        total = %report.total_revenue,
        unallocated = %report.unallocated_revenue,
        sort = sort.as_str(),
        "report aggregated"
    );

    let wire = WireReport::new(&report, settings.currency);
    let json = serde_json::to_string_pretty(&wire).context("serialize report json failed")?;
    super::emit_json(&json, args.out.as_deref())
}
