//! Axum router and all HTTP handlers for dcr-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Tests in `tests/` drive the bare router.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dcr_revenue::{aggregate, compute_split, validate_orders, OrderFilter};
use dcr_schemas::{ErrorResponse, ReportRequest, SplitRequest, WireReport, WireSplit};
use tracing::{debug, info, warn};

use crate::{api_types::HealthResponse, state::AppState};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/revenue/split", post(revenue_split))
        .route("/v1/revenue/report", post(revenue_report))
        .with_state(state)
}

/// 422 with a JSON error body.
fn unprocessable(body: ErrorResponse) -> Response {
    warn!(code = %body.code, index = ?body.order_index, "request rejected: {}", body.error);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
            config_hash: st.config_hash.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /v1/revenue/split
// ---------------------------------------------------------------------------

pub(crate) async fn revenue_split(
    State(st): State<Arc<AppState>>,
    Json(req): Json<SplitRequest>,
) -> Response {
    let amount = match req.amount.parse() {
        Ok(a) => a,
        Err(e) => return unprocessable((&e).into()),
    };
    match compute_split(amount, req.has_doctor, req.has_broker, &st.policy) {
        Ok(split) => {
            debug!(%amount, doctor = req.has_doctor, broker = req.has_broker, "revenue/split");
            (StatusCode::OK, Json(WireSplit::new(amount, &split))).into_response()
        }
        Err(e) => unprocessable((&e).into()),
    }
}

// ---------------------------------------------------------------------------
// POST /v1/revenue/report
// ---------------------------------------------------------------------------

/// Aggregate the posted orders.
///
/// Every order is converted and validated before the filter runs, so an
/// invalid order fails the request even if the filter would drop it, and
/// `orderIndex` always points into the posted array.
pub(crate) async fn revenue_report(
    State(st): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> Response {
    let filter: OrderFilter = req.filter.into();
    if let Err(e) = filter.validate() {
        return unprocessable((&e).into());
    }

    let orders = match dcr_schemas::orders_from_wire(&req.orders) {
        Ok(o) => o,
        Err(e) => return unprocessable((&e).into()),
    };
    if let Err(e) = validate_orders(&orders) {
        return unprocessable((&e).into());
    }

    let mut report = match aggregate(filter.apply(&orders), &st.policy) {
        Ok(r) => r,
        Err(e) => return unprocessable((&e).into()),
    };

    let sort = req.sort.unwrap_or(st.default_sort);
    if sort == dcr_schemas::SortOrder::RevenueDesc {
        report.sort_by_revenue_desc();
    }

    info!(
        posted = orders.len(),
        counted = report.order_count,
        total = %report.total_revenue,
        unallocated = %report.unallocated_revenue,
        sort = sort.as_str(),
        "revenue/report"
    );

    (
        StatusCode::OK,
        Json(WireReport::new(&report, st.currency.clone())),
    )
        .into_response()
}
