//! HTTP handlers for the loan servicing API.
//!
//! Mutating handlers hold the store lock for the whole mutator call,
//! including both recompute passes, so a recompute appears atomic to
//! observers and mutations against the same loan are serialized. The loan
//! is persisted only after the mutator succeeded; a validation error
//! leaves the stored state untouched.

use axum::{
    extract::{Path, State},
    Json,
};

use loan_servicing_core::{
    apply_nsf, now_iso, post_payment, recompute_schedule, report_line, resolve_arrears,
    retry_line, seed_loan, InMemoryStore, Loan, LoanStore,
};

use crate::error::ApiResult;
use crate::models::{
    HealthResponse, NsfRequest, NsfResponse, PostRequest, ReportRequest, ResolveArrearsRequest,
    RetryRequest,
};
use crate::SharedStore;

fn load_or_seed(store: &mut InMemoryStore, id: &str) -> Loan {
    store.get(id).unwrap_or_else(|| seed_loan(id))
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: now_iso(),
    })
}

/// GET /api/loans/{id}
pub async fn get_loan(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    recompute_schedule(&mut loan);
    store.put(loan.clone());
    Ok(Json(loan))
}

/// POST /api/loans/{id}/reset
pub async fn reset_loan(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    store.delete(&id);
    let loan = seed_loan(&id);
    store.put(loan.clone());
    tracing::info!(loan = %id, "loan reset");
    Ok(Json(loan))
}

/// POST /api/loans/{id}/actions/nsf
pub async fn nsf_action(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<NsfRequest>,
) -> ApiResult<Json<NsfResponse>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    let arrears_id = apply_nsf(&mut loan, req.selected_line, req.fee)?;
    store.put(loan.clone());
    tracing::info!(loan = %id, line = req.selected_line, arrears = %arrears_id, "NSF recorded");
    Ok(Json(NsfResponse { arrears_id, loan }))
}

/// POST /api/loans/{id}/actions/post
pub async fn post_action(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<PostRequest>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    post_payment(
        &mut loan,
        req.line_id,
        req.amount,
        req.posted_date,
        req.apply_to_arrears_first,
    )?;
    store.put(loan.clone());
    tracing::info!(loan = %id, line = req.line_id, amount = %req.amount, "payment posted");
    Ok(Json(loan))
}

/// POST /api/loans/{id}/actions/retry
pub async fn retry_action(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<RetryRequest>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    retry_line(&mut loan, req.line_id, req.new_date)?;
    store.put(loan.clone());
    tracing::info!(loan = %id, line = req.line_id, "NSF line rescheduled");
    Ok(Json(loan))
}

/// POST /api/loans/{id}/actions/arrears/resolve
pub async fn resolve_action(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<ResolveArrearsRequest>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    resolve_arrears(
        &mut loan,
        &req.arrears_id,
        req.amount,
        &req.target_ids,
        req.new_date,
    )?;
    store.put(loan.clone());
    tracing::info!(loan = %id, arrears = %req.arrears_id, "arrears resolved");
    Ok(Json(loan))
}

/// POST /api/loans/{id}/actions/report
pub async fn report_action(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(req): Json<ReportRequest>,
) -> ApiResult<Json<Loan>> {
    let mut store = store.lock()?;
    let mut loan = load_or_seed(&mut store, &id);
    report_line(&mut loan, req.selected_line, req.amount, &req.target_ids)?;
    store.put(loan.clone());
    tracing::info!(loan = %id, line = req.selected_line, "line deferred");
    Ok(Json(loan))
}
