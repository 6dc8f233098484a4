//! Request and response shapes for the loan API.
//!
//! Field names match the wire format the front end already speaks
//! (`selectedLine`, `lineId`, `applyToArrearsFirst`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use loan_servicing_core::{Loan, Money};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub ts: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NsfRequest {
    pub selected_line: u32,
    #[serde(default)]
    pub fee: Option<Money>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NsfResponse {
    pub arrears_id: String,
    pub loan: Loan,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub line_id: u32,
    pub amount: Money,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub apply_to_arrears_first: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRequest {
    pub line_id: u32,
    #[serde(default)]
    pub new_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveArrearsRequest {
    pub arrears_id: String,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub target_ids: Vec<u32>,
    #[serde(default)]
    pub new_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub selected_line: u32,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub target_ids: Vec<u32>,
}
