use axum::Json;

use crate::models::{ooo::OOO_REASONS, reimbursement::REIMBURSEMENT_CATEGORIES};

/// GET /api/references/ooo-reasons
#[utoipa::path(
    get,
    path = "/api/references/ooo-reasons",
    responses(
        (status = 200, description = "Reasons offered on the OOO form", body = Vec<String>)
    ),
    tag = "references"
)]
pub async fn get_ooo_reasons() -> Json<Vec<&'static str>> {
    Json(OOO_REASONS.to_vec())
}

/// GET /api/references/reimbursement-categories
#[utoipa::path(
    get,
    path = "/api/references/reimbursement-categories",
    responses(
        (status = 200, description = "Expense categories", body = Vec<String>)
    ),
    tag = "references"
)]
pub async fn get_reimbursement_categories() -> Json<Vec<&'static str>> {
    Json(REIMBURSEMENT_CATEGORIES.to_vec())
}
