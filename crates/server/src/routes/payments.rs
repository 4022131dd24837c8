use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, Json};
use models::{Payment, PaymentInput};
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::AppState;

pub async fn get_payment(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Payment>, JsonApiError> {
    Ok(Json(state.payments.get_by_id(&id).await?))
}

pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Vec<Payment>>, JsonApiError> {
    let list = state.payments.get_all().await?;
    info!(count = list.len(), "list payments");
    Ok(Json(list))
}

pub async fn create_payment(
    State(state): State<AppState>,
    payload: Result<Json<PaymentInput>, JsonRejection>,
) -> Result<Json<Payment>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.payments.save(input).await?))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentInput>, JsonRejection>,
) -> Result<Json<Payment>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.payments.update(input, &id).await?))
}

/// 200 with an empty body on success.
pub async fn delete_payment(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    state.payments.delete(&id).await?;
    Ok(StatusCode::OK)
}
