use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::validation::{validate_id, validate_natural_key, validate_search_query};
use super::{ApiError, ApiResponse, AppState, CustomerDto, MessageResponse};
use crate::validation::FieldErrors;

#[derive(Debug, Deserialize)]
pub struct CustomerQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
}

impl CreateCustomerRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::default();
        errors.require("customer_id", &self.customer_id, "Customer ID");
        errors.require("customer_name", &self.customer_name, "Customer name");
        errors.into_result().map_err(ApiError::InvalidFields)?;

        validate_natural_key("Customer ID", &self.customer_id)?;
        Ok(())
    }
}

/// GET /api/customers, optionally filtered with `?name=<fragment>`.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<ApiResponse<Vec<CustomerDto>>>, ApiError> {
    let customers = match query.name.as_deref() {
        Some(fragment) => {
            let fragment = validate_search_query(fragment)?;
            state.store().search_customers_by_name(fragment).await?
        }
        None => state.store().list_customers().await?,
    };

    Ok(Json(ApiResponse::success(
        customers.into_iter().map(CustomerDto::from).collect(),
    )))
}

pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerDto>>), ApiError> {
    payload.validate()?;

    let customer = state
        .store()
        .create_customer(&payload.customer_id, payload.customer_name.trim())
        .await
        .map_err(|e| match e {
            crate::db::StoreError::Duplicate(_) => ApiError::Conflict(format!(
                "Customer ID already exists: {}",
                payload.customer_id
            )),
            other => other.into(),
        })?;

    info!(customer_id = %customer.customer_id, "Customer created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CustomerDto::from(customer))),
    ))
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CustomerDto>>, ApiError> {
    let id = validate_id("Customer", id)?;
    let customer = state
        .store()
        .get_customer(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;

    Ok(Json(ApiResponse::success(CustomerDto::from(customer))))
}

pub async fn get_customer_by_code(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<Json<ApiResponse<CustomerDto>>, ApiError> {
    let customer = state
        .store()
        .get_customer_by_code(&customer_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &customer_id))?;

    Ok(Json(ApiResponse::success(CustomerDto::from(customer))))
}

pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("Customer", id)?;

    if !state.store().delete_customer(id).await? {
        return Err(ApiError::not_found("Customer", id));
    }

    info!(id, "Customer deleted");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: format!("Customer {id} deleted"),
    })))
}
