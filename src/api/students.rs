use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::validation::{validate_id, validate_natural_key};
use super::{ApiError, ApiResponse, AppState, StudentDto};
use crate::db::{StoreError, StudentDetailInput, StudentInput};
use crate::validation::{FieldErrors, is_valid_email};

#[derive(Debug, Deserialize)]
pub struct StudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub student_number: String,
    pub detail: Option<StudentDetailRequest>,
}

#[derive(Debug, Deserialize)]
pub struct StudentDetailRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

impl StudentRequest {
    fn into_input(self) -> Result<StudentInput, ApiError> {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name, "Name");
        errors.require("student_number", &self.student_number, "Student number");

        if let Some(detail) = &self.detail {
            errors.require("detail.address", &detail.address, "Address");
            errors.require("detail.phone_number", &detail.phone_number, "Phone number");
            if let Some(email) = &detail.email
                && !is_valid_email(email)
            {
                errors.add("detail.email", "Email is not a valid address");
            }
        }

        errors.into_result().map_err(ApiError::InvalidFields)?;
        validate_natural_key("Student number", &self.student_number)?;

        Ok(StudentInput {
            name: self.name.trim().to_string(),
            student_number: self.student_number,
            detail: self.detail.map(|d| StudentDetailInput {
                address: d.address,
                phone_number: d.phone_number,
                email: d.email,
                date_of_birth: d.date_of_birth,
            }),
        })
    }
}

fn map_duplicate(student_number: &str) -> impl FnOnce(StoreError) -> ApiError + '_ {
    move |e| match e {
        StoreError::Duplicate(_) => {
            ApiError::Conflict(format!("Student number already exists: {student_number}"))
        }
        other => other.into(),
    }
}

pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<StudentDto>>>, ApiError> {
    let students = state.store().list_students().await?;
    Ok(Json(ApiResponse::success(
        students.into_iter().map(StudentDto::from).collect(),
    )))
}

pub async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    let id = validate_id("Student", id)?;
    let student = state
        .store()
        .get_student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student", id))?;

    Ok(Json(ApiResponse::success(StudentDto::from(student))))
}

pub async fn get_student_by_number(
    State(state): State<Arc<AppState>>,
    Path(student_number): Path<String>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    let student = state
        .store()
        .get_student_by_number(&student_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Student", &student_number))?;

    Ok(Json(ApiResponse::success(StudentDto::from(student))))
}

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StudentDto>>), ApiError> {
    let input = payload.into_input()?;
    let number = input.student_number.clone();

    let student = state
        .store()
        .create_student(input)
        .await
        .map_err(map_duplicate(&number))?;

    info!(student_number = %number, "Student created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StudentDto::from(student))),
    ))
}

pub async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<StudentRequest>,
) -> Result<Json<ApiResponse<StudentDto>>, ApiError> {
    let id = validate_id("Student", id)?;
    let input = payload.into_input()?;
    let number = input.student_number.clone();

    let student = state
        .store()
        .update_student(id, input)
        .await
        .map_err(map_duplicate(&number))?
        .ok_or_else(|| ApiError::not_found("Student", id))?;

    Ok(Json(ApiResponse::success(StudentDto::from(student))))
}

pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id("Student", id)?;

    if !state.store().delete_student(id).await? {
        return Err(ApiError::not_found("Student", id));
    }

    info!(id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}
