use serde::{Deserialize, Serialize};

use crate::auth::{Authority, Principal, UserDetails};
use crate::entities::{customers, student_details, students, users};
use crate::validation::FieldErrors;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: Some(errors),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// What the web layer shows of a principal. The hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct PrincipalDto {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub authorities: Vec<Authority>,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
}

impl From<&Principal> for PrincipalDto {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.account().id,
            name: principal.account().name.clone(),
            username: principal.username().to_string(),
            authorities: principal.authorities().to_vec(),
            account_non_expired: principal.is_account_non_expired(),
            account_non_locked: principal.is_account_non_locked(),
            credentials_non_expired: principal.is_credentials_non_expired(),
            enabled: principal.is_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerDto {
    pub id: i32,
    pub customer_id: String,
    pub customer_name: String,
}

impl From<customers::Model> for CustomerDto {
    fn from(model: customers::Model) -> Self {
        Self {
            id: model.id,
            customer_id: model.customer_id,
            customer_name: model.customer_name,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StudentDetailDto {
    pub id: i32,
    pub address: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

impl From<student_details::Model> for StudentDetailDto {
    fn from(model: student_details::Model) -> Self {
        Self {
            id: model.id,
            address: model.address,
            phone_number: model.phone_number,
            email: model.email,
            date_of_birth: model.date_of_birth,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentDto {
    pub id: i32,
    pub name: String,
    pub student_number: String,
    pub detail: Option<StudentDetailDto>,
}

impl From<(students::Model, Option<student_details::Model>)> for StudentDto {
    fn from((student, detail): (students::Model, Option<student_details::Model>)) -> Self {
        Self {
            id: student.id,
            name: student.name,
            student_number: student.student_number,
            detail: detail.map(StudentDetailDto::from),
        }
    }
}
