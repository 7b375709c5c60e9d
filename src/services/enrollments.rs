//! Single and bulk course enrollment.
//!
//! Unlike other facades these never return `Err`: every outcome, including
//! transport and backend failures, is folded into a result object the UI can
//! show directly. The backend reports single-enrollment status as
//! `{"check": "success" | "faild", "massage": ...}`; both spellings of the
//! message field are accepted.

#[cfg(test)]
#[path = "enrollments_test.rs"]
mod enrollments_test;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::api::transport::ApiRequest;
use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentOutcome {
    pub success: bool,
    pub title: String,
    pub message: Option<String>,
    /// Backend body on a completed call.
    pub data: Option<Value>,
    /// Backend error body, or the transport message, on failure.
    pub error: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkEnrollmentOutcome {
    pub success: bool,
    pub title: String,
    pub message: Option<String>,
    pub enrolled_count: u64,
    pub errors: Vec<String>,
    pub data: Option<Value>,
    pub error: Option<Value>,
}

#[derive(Clone)]
pub struct EnrollmentService {
    api: Arc<ApiClient>,
}

impl EnrollmentService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Enroll one student via `POST /enrollments`.
    pub async fn enroll(&self, course_id: &str, student_id: &str) -> EnrollmentOutcome {
        let request = ApiRequest::post("/enrollments")
            .json(&serde_json::json!({ "course_id": course_id, "student_id": student_id }));
        match self.api.send(request).await {
            Ok(response) => {
                let data = response.payload();
                let success = data.get("check").and_then(Value::as_str) == Some("success");
                EnrollmentOutcome {
                    success,
                    title: if success { "Success" } else { "Failed" }.to_owned(),
                    message: field_str(&data, &["massage", "message"]),
                    data: Some(data),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, %course_id, %student_id, "enrollment failed");
                EnrollmentOutcome {
                    success: false,
                    title: "Error".to_owned(),
                    message: Some(
                        error_field(&e, &["message", "massage"]).unwrap_or_else(|| "Enrollment failed".to_owned()),
                    ),
                    data: None,
                    error: Some(error_value(&e)),
                }
            }
        }
    }

    /// Enroll many students via `POST /enrollments/bulk`.
    pub async fn bulk_enroll(&self, course_id: &str, student_ids: &[String]) -> BulkEnrollmentOutcome {
        let request = ApiRequest::post("/enrollments/bulk")
            .json(&serde_json::json!({ "course_id": course_id, "student_ids": student_ids }));
        match self.api.send(request).await {
            Ok(response) => {
                let data = response.payload();
                BulkEnrollmentOutcome {
                    success: true,
                    title: "Bulk Enrollment".to_owned(),
                    message: field_str(&data, &["message"]),
                    enrolled_count: data.get("enrolled_count").and_then(Value::as_u64).unwrap_or(0),
                    errors: string_list(data.get("errors")),
                    data: Some(data),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, %course_id, count = student_ids.len(), "bulk enrollment failed");
                BulkEnrollmentOutcome {
                    success: false,
                    title: "Error".to_owned(),
                    message: Some(error_field(&e, &["message"]).unwrap_or_else(|| "Bulk enrollment failed".to_owned())),
                    enrolled_count: 0,
                    errors: string_list(e.payload().and_then(|p| p.get("errors"))),
                    data: None,
                    error: Some(error_value(&e)),
                }
            }
        }
    }
}

fn field_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(str::to_owned)
}

fn error_field(error: &ApiError, keys: &[&str]) -> Option<String> {
    error.payload().and_then(|p| field_str(p, keys))
}

fn error_value(error: &ApiError) -> Value {
    error
        .payload()
        .cloned()
        .unwrap_or_else(|| Value::String(error.to_string()))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default()
}
