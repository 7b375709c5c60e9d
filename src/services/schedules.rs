//! Weekly schedules for teachers, students and study groups.

#[cfg(test)]
#[path = "schedules_test.rs"]
mod schedules_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use urlencoding::encode;
use serde_json::Value;

use crate::api::transport::ApiRequest;
use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub course_id: String,
    pub academic_year: i32,
    pub semester: String,
    /// `"0"` (Monday) through `"4"` (Friday).
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScheduleEntry {
    pub course_id: String,
    pub academic_year: i32,
    pub semester: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone)]
pub struct ScheduleService {
    api: Arc<ApiClient>,
}

impl ScheduleService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// `GET /schedules/teacher/{teacher_id}`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it.
    pub async fn for_teacher(
        &self,
        teacher_id: &str,
        academic_year: i32,
        semester: &str,
    ) -> Result<Vec<ScheduleEntry>, ApiError> {
        let path = format!("/schedules/teacher/{}", encode(teacher_id));
        let request = term(ApiRequest::get(path), academic_year, semester);
        self.api
            .send_json(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %teacher_id, "teacher schedule fetch failed"))
    }

    /// `GET /schedules/student/{student_id}`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it.
    pub async fn for_student(
        &self,
        student_id: &str,
        academic_year: i32,
        semester: &str,
    ) -> Result<Vec<ScheduleEntry>, ApiError> {
        let path = format!("/schedules/student/{}", encode(student_id));
        let request = term(ApiRequest::get(path), academic_year, semester);
        self.api
            .send_json(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %student_id, "student schedule fetch failed"))
    }

    /// `GET /schedules/group/{group_code}`. The group view is returned as the
    /// backend shapes it.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it.
    pub async fn for_group(&self, group_code: &str, academic_year: i32, semester: &str) -> Result<Value, ApiError> {
        let path = format!("/schedules/group/{}", encode(group_code));
        let request = term(ApiRequest::get(path), academic_year, semester);
        self.api
            .send_json(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %group_code, "group schedule fetch failed"))
    }

    /// Replace a group's schedule via `PUT /schedules/group`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it. A backend `{"detail": ..}`
    /// body is available through [`ApiError::message`].
    pub async fn update_group(
        &self,
        group_code: &str,
        schedule: &[NewScheduleEntry],
        academic_year: i32,
        semester: &str,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::put("/schedules/group").json(&serde_json::json!({
            "group_code": group_code,
            "schedule": schedule,
            "academic_year": academic_year,
            "semester": semester,
        }));
        self.api
            .send(request)
            .await
            .map(|response| response.payload())
            .inspect_err(|e| {
                tracing::error!(error = %e, message = %e.message(), %group_code, "group schedule update failed");
            })
    }
}

fn term(request: ApiRequest, academic_year: i32, semester: &str) -> ApiRequest {
    request.query("academic_year", academic_year).query("semester", semester)
}
