//! Registration, departments, teacher/student search, and dashboard stats.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::empty_on_not_found;
use crate::api::transport::{ApiRequest, FormField};
use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub code: String,
    pub name: String,
}

/// One row from a teacher or student search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    #[serde(alias = "full_name", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentEnrollment {
    pub student_name: String,
    pub course_name: String,
    pub department: String,
    pub enrollment_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingSchedule {
    pub course_name: String,
    pub teacher_name: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
}

/// Admin dashboard figures from `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_students: i64,
    pub total_teachers: i64,
    pub active_courses: i64,
    pub current_enrollments: i64,
    pub department_distribution: ChartSeries,
    pub enrollment_trend: ChartSeries,
    pub course_distribution: ChartSeries,
    pub recent_enrollments: Vec<RecentEnrollment>,
    pub upcoming_schedules: Vec<UpcomingSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Fields of the admin "register user" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub department_code: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date_of_enrollment: String,
    pub image: ImageUpload,
}

impl Registration {
    #[must_use]
    pub fn into_form(self) -> Vec<FormField> {
        let text = |name: &str, value: String| FormField::Text { name: name.to_owned(), value };
        vec![
            text("email", self.email),
            text("full_name", self.full_name),
            text("role", self.role),
            text("department_code", self.department_code),
            text("date_of_enrollment", self.date_of_enrollment),
            FormField::File {
                name: "image".to_owned(),
                file_name: self.image.file_name,
                content_type: self.image.content_type,
                bytes: self.image.bytes,
            },
        ]
    }
}

#[derive(Clone)]
pub struct UserService {
    api: Arc<ApiClient>,
}

impl UserService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Submit a registration form as `multipart/form-data`, fields as given.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn register(&self, form: Vec<FormField>) -> Result<Value, ApiError> {
        let response = self.api.send(ApiRequest::post("/register").multipart(form)).await?;
        Ok(response.payload())
    }

    /// `GET /departments`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn departments(&self) -> Result<Vec<Department>, ApiError> {
        self.api.send_json(ApiRequest::get("/departments")).await
    }

    /// Search teachers in a department. No matches (404) is an empty list.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` other than 404.
    pub async fn search_teachers(&self, department: &str, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let request = ApiRequest::get("/teachers/search")
            .query("department", department)
            .query("query", query.trim());
        empty_on_not_found(self.api.send_json(request).await, "teachers")
    }

    /// Search students in a department. No matches (404) is an empty list.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` other than 404.
    pub async fn search_students(&self, department: &str, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let request = ApiRequest::get("/students/search")
            .query("department", department)
            .query("query", query.trim());
        empty_on_not_found(self.api.send_json(request).await, "students")
    }

    /// Students of a department by enrollment year. No matches (404) is an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` other than 404.
    pub async fn students_by_year(&self, year: &str, department: &str) -> Result<Vec<UserSummary>, ApiError> {
        let request = ApiRequest::get("/students/search-by-year")
            .query("year", year)
            .query("department", department);
        empty_on_not_found(self.api.send_json(request).await, "students by year")
    }

    /// Every student. Any failure is logged and yields an empty list.
    pub async fn all_students(&self) -> Vec<UserSummary> {
        match self.api.send_json(ApiRequest::get("/students")).await {
            Ok(students) => students,
            Err(e) => {
                tracing::error!(error = %e, "student list fetch failed");
                Vec::new()
            }
        }
    }

    /// `GET /stats`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.api.send_json(ApiRequest::get("/stats")).await
    }
}
