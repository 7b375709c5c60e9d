//! Course listing, creation and deletion.

#[cfg(test)]
#[path = "courses_test.rs"]
mod courses_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::api::transport::ApiRequest;
use crate::api::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub credits: i64,
    pub department_code: String,
    pub semester: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub name: String,
    pub credits: i64,
    pub department_code: String,
    pub semester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

#[derive(Clone)]
pub struct CourseService {
    api: Arc<ApiClient>,
}

impl CourseService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// `GET /courses/getCourse`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn all(&self) -> Result<Vec<Course>, ApiError> {
        self.api.send_json(ApiRequest::get("/courses/getCourse")).await
    }

    /// `GET /courses/getTeachersCourse/{teacher_id}`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn for_teacher(&self, teacher_id: &str) -> Result<Vec<Course>, ApiError> {
        self.api
            .send_json(ApiRequest::get(format!("/courses/getTeachersCourse/{}", encode(teacher_id))))
            .await
    }

    /// `GET /courses/getStudentsCourse/{student_id}`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn for_student(&self, student_id: &str) -> Result<Vec<Course>, ApiError> {
        self.api
            .send_json(ApiRequest::get(format!("/courses/getStudentsCourse/{}", encode(student_id))))
            .await
    }

    /// Courses shared by every student in `student_ids`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it.
    pub async fn common(&self, student_ids: &[String]) -> Result<Vec<Course>, ApiError> {
        let request =
            ApiRequest::post("/courses/common-courses").json(&serde_json::json!({ "student_ids": student_ids }));
        self.api.send_json(request).await.inspect_err(|e| {
            tracing::error!(error = %e, "common courses fetch failed");
        })
    }

    /// `POST /courses/createCouse` (the backend's path spelling).
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn create(&self, course: &NewCourse) -> Result<Course, ApiError> {
        self.api
            .send_json(ApiRequest::post("/courses/createCouse").json(course))
            .await
    }

    /// `DELETE /courses/{course_id}`.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError` after logging it.
    pub async fn delete(&self, course_id: &str) -> Result<(), ApiError> {
        self.api
            .send(ApiRequest::delete(format!("/courses/{}", encode(course_id))))
            .await
            .map(|_| ())
            .inspect_err(|e| tracing::error!(error = %e, %course_id, "course delete failed"))
    }
}
