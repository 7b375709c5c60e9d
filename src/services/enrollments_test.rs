use super::*;
use crate::api::transport::Body;
use crate::test_support::Harness;

// =============================================================
// enroll
// =============================================================

#[tokio::test]
async fn enroll_success_is_normalized() {
    let h = Harness::logged_in();
    h.transport.push_json(200, serde_json::json!({ "check": "success", "massage": "Enrollment Successfull" }));

    let outcome = h.ctx.enrollments.enroll("5", "42").await;

    assert!(outcome.success);
    assert_eq!(outcome.title, "Success");
    assert_eq!(outcome.message.as_deref(), Some("Enrollment Successfull"));
    assert!(outcome.error.is_none());
    let req = h.transport.last_request();
    assert_eq!(req.path, "/enrollments");
    assert_eq!(req.body, Body::Json(serde_json::json!({ "course_id": "5", "student_id": "42" })));
}

#[tokio::test]
async fn enroll_already_enrolled_is_failed_not_error() {
    let h = Harness::logged_in();
    h.transport.push_json(200, serde_json::json!({ "check": "faild", "massage": "Student already enrolled" }));

    let outcome = h.ctx.enrollments.enroll("5", "42").await;

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Failed");
    assert_eq!(outcome.message.as_deref(), Some("Student already enrolled"));
}

#[tokio::test]
async fn enroll_accepts_correctly_spelled_message() {
    let h = Harness::logged_in();
    h.transport.push_json(200, serde_json::json!({ "check": "success", "message": "ok" }));

    assert_eq!(h.ctx.enrollments.enroll("5", "42").await.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn enroll_skips_empty_massage_field() {
    let h = Harness::logged_in();
    h.transport.push_json(200, serde_json::json!({ "check": "success", "massage": "", "message": "Enrolled" }));

    assert_eq!(h.ctx.enrollments.enroll("5", "42").await.message.as_deref(), Some("Enrolled"));
}

#[tokio::test]
async fn enroll_error_skips_empty_message_field() {
    let h = Harness::logged_in();
    h.transport.push_json(400, serde_json::json!({ "message": "", "massage": "Course is full" }));

    assert_eq!(h.ctx.enrollments.enroll("5", "42").await.message.as_deref(), Some("Course is full"));
}

#[tokio::test]
async fn enroll_backend_error_becomes_error_outcome() {
    let h = Harness::logged_in();
    h.transport.push_json(422, serde_json::json!({ "message": "course_id missing" }));

    let outcome = h.ctx.enrollments.enroll("", "42").await;

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Error");
    assert_eq!(outcome.message.as_deref(), Some("course_id missing"));
    assert_eq!(outcome.error, Some(serde_json::json!({ "message": "course_id missing" })));
}

#[tokio::test]
async fn enroll_transport_error_uses_default_message() {
    let h = Harness::logged_in();
    h.transport.push_error("connection refused");

    let outcome = h.ctx.enrollments.enroll("5", "42").await;

    assert_eq!(outcome.message.as_deref(), Some("Enrollment failed"));
    assert_eq!(outcome.error, Some(Value::String("request failed: connection refused".to_owned())));
}

// =============================================================
// bulk_enroll
// =============================================================

#[tokio::test]
async fn bulk_enroll_reports_counts_and_errors() {
    let h = Harness::logged_in();
    h.transport.push_json(
        200,
        serde_json::json!({
            "message": "Successfully enrolled 1 students",
            "enrolled_count": 1,
            "errors": ["Student s2 already enrolled"]
        }),
    );

    let ids = vec!["s1".to_owned(), "s2".to_owned()];
    let outcome = h.ctx.enrollments.bulk_enroll("5", &ids).await;

    assert!(outcome.success);
    assert_eq!(outcome.title, "Bulk Enrollment");
    assert_eq!(outcome.enrolled_count, 1);
    assert_eq!(outcome.errors, vec!["Student s2 already enrolled"]);
    assert_eq!(
        h.transport.last_request().body,
        Body::Json(serde_json::json!({ "course_id": "5", "student_ids": ["s1", "s2"] }))
    );
}

#[tokio::test]
async fn bulk_enroll_failure_keeps_payload_errors() {
    let h = Harness::logged_in();
    h.transport.push_json(400, serde_json::json!({ "message": "bad course", "errors": ["x"] }));

    let outcome = h.ctx.enrollments.bulk_enroll("nope", &[]).await;

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Error");
    assert_eq!(outcome.message.as_deref(), Some("bad course"));
    assert_eq!(outcome.errors, vec!["x"]);
}

#[tokio::test]
async fn bulk_enroll_failure_without_payload_uses_default_message() {
    let h = Harness::logged_in();
    h.transport.push_error("timeout");

    let outcome = h.ctx.enrollments.bulk_enroll("5", &[]).await;
    assert_eq!(outcome.message.as_deref(), Some("Bulk enrollment failed"));
    assert!(outcome.errors.is_empty());
}
