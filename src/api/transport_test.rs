use super::*;

#[test]
fn join_url_handles_slashes() {
    assert_eq!(join_url("http://h:8000", "/courses/getCourse"), "http://h:8000/courses/getCourse");
    assert_eq!(join_url("http://h:8000/", "token"), "http://h:8000/token");
}

#[test]
fn request_builders_set_method_query_and_body() {
    let req = ApiRequest::get("/teachers/search")
        .query("department", "CS")
        .query("query", 3);
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.query, vec![("department".to_owned(), "CS".to_owned()), ("query".to_owned(), "3".to_owned())]);
    assert_eq!(req.body, Body::Empty);

    let req = ApiRequest::post("/token").form(&[("username", "a"), ("password", "b")]);
    assert_eq!(req.body, Body::Form(vec![("username".to_owned(), "a".to_owned()), ("password".to_owned(), "b".to_owned())]));
}

#[test]
fn header_value_is_case_insensitive() {
    let req = ApiRequest::get("/profile").header("Authorization", "Bearer t");
    assert_eq!(req.header_value("authorization"), Some("Bearer t"));
    assert_eq!(req.header_value("x-missing"), None);
}

#[test]
fn payload_parses_json_body() {
    let resp = ApiResponse::json(400, &serde_json::json!({ "detail": "bad" }));
    assert_eq!(resp.payload()["detail"], "bad");
}

#[test]
fn payload_of_empty_body_is_null() {
    assert_eq!(ApiResponse::new(500, Vec::new()).payload(), Value::Null);
}

#[test]
fn payload_keeps_plain_text_as_string() {
    let resp = ApiResponse::new(502, "Bad Gateway");
    assert_eq!(resp.payload(), Value::String("Bad Gateway".to_owned()));
}

#[test]
fn is_success_covers_2xx_only() {
    assert!(ApiResponse::new(204, Vec::new()).is_success());
    assert!(!ApiResponse::new(301, Vec::new()).is_success());
    assert!(!ApiResponse::new(404, Vec::new()).is_success());
}

#[test]
fn multipart_form_rejects_bad_content_type() {
    let fields = vec![FormField::File {
        name: "image".to_owned(),
        file_name: "a.jpg".to_owned(),
        content_type: "not a mime".to_owned(),
        bytes: vec![1, 2, 3],
    }];
    assert!(multipart_form(fields).is_err());
}

#[test]
fn reqwest_transport_keeps_configured_base_url() {
    let transport = ReqwestTransport::new(&ClientConfig::new("http://127.0.0.1:8000/")).unwrap();
    assert_eq!(transport.base_url(), "http://127.0.0.1:8000");
}
