use super::*;
use axum::body::to_bytes;

#[test]
fn widget_errors_keep_their_codes() {
    let err = WidgetError::LastItem { noun: "review" };
    assert_eq!(ErrorCode::error_code(&err), "E_LAST_ITEM");
    assert!(!err.retryable());
}

#[test]
fn api_error_carries_code_and_message() {
    let err = ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, &WidgetError::LastItem { noun: "block" });
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.body, ErrorBody { code: "E_LAST_ITEM", message: "At least one block is required.".into() });
}

#[test]
fn bad_request_helper() {
    let err = ApiError::bad_request("E_EMPTY_DRAFT", "nothing to save");
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.code, "E_EMPTY_DRAFT");
}

#[tokio::test]
async fn into_response_renders_json_body() {
    let response = ApiError::new(StatusCode::NOT_FOUND, &WidgetError::UnknownKind("slider".into())).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, serde_json::json!({"code": "E_UNKNOWN_WIDGET", "message": "unknown widget type: slider"}));
}
