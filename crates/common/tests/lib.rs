// common/tests/lib.rs
use gatehouse_common::{CurrentUser, ErrorDetail, ErrorEnvelope, LoginResponse};
use serde_json::json;

#[test]
fn test_current_user_uses_camel_case_names() {
    let user = CurrentUser {
        uid: "u-1".to_string(),
        db_name: "proj1".to_string(),
        email: Some("a@x.com".to_string()),
        display_name: Some("a@x.com".to_string()),
        anonymous: false,
    };

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["dbName"], "proj1");
    assert_eq!(value["displayName"], "a@x.com");

    // authenticated sessions do not advertise an anonymous flag
    assert!(value.get("anonymous").is_none());
}

#[test]
fn test_anonymous_flag_survives_round_trip() {
    let user = CurrentUser {
        uid: "u-2".to_string(),
        db_name: "proj1".to_string(),
        email: None,
        display_name: Some("anonymous".to_string()),
        anonymous: true,
    };

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["anonymous"], true);
    assert!(value.get("email").is_none());

    let back: CurrentUser = serde_json::from_value(value).unwrap();
    assert_eq!(back, user);
}

#[test]
fn test_login_response_shape() {
    let body: LoginResponse = serde_json::from_value(json!({
        "loginOk": true,
        "dbName": "proj1",
        "currentUser": { "uid": "u-1", "dbName": "proj1" }
    }))
    .unwrap();

    assert!(body.login_ok);
    assert_eq!(body.current_user.uid, "u-1");
    assert!(!body.current_user.anonymous);
}

#[test]
fn test_error_envelope_shape() {
    let envelope = ErrorEnvelope {
        error: ErrorDetail {
            status_code: 403,
            message: "Bad Login".to_string(),
            error_type: "Forbidden".to_string(),
            data: None,
        },
    };

    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["error"]["statusCode"], 403);
    assert_eq!(value["error"]["errorType"], "Forbidden");
    assert!(value["error"].get("data").is_none());
}
