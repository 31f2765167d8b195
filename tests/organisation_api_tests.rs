//! Router-level tests for the organisation API and the session gate.

mod test_utils;

use academicerp::auth::SESSION_COOKIE;
use academicerp::services::Principal;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};
use test_utils::{body_json, login_cookie, session_cookie_for, setup_test_db, test_app};
use tower::ServiceExt;

struct Harness {
    app: Router,
    cookie: String,
}

impl Harness {
    async fn new() -> Self {
        let db = setup_test_db().await.expect("Failed to set up test database");
        let cookie = login_cookie(&db).await.expect("Failed to create session");
        let app = test_app(&db).expect("Failed to build app");
        Self { app, cookie }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> axum::response::Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, &self.cookie);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

fn acme() -> Value {
    json!({
        "name": "Acme Institute",
        "address": "12 College Road",
        "city": "Pune",
        "hrContacts": [
            {"firstName": "Asha", "email": "asha@acme.com", "contactNumber": "9876543210"},
            {"firstName": "Ravi", "lastName": "Kumar", "email": "ravi@acme.com", "contactNumber": "9123456780"}
        ]
    })
}

#[tokio::test]
async fn create_returns_created_with_location_and_ids() {
    let harness = Harness::new().await;

    let response = harness
        .send("POST", "/api/organisations", Some(acme()))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let body = body_json(response).await.unwrap();
    let id = body["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/organisations/{id}"));
    assert_eq!(body["isActive"], true);
    assert_eq!(body["hrContacts"].as_array().unwrap().len(), 2);
    assert!(body["hrContacts"][0]["id"].is_i64());
    assert!(body["hrContacts"][0].get("organisationId").is_none());
}

#[tokio::test]
async fn invalid_payload_lists_field_errors() {
    let harness = Harness::new().await;

    let response = harness
        .send(
            "POST",
            "/api/organisations",
            Some(json!({
                "name": "  ",
                "hrContacts": [{"firstName": "Asha", "email": "not-an-email", "contactNumber": "123"}]
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["name", "hrContacts[0].email", "hrContacts[0].contactNumber"]
    );
    assert_eq!(body["errors"][0]["message"], "Name is required");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let harness = Harness::new().await;
    let response = harness
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/organisations")
                .header(header::COOKIE, &harness.cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn requests_without_session_are_unauthorized() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db).unwrap();

    for uri in ["/api/organisations", "/api/auth/me", "/api/unknown"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn expired_or_unknown_session_is_unauthorized() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db).unwrap();
    let expired = session_cookie_for(&db, &Principal::Anonymous, -5)
        .await
        .unwrap();

    for cookie in [expired, format!("{SESSION_COOKIE}=forged")] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/organisations")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn get_update_and_delete_round_trip() {
    let harness = Harness::new().await;
    let created = body_json(
        harness
            .send("POST", "/api/organisations", Some(acme()))
            .await,
    )
    .await
    .unwrap();
    let id = created["id"].as_i64().unwrap();
    let ravi_id = created["hrContacts"][1]["id"].as_i64().unwrap();
    let uri = format!("/api/organisations/{id}");

    let fetched = harness.send("GET", &uri, None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await.unwrap()["name"], "Acme Institute");

    let response = harness
        .send(
            "PUT",
            &uri,
            Some(json!({
                "name": "Acme University",
                "address": "1 Campus Way",
                "city": "Ignored",
                "hrContacts": [
                    {"id": ravi_id, "firstName": "Ravi", "email": "ravi@acme.com", "contactNumber": "9000000000"},
                    {"firstName": "Meera", "email": "meera@acme.com", "contactNumber": "9111111111"}
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await.unwrap();
    assert_eq!(updated["name"], "Acme University");
    assert_eq!(updated["address"], "1 Campus Way");
    assert_eq!(updated["city"], "Pune");
    let contacts = updated["hrContacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["id"], ravi_id);
    assert_eq!(contacts[0]["contactNumber"], "9000000000");

    let deleted = harness.send("DELETE", &uri, None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = harness.send("GET", &uri, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(gone).await.unwrap()["message"],
        "Organisation not found"
    );
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let harness = Harness::new().await;

    let update = harness
        .send(
            "PUT",
            "/api/organisations/999",
            Some(json!({"name": "Nobody"})),
        )
        .await;
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = harness.send("DELETE", "/api/organisations/999", None).await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let harness = Harness::new().await;

    let response = harness.send("GET", "/api/organisations/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await.unwrap();
    assert_eq!(body["errors"][0]["field"], "id");
}

#[tokio::test]
async fn delete_all_empties_the_collection() {
    let harness = Harness::new().await;
    harness
        .send("POST", "/api/organisations", Some(acme()))
        .await;
    harness
        .send("POST", "/api/organisations", Some(acme()))
        .await;

    let response = harness.send("DELETE", "/api/organisations", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = body_json(harness.send("GET", "/api/organisations", None).await)
        .await
        .unwrap();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn me_returns_signed_in_user() {
    let harness = Harness::new().await;

    let response = harness.send("GET", "/api/auth/me", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await.unwrap(),
        json!({"name": "Asha Rao", "email": "asha@example.edu"})
    );
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db).unwrap();

    for uri in ["/", "/health", "/openapi.json"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn minimal_create_fills_server_defaults() {
    let harness = Harness::new().await;

    let response = harness
        .send(
            "POST",
            "/api/organisations",
            Some(json!({"name": "Acme", "address": "1 Main St"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await.unwrap();
    assert!(body["id"].is_i64());
    assert!(body["createdAt"].is_string());
    assert_eq!(body["isActive"], true);
    assert_eq!(body["hrContacts"], json!([]));
}

#[tokio::test]
async fn omitted_name_is_required() {
    let harness = Harness::new().await;

    let response = harness
        .send("POST", "/api/organisations", Some(json!({"address": "1 Main St"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await.unwrap();
    assert_eq!(
        body["message"],
        "Please correct the highlighted fields and try again."
    );
    assert!(
        body["errors"]
            .as_array()
            .unwrap()
            .contains(&json!({"field": "name", "message": "Name is required"}))
    );
}

#[tokio::test]
async fn unknown_api_path_is_not_found_once_signed_in() {
    let harness = Harness::new().await;

    let response = harness.send("GET", "/api/unknown", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await.unwrap()["message"],
        "Resource not found"
    );
}

#[tokio::test]
async fn session_storage_failure_is_a_server_error() {
    let db = setup_test_db().await.unwrap();
    let cookie = login_cookie(&db).await.unwrap();
    let app = test_app(&db).unwrap();
    db.execute_unprepared("DROP TABLE sessions").await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/organisations")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn undecodable_session_is_unauthorized() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(&db).unwrap();
    db.execute_unprepared(
        "INSERT INTO sessions (id, principal, expires_at, created_at) \
         VALUES ('garbled', 'not json', '2999-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
    )
    .await
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("{SESSION_COOKIE}=garbled"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
