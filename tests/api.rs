use reqwest::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use runbot_auth::account::{AccountUseCase, InMemoryAccountStore};
use runbot_auth::auth::{BcryptHasher, JwtSigner};
use runbot_auth::configuration::JwtSettings;
use runbot_auth::controller::AccountController;
use runbot_auth::startup::run;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

fn jwt_settings() -> JwtSettings {
    JwtSettings {
        salt: "integration-test-salt".to_string(),
        issuer: "runbot-auth".to_string(),
        subject: "account".to_string(),
        audience: vec!["runbot".to_string()],
        expires_in: 900,
    }
}

async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let use_case = AccountUseCase::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(BcryptHasher::new(4)),
    );
    let signer = JwtSigner::new(&jwt_settings()).expect("Failed to build signer");
    let controller = AccountController::new(use_case, Arc::new(signer));

    let server = run(listener, controller).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> reqwest::Response {
        self.post_json(
            "/auth/signup",
            &json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_json("/auth/signin", &json!({ "email": email, "password": password }))
            .await
    }

    async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Signs up the default account and returns the parsed body.
    async fn default_account(&self) -> Value {
        let response = self.sign_up("a@b.com", "longenough1", "Name").await;
        assert_eq!(201, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }
}

fn token(body: &Value, field: &str) -> String {
    body[field].as_str().expect("token missing").to_string()
}

// --- Health ---

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/health_check", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!(Some(0), response.content_length());
}

#[tokio::test]
async fn version_reports_package_version() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(&format!("{}/version", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// --- Sign-up ---

#[tokio::test]
async fn sign_up_returns_201_with_tokens_and_refresh_cookie() {
    let app = spawn_app().await;

    let response = app.sign_up("a@b.com", "longenough1", "Name").await;

    assert_eq!(201, response.status().as_u16());

    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("refresh cookie missing")
        .to_string();
    assert!(cookie.starts_with("rt="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/auth"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["account"]["email"], "a@b.com");
    assert_eq!(body["account"]["status"], "active");
    assert!(body["account"].get("password_hash").is_none());
    assert!(cookie.contains(&token(&body, "refresh_token")));
}

#[tokio::test]
async fn sign_up_returns_409_for_duplicate_email() {
    let app = spawn_app().await;
    app.default_account().await;

    let response = app.sign_up("a@b.com", "otherpass2", "Other").await;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn sign_up_returns_400_for_invalid_input() {
    let app = spawn_app().await;

    let test_cases = vec![
        ("notanemail", "longenough1", "Name", "invalid email"),
        ("a@b.com", "short1", "Name", "short password"),
        ("a@b.com", "longenough1", "Al", "short name"),
        ("a@b.com", "longenough1", "Name; DROP TABLE accounts", "sql in name"),
    ];

    for (email, password, name, description) in test_cases {
        let response = app.sign_up(email, password, name).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 for {}",
            description
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

// --- Sign-in ---

#[tokio::test]
async fn sign_in_returns_tokens_for_valid_credentials() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app.sign_in("a@b.com", "longenough1").await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["account"]["id"], created["account"]["id"]);
}

#[tokio::test]
async fn sign_in_failures_are_indistinguishable() {
    let app = spawn_app().await;
    app.default_account().await;

    let wrong_password = app.sign_in("a@b.com", "wrongsecret1").await;
    let unknown_email = app.sign_in("nobody@b.com", "longenough1").await;

    assert_eq!(401, wrong_password.status().as_u16());
    assert_eq!(401, unknown_email.status().as_u16());

    let wrong_password: Value = wrong_password.json().await.unwrap();
    let unknown_email: Value = unknown_email.json().await.unwrap();
    assert_eq!(wrong_password["code"], unknown_email["code"]);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

// --- Refresh ---

#[tokio::test]
async fn refresh_accepts_token_from_body() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app
        .post_json(
            "/auth/refresh",
            &json!({ "refresh_token": token(&created, "refresh_token") }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["account"]["id"], created["account"]["id"]);
}

#[tokio::test]
async fn refresh_accepts_token_from_cookie() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app
        .client
        .post(&format!("{}/auth/refresh", &app.address))
        .header(COOKIE, format!("rt={}", token(&created, "refresh_token")))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app
        .post_json(
            "/auth/refresh",
            &json!({ "refresh_token": token(&created, "access_token") }),
        )
        .await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn refresh_without_token_returns_401() {
    let app = spawn_app().await;

    let response = app.post_json("/auth/refresh", &json!({})).await;

    assert_eq!(401, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "MISSING_TOKEN");
}

// --- Protected routes ---

#[tokio::test]
async fn me_requires_an_access_token() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app
        .client
        .get(&format!("{}/api/me", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let response = app
        .get_with_token("/api/me", &token(&created, "refresh_token"))
        .await;
    assert_eq!(401, response.status().as_u16());

    let response = app
        .get_with_token("/api/me", &token(&created, "access_token"))
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], created["account"]["id"]);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn accounts_can_be_looked_up_by_email_and_id() {
    let app = spawn_app().await;
    let created = app.default_account().await;
    let access = token(&created, "access_token");
    let id = created["account"]["id"].as_str().unwrap().to_string();

    let by_email = app.get_with_token("/api/accounts?email=a@b.com", &access).await;
    assert_eq!(200, by_email.status().as_u16());
    let by_email: Value = by_email.json().await.unwrap();
    assert_eq!(by_email["id"], id.as_str());

    let by_id = app
        .get_with_token(&format!("/api/accounts/{}", id), &access)
        .await;
    assert_eq!(200, by_id.status().as_u16());

    let missing = app
        .get_with_token(
            &format!("/api/accounts/{}", uuid::Uuid::new_v4()),
            &access,
        )
        .await;
    assert_eq!(404, missing.status().as_u16());

    let malformed = app.get_with_token("/api/accounts/not-a-uuid", &access).await;
    assert_eq!(400, malformed.status().as_u16());
}

#[tokio::test]
async fn blocked_account_cannot_sign_in_or_refresh() {
    let app = spawn_app().await;
    let created = app.default_account().await;
    let id = created["account"]["id"].as_str().unwrap().to_string();

    let response = app
        .client
        .patch(&format!("{}/api/accounts/{}/status", &app.address, id))
        .header(
            AUTHORIZATION,
            format!("Bearer {}", token(&created, "access_token")),
        )
        .json(&json!({ "status": "blocked" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(204, response.status().as_u16());

    let response = app.sign_in("a@b.com", "longenough1").await;
    assert_eq!(401, response.status().as_u16());

    let response = app
        .post_json(
            "/auth/refresh",
            &json!({ "refresh_token": token(&created, "refresh_token") }),
        )
        .await;
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn change_status_of_unknown_account_returns_404() {
    let app = spawn_app().await;
    let created = app.default_account().await;

    let response = app
        .client
        .patch(&format!(
            "{}/api/accounts/{}/status",
            &app.address,
            uuid::Uuid::new_v4()
        ))
        .header(
            AUTHORIZATION,
            format!("Bearer {}", token(&created, "access_token")),
        )
        .json(&json!({ "status": "suspended" }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}
