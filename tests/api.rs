use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chirpy::{
    AppState, auth::TokenService, db::Store, repository::Repository, routes::router,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";
const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

struct TestApp {
    _dir: TempDir,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Welcome to Chirpy</h1>").unwrap();

        let store = Store::open(dir.path().join("database.json")).unwrap();
        let repo = Repository::new(store, TokenService::new(SECRET)).with_hash_cost(4);
        let app = router(AppState::new(repo, POLKA_KEY), dir.path());

        Self { _dir: dir, app }
    }

    async fn send(&self, method: Method, uri: &str, auth: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn signup(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .send(Method::POST, "/api/users", None, Some(json!({ "email": email, "password": password })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    /// Returns (access token, refresh token).
    async fn login(&self, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .send(Method::POST, "/api/login", None, Some(json!({ "email": email, "password": password })))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    async fn chirp(&self, access: &str, text: &str) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/chirps", Some(&bearer(access)), Some(json!({ "body": text })))
            .await
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn signup_login_and_chirp() {
    let app = TestApp::new();

    let user = app.signup("a@x.com", "pw1").await;
    assert_eq!(user, json!({ "id": 1, "email": "a@x.com", "is_chirpy_red": false }));

    let (status, _) = app
        .send(Method::POST, "/api/login", None, Some(json!({ "email": "a@x.com", "password": "wrong" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/login", None, Some(json!({ "email": "b@x.com", "password": "pw1" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (access, _) = app.login("a@x.com", "pw1").await;

    let (status, first) = app.chirp(&access, "hello world").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first, json!({ "id": 1, "body": "hello world", "author_id": 1 }));

    let (_, second) = app.chirp(&access, "kerfuffle now").await;
    assert_eq!(second["body"], "**** now");

    let (status, listed) = app.send(Method::GET, "/api/chirps?author_id=1&sort=desc", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = listed.as_array().unwrap().iter().map(|c| c["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![2, 1]);

    let (status, fetched) = app.send(Method::GET, "/api/chirps/2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, second);
}

#[tokio::test]
async fn chirp_validation_and_auth() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    let (access, refresh) = app.login("a@x.com", "pw1").await;

    let (status, _) = app.chirp(&access, &"x".repeat(141)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.chirp(&refresh, "with a refresh token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/chirps", None, Some(json!({ "body": "anonymous" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listed) = app.send(Method::GET, "/api/chirps", None, None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn listing_errors() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    let (access, _) = app.login("a@x.com", "pw1").await;
    app.chirp(&access, "hi").await;

    let (status, _) = app.send(Method::GET, "/api/chirps?author_id=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send(Method::GET, "/api/chirps?author_id=9", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::GET, "/api/chirps?sort=sideways", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // empty parameters are the same as leaving them out
    let (status, listed) = app.send(Method::GET, "/api/chirps?author_id=&sort=", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _) = app.send(Method::GET, "/api/chirps/abc", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_author_deletes() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    app.signup("b@x.com", "pw2").await;
    let (alice, _) = app.login("a@x.com", "pw1").await;
    let (bob, _) = app.login("b@x.com", "pw2").await;

    let (_, chirp) = app.chirp(&alice, "mine").await;
    let uri = format!("/api/chirps/{}", chirp["id"]);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&bearer(&bob)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&bearer(&alice)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_and_revoke() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    let (access, refresh) = app.login("a@x.com", "pw1").await;

    let (status, body) = app.send(Method::POST, "/api/refresh", Some(&bearer(&refresh)), None).await;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["token"].as_str().unwrap().to_string();
    let (status, _) = app.chirp(&new_access, "fresh").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.send(Method::POST, "/api/refresh", Some(&bearer(&access)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for _ in 0..2 {
        let (status, _) = app.send(Method::POST, "/api/revoke", Some(&bearer(&refresh)), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = app.send(Method::POST, "/api/refresh", Some(&bearer(&refresh)), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_user_keeps_id() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    app.signup("b@x.com", "pw2").await;
    let (access, refresh) = app.login("a@x.com", "pw1").await;
    let creds = json!({ "email": "new@x.com", "password": "pw3" });

    let (status, _) = app
        .send(Method::PUT, "/api/users", Some(&bearer(&refresh)), Some(creds.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(Method::PUT, "/api/users", Some(&bearer(&access)), Some(creds))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "email": "new@x.com", "is_chirpy_red": false }));
    app.login("new@x.com", "pw3").await;

    let (status, _) = app
        .send(
            Method::PUT,
            "/api/users",
            Some(&bearer(&access)),
            Some(json!({ "email": "b@x.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_rejects_duplicates_and_bad_input() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;

    let (status, _) = app
        .send(Method::POST, "/api/users", None, Some(json!({ "email": "a@x.com", "password": "pw2" })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(Method::POST, "/api/users", None, Some(json!({ "email": "not-an-email", "password": "pw" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn polka_webhook_promotes_user() {
    let app = TestApp::new();
    app.signup("a@x.com", "pw1").await;
    let upgrade = |user_id: u64| json!({ "event": "user.upgraded", "data": { "user_id": user_id } });
    let api_key = format!("ApiKey {}", POLKA_KEY);

    let (status, _) = app
        .send(Method::POST, "/api/polka/webhooks", Some("ApiKey wrong"), Some(upgrade(1)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::POST, "/api/polka/webhooks", Some(&api_key), Some(json!({ "event": "user.payment_failed" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::POST, "/api/polka/webhooks", Some(&api_key), Some(upgrade(9)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::POST, "/api/polka/webhooks", Some(&api_key), Some(upgrade(1)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(Method::POST, "/api/login", None, Some(json!({ "email": "a@x.com", "password": "pw1" })))
        .await;
    assert_eq!(body["is_chirpy_red"], true);
}

#[tokio::test]
async fn file_server_hits_are_counted() {
    let app = TestApp::new();

    for _ in 0..2 {
        let (status, _) = app.send(Method::GET, "/app/index.html", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .app
        .clone()
        .oneshot(Request::get("/admin/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&html).contains("visited 2 times"));

    let (status, _) = app.send(Method::GET, "/api/reset", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .app
        .clone()
        .oneshot(Request::get("/admin/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&html).contains("visited 0 times"));
}

#[tokio::test]
async fn health_check_responds() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
