//! Integration test harness for the storefront.
//!
//! Tests drive the full router in-process against an in-memory `SQLite`
//! database: no server to start, no fixtures to clean up. Each
//! [`TestApp`] is a fully isolated storefront.
//!
//! ```rust,ignore
//! let mut app = TestApp::spawn().await;
//! app.register("amy@example.com", "Amy", "a long password").await;
//! let resp = app.get("/Cart").await;
//! assert_eq!(resp.status(), StatusCode::OK);
//! ```

#![allow(clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use rummage_core::{AccountId, Email, Price, ProductId, Role};
use rummage_storefront::config::StorefrontConfig;
use rummage_storefront::db::accounts::AccountRepository;
use rummage_storefront::db::products::ProductRepository;
use rummage_storefront::models::NewProduct;
use rummage_storefront::state::AppState;

/// An isolated storefront plus a cookie jar, acting as one browser.
pub struct TestApp {
    router: Router,
    pool: SqlitePool,
    /// Session cookie carried between requests, like a browser would.
    cookie: Option<String>,
}

impl TestApp {
    /// Spin up a storefront over a fresh in-memory database.
    pub async fn spawn() -> Self {
        Self::spawn_with_legacy_totals(false).await
    }

    /// Like [`TestApp::spawn`], with the legacy cart-total doubling on.
    pub async fn spawn_with_legacy_totals(legacy_cart_totals: bool) -> Self {
        // One connection keeps every handle on the same memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        rummage_storefront::db::MIGRATOR
            .run(&pool)
            .await
            .expect("migrations");

        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            base_url: "http://localhost:3000".to_owned(),
            legacy_cart_totals,
        };

        let state = AppState::new(config, pool.clone());
        let router = rummage_storefront::build_app(state)
            .await
            .expect("build app");

        Self {
            router,
            pool,
            cookie: None,
        }
    }

    /// Direct handle to the underlying database, for seeding and asserts.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Send a GET request, carrying the session cookie.
    pub async fn get(&mut self, path: &str) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("request");
        self.send(request).await
    }

    /// Send a POST with urlencoded form fields, carrying the session cookie.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).expect("encode form");
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::from(body)).expect("request");
        self.send(request).await
    }

    async fn send(&mut self, request: Request<Body>) -> Response<Body> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("cookie header");
            let pair = raw.split(';').next().unwrap_or(raw);
            self.cookie = Some(pair.to_owned());
        }

        response
    }

    /// Forget the session cookie, like opening a fresh browser.
    pub fn clear_session(&mut self) {
        self.cookie = None;
    }

    /// Register an account through the HTTP surface and stay logged in.
    pub async fn register(&mut self, email: &str, name: &str, password: &str) {
        let resp = self
            .post_form(
                "/register",
                &[
                    ("email", email),
                    ("display_name", name),
                    ("password", password),
                ],
            )
            .await;
        assert_redirects_to(&resp, "/");
    }

    /// Log in through the HTTP surface.
    pub async fn login(&mut self, email: &str, password: &str) -> Response<Body> {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Promote an account to admin directly in the database.
    pub async fn promote_to_admin(&self, email: &str) {
        let email: Email = email.parse().expect("email");
        let repo = AccountRepository::new(&self.pool);
        let (account, _) = repo
            .find_by_email(&email)
            .await
            .expect("query")
            .expect("account exists");
        repo.set_role(account.id, Role::Admin).await.expect("promote");
    }

    /// Look up an account id by email, for database-level asserts.
    pub async fn account_id(&self, email: &str) -> AccountId {
        let email: Email = email.parse().expect("email");
        let (account, _) = AccountRepository::new(&self.pool)
            .find_by_email(&email)
            .await
            .expect("query")
            .expect("account exists");
        account.id
    }

    /// Seed a product directly in the database.
    pub async fn seed_product(&self, name: &str, price: &str, stock: i64) -> ProductId {
        ProductRepository::new(&self.pool)
            .create(&NewProduct {
                name: name.to_owned(),
                size: "M".to_owned(),
                price: Price::parse(price).expect("price"),
                description: "test item".to_owned(),
                location: "Long Beach".to_owned(),
                stock,
            })
            .await
            .expect("seed product")
            .id
    }
}

/// Assert a response is a redirect to `location`.
pub fn assert_redirects_to(response: &Response<Body>, location: &str) {
    assert!(
        response.status() == StatusCode::SEE_OTHER
            || response.status() == StatusCode::TEMPORARY_REDIRECT
            || response.status() == StatusCode::FOUND,
        "expected redirect, got {}",
        response.status()
    );
    let target = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<missing>");
    assert_eq!(target, location, "unexpected redirect target");
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
