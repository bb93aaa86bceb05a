//! Admin catalog management: role enforcement and product CRUD.

use axum::http::StatusCode;

use rummage_integration_tests::{TestApp, assert_redirects_to, body_json};

async fn logged_in_admin(app: &mut TestApp) {
    app.register("admin@example.com", "Admin", "a long password").await;
    app.promote_to_admin("admin@example.com").await;
    // Re-login so the session carries the admin role.
    app.clear_session();
    let resp = app.login("admin@example.com", "a long password").await;
    assert_redirects_to(&resp, "/");
}

#[tokio::test]
async fn test_admin_routes_redirect_anonymous_to_login() {
    let mut app = TestApp::spawn().await;

    for path in ["/add", "/delete?id=1", "/image?id=1", "/uploader?id=1"] {
        let resp = app.get(path).await;
        assert_redirects_to(&resp, "/login");
    }
}

#[tokio::test]
async fn test_admin_routes_forbid_customers() {
    let mut app = TestApp::spawn().await;
    app.register("amy@example.com", "Amy", "a long password").await;

    for path in ["/add", "/delete?id=1", "/image?id=1", "/uploader?id=1"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "GET {path}");
    }

    let resp = app.post_form("/add", &[("name", "Cap")]).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_creates_product() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;

    let resp = app
        .post_form(
            "/add",
            &[
                ("name", "Dodgers Jacket"),
                ("size", "Large"),
                ("price", "74.99"),
                ("description", "Vintage satin bomber"),
                ("location", "Long Beach"),
                ("stock", "1"),
            ],
        )
        .await;
    assert_redirects_to(&resp, "/");

    let resp = app.get("/").await;
    let json = body_json(resp).await;
    assert_eq!(json["products"][0]["name"], "Dodgers Jacket");
    assert_eq!(json["products"][0]["price"], "74.99");
}

#[tokio::test]
async fn test_duplicate_product_name_bounces_back() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;
    app.seed_product("Dodgers Jacket", "74.99", 1).await;

    let resp = app
        .post_form(
            "/add",
            &[
                ("name", "Dodgers Jacket"),
                ("size", "Small"),
                ("price", "10.00"),
                ("description", "Another one"),
                ("location", "LA"),
                ("stock", "2"),
            ],
        )
        .await;
    assert_redirects_to(&resp, "/add?error=name_taken");
}

#[tokio::test]
async fn test_add_rejects_bad_price_and_stock() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;

    let base = [
        ("name", "Cap"),
        ("size", "M"),
        ("description", "A cap"),
        ("location", "LA"),
    ];

    let mut fields = base.to_vec();
    fields.push(("price", "free"));
    fields.push(("stock", "1"));
    let resp = app.post_form("/add", &fields).await;
    assert_redirects_to(&resp, "/add?error=invalid_price");

    let mut fields = base.to_vec();
    fields.push(("price", "-5.00"));
    fields.push(("stock", "1"));
    let resp = app.post_form("/add", &fields).await;
    assert_redirects_to(&resp, "/add?error=invalid_price");

    let mut fields = base.to_vec();
    fields.push(("price", "10.00"));
    fields.push(("stock", "-1"));
    let resp = app.post_form("/add", &fields).await;
    assert_redirects_to(&resp, "/add?error=invalid_stock");
}

#[tokio::test]
async fn test_delete_product() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;
    let id = app.seed_product("Cap", "10.00", 1).await;

    let resp = app.get(&format!("/delete?id={id}")).await;
    assert_redirects_to(&resp, "/");

    let resp = app.get("/").await;
    let json = body_json(resp).await;
    assert_eq!(json["products"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_delete_missing_product_is_clean_404() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;

    let resp = app.get("/delete?id=999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_assignment_flow() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;
    let id = app.seed_product("Cap", "10.00", 1).await;

    let resp = app.get(&format!("/image?id={id}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["name"], "Cap");
    assert!(json["image_path"].is_null());

    let resp = app
        .post_form(&format!("/uploader?id={id}"), &[("filepath", "img/cap.jpg")])
        .await;
    assert_redirects_to(&resp, "/");

    let resp = app.get(&format!("/image?id={id}")).await;
    let json = body_json(resp).await;
    assert_eq!(json["image_path"], "img/cap.jpg");
}

#[tokio::test]
async fn test_uploader_requires_filepath() {
    let mut app = TestApp::spawn().await;
    logged_in_admin(&mut app).await;
    let id = app.seed_product("Cap", "10.00", 1).await;

    let resp = app.post_form(&format!("/uploader?id={id}"), &[]).await;
    assert_redirects_to(&resp, &format!("/image?id={id}&error=missing_filepath"));
}
