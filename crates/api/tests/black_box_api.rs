use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use larder_api::app::build_app_with;
use larder_api::app::services::build_in_memory_services;
use larder_api::config::AppConfig;
use larder_auth::{LoginKey, TokenService};
use larder_infra::{AuditStore, InMemoryAuditStore};

struct TestServer {
    base_url: String,
    audit: Arc<InMemoryAuditStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: AppConfig) -> Self {
        // Same router as prod, bound to an ephemeral port, with a handle on
        // the audit store so tests can inspect and close it.
        let audit = Arc::new(InMemoryAuditStore::new());
        let services = build_in_memory_services(&config, AuditStore::InMemory(audit.clone()));
        let app = build_app_with(&config, services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            base_url,
            audit,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".into(),
        token_ttl_secs: 600,
        login_key: LoginKey::Username,
        bcrypt_cost: Some(4),
        sensitive_fields: HashSet::from(["password".to_string()]),
        use_persistent_stores: false,
        database_url: None,
        audit_database_url: None,
        audit_table: "request_logs".into(),
        bind_addr: "127.0.0.1:0".into(),
    }
}

fn mint_token(identity: &str) -> String {
    TokenService::new(b"test-secret", 600)
        .issue(identity)
        .expect("failed to mint token")
}

async fn register(client: &reqwest::Client, base_url: &str, username: &str, email: &str) {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "username": username, "email": email, "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Token is missing");

    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn expired_tokens_are_rejected() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    let expired = TokenService::new(b"test-secret", 600)
        .issue_at("mvictoria", chrono::Utc::now() - chrono::Duration::hours(2))
        .unwrap();
    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn liveness_routes_are_public() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "ok");

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_then_duplicate_conflicts() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "mvictoria",
            "email": "mvictoria@example.com",
            "password": "hunter22",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "User mvictoria registered successfully");

    // Same username, fresh email.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "mvictoria",
            "email": "other@example.com",
            "password": "hunter22",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "That username already exists");

    // Fresh username, same email.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "someoneelse",
            "email": "mvictoria@example.com",
            "password": "hunter22",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "That email already exists");
}

#[tokio::test]
async fn short_usernames_are_rejected_at_registration() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "username": "ab",
            "email": "ab@example.com",
            "password": "hunter22",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "username must be between 3 and 50 characters"
    );
}

#[tokio::test]
async fn login_round_trip_yields_a_usable_token() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "mvictoria", "mvictoria@example.com").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "mvictoria", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["access_token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "mvictoria", "mvictoria@example.com").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "mvictoria", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "nobodyhere", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn email_deployments_log_in_with_the_email_field() {
    let mut config = test_config();
    config.login_key = LoginKey::Email;
    let srv = TestServer::spawn(config).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "mvictoria", "mvictoria@example.com").await;

    // The username field is not an accepted identity under this key.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "mvictoria", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "mvictoria@example.com", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn branch_crud_round_trip() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .post(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen Central", "address": "12 Mabini St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Branch Kitchen Central created successfully");

    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Kitchen Central");
    let id = listed[0]["id"].as_i64().unwrap();

    let res = client
        .get(format!("{}/branches/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["address"], "12 Mabini St");

    // Partial update touches only the name.
    let res = client
        .put(format!("{}/branches/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen South" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Branch Kitchen South updated successfully");

    let res = client
        .get(format!("{}/branches/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["name"], "Kitchen South");
    assert_eq!(fetched["address"], "12 Mabini St");

    let res = client
        .delete(format!("{}/branches/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Branch deleted successfully");

    let res = client
        .get(format!("{}/branches/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Branch not found");
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    for path in ["/branches/999", "/branches/abc"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Branch not found");
    }
}

#[tokio::test]
async fn invalid_bodies_are_bad_requests() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    // Too-short name.
    let res = client
        .post(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "ab", "address": "12 Mabini St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "name must be between 3 and 50 characters");

    // Not JSON at all.
    let res = client
        .post(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Duplicate names conflict.
    for _ in 0..2 {
        let res = client
            .post(format!("{}/branches/", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({ "name": "Kitchen Central", "address": "12 Mabini St" }))
            .send()
            .await
            .unwrap();
        if res.status() == StatusCode::CREATED {
            continue;
        }
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Branch with this name already exists");
    }
}

#[tokio::test]
async fn collection_routes_require_the_trailing_slash() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .get(format!("{}/branches", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_tag_association_flow() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .post(format!("{}/products/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Adobo Rice Bowl",
            "variant_group_id": "mains",
            "sku": "ARB-001",
            "category_id": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/tags/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "bestseller" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/products/1/tags/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "tag_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Tag 1 added to Product 1 successfully");

    let res = client
        .get(format!("{}/products/1/tags/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let tags: serde_json::Value = res.json().await.unwrap();
    assert_eq!(tags.as_array().unwrap().len(), 1);
    assert_eq!(tags[0]["name"], "bestseller");

    // Attaching the same pair twice conflicts.
    let res = client
        .post(format!("{}/products/1/tags/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "tag_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Product tag with this product_id and tag_id already exists"
    );

    // Attaching to a product that does not exist.
    let res = client
        .post(format!("{}/products/99/tags/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "tag_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Product not found");

    let res = client
        .delete(format!("{}/products/1/tags/1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product tag deleted successfully");

    let res = client
        .delete(format!("{}/products/1/tags/1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Product tag not found");
}

#[tokio::test]
async fn recipe_lifecycle_on_the_key_pair() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .post(format!("{}/recipes/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "product_id": 7,
            "item_id": 3,
            "quantity": 0.25,
            "isTakeout": false,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Recipe for Product 7 and Item 3 created successfully"
    );

    // Duplicate key pair.
    let res = client
        .post(format!("{}/recipes/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "product_id": 7,
            "item_id": 3,
            "quantity": 1.0,
            "isTakeout": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Recipe with this product_id and item_id already exists"
    );

    let res = client
        .get(format!("{}/recipes/7/3", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["quantity"], 0.25);
    assert_eq!(fetched["isTakeout"], false);

    let res = client
        .put(format!("{}/recipes/7/3", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "isTakeout": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Recipe for Product 7 and Item 3 updated successfully"
    );

    let res = client
        .delete(format!("{}/recipes/7/3", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Recipe deleted successfully");

    let res = client
        .get(format!("{}/recipes/7/3", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Recipe not found");
}

#[tokio::test]
async fn stock_count_lifecycle_on_the_key_pair() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .post(format!("{}/branchstockcounts/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "branch_id": 2,
            "item_id": 5,
            "in_stock": 40.0,
            "ordered_qty": 12.0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Branch Stock Count for Branch 2 and Item 5 created successfully"
    );

    let res = client
        .put(format!("{}/branchstockcounts/2/5", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "in_stock": 33.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/branchstockcounts/2/5", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["in_stock"], 33.5);
    assert_eq!(fetched["ordered_qty"], 12.0);

    let res = client
        .delete(format!("{}/branchstockcounts/2/5", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Branch stock count deleted successfully");

    let res = client
        .get(format!("{}/branchstockcounts/2/5", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Branch stock count not found");
}

#[tokio::test]
async fn outlet_listing_filters_by_product() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    for (product_id, name) in [(1, "Cart Alpha"), (2, "Cart Beta")] {
        let res = client
            .post(format!("{}/outlets/", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({ "product_id": product_id, "name": name, "price": 120.0 }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/outlets/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let all: serde_json::Value = res.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{}/outlets/?product_id=1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let filtered: serde_json::Value = res.json().await.unwrap();
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered[0]["name"], "Cart Alpha");

    // An empty value means no filter.
    let res = client
        .get(format!("{}/outlets/?product_id=", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let unfiltered: serde_json::Value = res.json().await.unwrap();
    assert_eq!(unfiltered.as_array().unwrap().len(), 2);

    let res = client
        .get(format!("{}/outlets/?product_id=abc", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "product_id must be an integer");
}

#[tokio::test]
async fn mutations_are_audited_with_redacted_payloads() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "mvictoria", "mvictoria@example.com").await;

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "username": "mvictoria", "password": "hunter22" }))
        .send()
        .await
        .unwrap();
    let token = res.json::<serde_json::Value>().await.unwrap()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let res = client
        .post(format!("{}/branches/?source=app", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen Central", "address": "12 Mabini St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Reads do not append entries.
    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let entries = srv.audit.entries();
    assert_eq!(entries.len(), 3);

    let reg = &entries[0];
    assert_eq!(reg.method, "POST");
    assert_eq!(reg.endpoint, "/auth/register");
    assert_eq!(reg.ip, "127.0.0.1");
    assert_eq!(reg.actor, None);
    let payload = reg.payload.as_ref().unwrap();
    assert_eq!(payload["username"], "mvictoria");
    assert_eq!(payload["password"], "[REDACTED]");

    let login = &entries[1];
    assert_eq!(login.endpoint, "/auth/login");
    assert_eq!(login.payload.as_ref().unwrap()["password"], "[REDACTED]");

    let create = &entries[2];
    assert_eq!(create.endpoint, "/branches/");
    assert_eq!(create.actor.as_deref(), Some("mvictoria"));
    assert_eq!(create.query_params.get("source").map(String::as_str), Some("app"));
    assert!(create.path_params.is_empty());
    assert_eq!(create.payload.as_ref().unwrap()["name"], "Kitchen Central");
    assert_eq!(create.timestamp.timestamp_subsec_nanos(), 0);
}

#[tokio::test]
async fn audit_records_the_route_template_for_item_routes() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    let res = client
        .post(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen Central", "address": "12 Mabini St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .put(format!("{}/branches/1", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen South" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let entries = srv.audit.entries();
    let update = entries.last().unwrap();
    assert_eq!(update.endpoint, "/branches/:branch_id");
    assert_eq!(
        update.path_params.get("branch_id").map(String::as_str),
        Some("1")
    );
}

#[tokio::test]
async fn audit_failure_blocks_the_mutation() {
    let srv = TestServer::spawn(test_config()).await;
    let client = reqwest::Client::new();
    let token = mint_token("mvictoria");

    srv.audit.close();

    let res = client
        .post(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "name": "Kitchen Central", "address": "12 Mabini St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "audit store is closed");

    // The handler never ran: nothing was created, and reads still work.
    let res = client
        .get(format!("{}/branches/", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));
}
