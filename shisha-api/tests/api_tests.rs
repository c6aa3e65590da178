//! Integration tests for the shisha-api endpoints
//!
//! Each test runs against its own freshly initialized, seeded database in a
//! temp directory, driving the router directly with tower's oneshot.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

use shisha_api::{build_router, AppState, RuntimeSettings};
use shisha_common::db::{init_database, seed_catalog};

struct TestCtx {
    app: axum::Router,
    db: SqlitePool,
    _dir: tempfile::TempDir,
}

/// Test helper: fresh database + seeded catalog + router (no notifier)
async fn setup() -> TestCtx {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = init_database(&dir.path().join("test.db"))
        .await
        .expect("init database");
    seed_catalog(&db).await.expect("seed catalog");

    let state = AppState::new(db.clone(), RuntimeSettings::default(), None);
    TestCtx {
        app: build_router(state),
        db,
        _dir: dir,
    }
}

/// Test helper: ids of the seeded flavors, ascending
async fn flavor_ids(db: &SqlitePool) -> Vec<i64> {
    sqlx::query_scalar("SELECT id FROM flavors ORDER BY id ASC")
        .fetch_all(db)
        .await
        .expect("list flavor ids")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    serde_json::from_slice(&bytes).expect("should parse JSON")
}

/// Create a valid two-ingredient mix and return its JSON representation
async fn create_mix(ctx: &TestCtx, name: &str, author_id: i64, ingredients: Value) -> Value {
    let request = post_json(
        "/api/mixes",
        json!({
            "name": name,
            "authorId": author_id,
            "ingredients": ingredients,
        }),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    extract_json(response.into_body()).await
}

// =============================================================================
// Health and status
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = setup().await;

    let response = ctx.app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_root_reports_onboarding_setting() {
    let ctx = setup().await;

    let response = ctx.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shisha-api");
    assert_eq!(body["onboardingEnabled"], true);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_brands_listing_sorted_with_counts() {
    let ctx = setup().await;

    let response = ctx.app.clone().oneshot(get("/api/brands")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let brands = body.as_array().unwrap();
    assert_eq!(brands.len(), 3);

    let names: Vec<&str> = brands.iter().map(|b| b["name"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    for brand in brands {
        assert!(brand["flavorCount"].as_i64().unwrap() > 0);
    }
}

#[tokio::test]
async fn test_brand_by_slug_with_flavors() {
    let ctx = setup().await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/brands/darkside"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Darkside");
    assert!(!body["flavors"].as_array().unwrap().is_empty());

    let missing = ctx
        .app
        .clone()
        .oneshot(get("/api/brands/no-such-brand"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_flavor_tag_filter() {
    let ctx = setup().await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/flavors?tag=MINT"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let flavors = body.as_array().unwrap();
    assert!(!flavors.is_empty());
    for flavor in flavors {
        let tags: Vec<&str> = flavor["flavorProfile"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert!(tags.contains(&"MINT"), "flavor without MINT tag in filter result");
    }
}

#[tokio::test]
async fn test_flavor_name_search() {
    let ctx = setup().await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/flavors?search=grape"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let flavors = body.as_array().unwrap();
    assert!(!flavors.is_empty());
    for flavor in flavors {
        let name = flavor["name"].as_str().unwrap().to_lowercase();
        assert!(name.contains("grape"));
    }
}

#[tokio::test]
async fn test_tags_listing() {
    let ctx = setup().await;

    let response = ctx.app.clone().oneshot(get("/api/tags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let tags = body.as_array().unwrap();
    assert_eq!(tags.len(), 20);
    assert!(tags.iter().any(|t| t["value"] == "MINT"));
}

// =============================================================================
// Mix creation
// =============================================================================

#[tokio::test]
async fn test_create_mix_rejects_sum_not_100() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    let request = post_json(
        "/api/mixes",
        json!({
            "name": "Broken",
            "authorId": 1,
            "ingredients": [
                {"flavorId": ids[0], "percentage": 60},
                {"flavorId": ids[1], "percentage": 30},
            ],
        }),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("sum to 100"));
}

#[tokio::test]
async fn test_create_mix_persists_both_ingredients() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    let mix = create_mix(
        &ctx,
        "Summer Breeze",
        1,
        json!([
            {"flavorId": ids[0], "percentage": 60},
            {"flavorId": ids[1], "percentage": 40},
        ]),
    )
    .await;

    assert_eq!(mix["name"], "Summer Breeze");
    assert!(mix["slug"].as_str().unwrap().starts_with("summer-breeze-"));
    assert_eq!(mix["strength"], "MEDIUM");
    assert_eq!(mix["likesCount"], 0);

    let ingredients = mix["ingredients"].as_array().unwrap();
    assert_eq!(ingredients.len(), 2);
    assert_eq!(ingredients[0]["percentage"], 60);
    assert_eq!(ingredients[1]["percentage"], 40);
    assert!(ingredients[0]["flavor"]["brand"]["name"].is_string());

    // readable through the detail endpoint
    let mix_id = mix["id"].as_i64().unwrap();
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/api/mixes/{}", mix_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_mix_missing_fields() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    // no name
    let request = post_json(
        "/api/mixes",
        json!({
            "authorId": 1,
            "ingredients": [{"flavorId": ids[0], "percentage": 100}],
        }),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // no ingredients
    let request = post_json("/api/mixes", json!({"name": "Empty", "authorId": 1}));
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_mix_unknown_flavor() {
    let ctx = setup().await;

    let request = post_json(
        "/api/mixes",
        json!({
            "name": "Ghost",
            "authorId": 1,
            "ingredients": [{"flavorId": 9999, "percentage": 100}],
        }),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Actions: likes, dislikes, orders
// =============================================================================

#[tokio::test]
async fn test_duplicate_like_counts_once() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "Liked Mix",
        1,
        json!([
            {"flavorId": ids[0], "percentage": 50},
            {"flavorId": ids[1], "percentage": 50},
        ]),
    )
    .await;
    let mix_id = mix["id"].as_i64().unwrap();
    let uri = format!("/api/mixes/{}/action", mix_id);

    for _ in 0..2 {
        let request = post_json(&uri, json!({"userId": 7, "type": "LIKE"}));
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        // duplicates are absorbed silently, not surfaced as errors
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM mix_actions WHERE user_id = 7 AND mix_id = ? AND type = 'LIKE'",
    )
    .bind(mix_id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(rows, 1);

    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/api/mixes/{}", mix_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["rating"], 1);
}

#[tokio::test]
async fn test_like_and_dislike_from_same_user() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "Contested Mix",
        1,
        json!([
            {"flavorId": ids[0], "percentage": 50},
            {"flavorId": ids[1], "percentage": 50},
        ]),
    )
    .await;
    let mix_id = mix["id"].as_i64().unwrap();
    let uri = format!("/api/mixes/{}/action", mix_id);

    for kind in ["LIKE", "DISLIKE"] {
        let request = post_json(&uri, json!({"userId": 7, "type": kind}));
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/api/mixes/{}", mix_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["likesCount"], 1);
    assert_eq!(body["dislikesCount"], 1);
    assert_eq!(body["rating"], 0);
}

#[tokio::test]
async fn test_orders_are_never_deduplicated() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "Ordered Mix",
        1,
        json!([
            {"flavorId": ids[0], "percentage": 50},
            {"flavorId": ids[1], "percentage": 50},
        ]),
    )
    .await;
    let mix_id = mix["id"].as_i64().unwrap();
    let uri = format!("/api/mixes/{}/action", mix_id);

    for _ in 0..3 {
        let request = post_json(
            &uri,
            json!({"userId": 1, "type": "ORDER", "tableNumber": 3}),
        );
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["type"], "ORDER");
        assert_eq!(body["tableNumber"], 3);
    }

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM mix_actions WHERE mix_id = ? AND type = 'ORDER'",
    )
    .bind(mix_id)
    .fetch_one(&ctx.db)
    .await
    .unwrap();
    assert_eq!(rows, 3);

    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/api/mixes/{}", mix_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ordersCount"], 3);
}

#[tokio::test]
async fn test_order_requires_table_number() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "Tableless",
        1,
        json!([{"flavorId": ids[0], "percentage": 100}]),
    )
    .await;

    let request = post_json(
        &format!("/api/mixes/{}/action", mix["id"].as_i64().unwrap()),
        json!({"userId": 1, "type": "ORDER"}),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_action_missing_user_or_type() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "Actionless",
        1,
        json!([{"flavorId": ids[0], "percentage": 100}]),
    )
    .await;
    let uri = format!("/api/mixes/{}/action", mix["id"].as_i64().unwrap());

    let request = post_json(&uri, json!({"type": "LIKE"}));
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = post_json(&uri, json!({"userId": 1}));
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_action_on_unknown_mix() {
    let ctx = setup().await;

    let request = post_json("/api/mixes/9999/action", json!({"userId": 1, "type": "LIKE"}));
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Mix listing
// =============================================================================

#[tokio::test]
async fn test_mix_listing_sorts() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    let first = create_mix(
        &ctx,
        "First Mix",
        1,
        json!([{"flavorId": ids[0], "percentage": 100}]),
    )
    .await;
    let second = create_mix(
        &ctx,
        "Second Mix",
        2,
        json!([{"flavorId": ids[1], "percentage": 100}]),
    )
    .await;

    // order the first mix once: popular sort should put it on top
    let request = post_json(
        &format!("/api/mixes/{}/action", first["id"].as_i64().unwrap()),
        json!({"userId": 3, "type": "ORDER", "tableNumber": 1}),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/mixes?sort=popular"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["id"], first["id"]);

    // newest first
    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/mixes?sort=new"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["id"], second["id"]);

    // author filter
    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/mixes?authorId=2"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let mixes = body.as_array().unwrap();
    assert_eq!(mixes.len(), 1);
    assert_eq!(mixes[0]["id"], second["id"]);
}

#[tokio::test]
async fn test_mix_listing_strength_filter() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    let request = post_json(
        "/api/mixes",
        json!({
            "name": "Strong One",
            "authorId": 1,
            "strength": "STRONG",
            "ingredients": [{"flavorId": ids[0], "percentage": 100}],
        }),
    );
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    create_mix(
        &ctx,
        "Default One",
        1,
        json!([{"flavorId": ids[1], "percentage": 100}]),
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/mixes?strength=STRONG"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let mixes = body.as_array().unwrap();
    assert_eq!(mixes.len(), 1);
    assert_eq!(mixes[0]["name"], "Strong One");
}

// =============================================================================
// User profile
// =============================================================================

#[tokio::test]
async fn test_user_actions_newest_first_with_mix_detail() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;
    let mix = create_mix(
        &ctx,
        "History Mix",
        1,
        json!([
            {"flavorId": ids[0], "percentage": 50},
            {"flavorId": ids[1], "percentage": 50},
        ]),
    )
    .await;
    let mix_id = mix["id"].as_i64().unwrap();
    let uri = format!("/api/mixes/{}/action", mix_id);

    let like = post_json(&uri, json!({"userId": 5, "type": "LIKE"}));
    ctx.app.clone().oneshot(like).await.unwrap();
    let order = post_json(&uri, json!({"userId": 5, "type": "ORDER", "tableNumber": 2}));
    ctx.app.clone().oneshot(order).await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/users/5/actions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let actions = body.as_array().unwrap();
    assert_eq!(actions.len(), 2);
    // newest first: the order came after the like
    assert_eq!(actions[0]["type"], "ORDER");
    assert_eq!(actions[1]["type"], "LIKE");
    assert_eq!(actions[0]["mix"]["name"], "History Mix");
    assert_eq!(
        actions[0]["mix"]["ingredients"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_user_lookup() {
    let ctx = setup().await;
    let ids = flavor_ids(&ctx.db).await;

    // creating a mix implicitly creates a bare user row for the author
    create_mix(
        &ctx,
        "Authored",
        42,
        json!([{"flavorId": ids[0], "percentage": 100}]),
    )
    .await;

    let response = ctx.app.clone().oneshot(get("/api/users/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["id"], 42);
    assert_eq!(body["role"], "GUEST");

    let missing = ctx.app.clone().oneshot(get("/api/users/404")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
