//! Vessel data endpoint tests over the in-memory store.

mod common;

use axum::http::StatusCode;
use common::{TestApp, get, post_json, vessel};
use serde_json::{Value, json};
use vesselhire_backend::db::VesselFilter;

async fn count_for(app: &TestApp, name: &str) -> usize {
    app.state
        .vessels
        .list(&VesselFilter {
            vessel: Some(name.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
        .len()
}

async fn add(app: &TestApp, token: &str, body: Value) {
    let (status, response) = app
        .send(post_json("/api/vessels", Some(token), body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {response}");
}

#[tokio::test]
async fn test_staff_create_appends_exactly_one_row() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    add(&app, &token, vessel("Evergreen", "2024-01-01", 20000, 21000)).await;
    add(&app, &token, vessel("Poseidon", "2024-01-01", 18000, 17000)).await;
    let before = app.state.vessels.list(&VesselFilter::default()).await.unwrap();

    let (status, body) = app
        .send(post_json(
            "/api/vessels",
            Some(&token),
            vessel("Evergreen", "2024-01-01", 20000, 21000),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Vessel data added successfully");
    assert_eq!(body["data"]["vessel_name"], "Evergreen");
    assert_eq!(body["data"]["date"], "2024-01-01");
    assert_eq!(body["data"]["hire_rate"], 20000);
    assert_eq!(body["data"]["market_rate"], 21000);
    assert!(body["data"]["id"].is_i64());

    assert_eq!(count_for(&app, "Evergreen").await, 2);
    assert_eq!(count_for(&app, "Poseidon").await, 1);

    let after = app.state.vessels.list(&VesselFilter::default()).await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    for row in &before {
        assert!(after.contains(row), "existing row altered: {row:?}");
    }
}

#[tokio::test]
async fn test_non_staff_create_is_forbidden() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send(post_json(
            "/api/vessels",
            Some(&token),
            vessel("Evergreen", "2024-01-01", 20000, 21000),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
    assert_eq!(app.state.vessels.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .send(post_json(
            "/api/vessels",
            Some(&token),
            json!({ "vessel_name": "Evergreen", "date": "2024-01-01", "hire_rate": 1 }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = app
        .send(post_json(
            "/api/vessels",
            Some(&token),
            json!({ "vessel_name": "Evergreen", "date": "yesterday", "hire_rate": 1, "market_rate": 2 }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let malformed = axum::http::Request::builder()
        .method("POST")
        .uri("/api/vessels")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(app.state.vessels.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_coerces_float_rates() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .send(post_json(
            "/api/vessels",
            Some(&token),
            json!({ "vessel_name": "ExcelMarine", "date": "2024-05-05", "hire_rate": 19999.0, "market_rate": "20500" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["hire_rate"], 19999);
    assert_eq!(body["data"]["market_rate"], 20500);
}

#[tokio::test]
async fn test_list_orders_by_date_and_filters_by_exact_vessel() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    add(&app, &token, vessel("Poseidon", "2024-01-03", 3, 3)).await;
    add(&app, &token, vessel("Evergreen", "2024-01-01", 1, 1)).await;
    add(&app, &token, vessel("Poseidon II", "2024-01-02", 2, 2)).await;
    add(&app, &token, vessel("Poseidon", "2024-01-02", 4, 4)).await;

    let user = app.user_token().await;
    let (status, body) = app.send(get("/api/vessels", Some(&user))).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-02", "2024-01-03"]);
    assert!(body[0].get("id").is_none());

    let (status, body) = app
        .send(get("/api/vessels?vessel=Poseidon", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["vessel_name"] == "Poseidon"));
    assert_eq!(rows[0]["date"], "2024-01-02");

    let (status, body) = app
        .send(get("/api/vessels?vessel=Poseidon%20", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_date_bounds_are_inclusive() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"] {
        add(&app, &token, vessel("Evergreen", day, 1, 1)).await;
    }

    let (status, body) = app
        .send(get(
            "/api/vessels/?start_date=2024-01-02&end_date=2024-01-04",
            Some(&token),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-02", "2024-01-03", "2024-01-04"]);

    let (status, body) = app
        .send(get("/api/vessels?start_date=&end_date=", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (status, _) = app
        .send(get("/api/vessels?start_date=2024-02-30", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_aggregate_sums_across_vessels() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    add(&app, &token, vessel("V1", "2024-01-01", 100, 90)).await;
    add(&app, &token, vessel("V2", "2024-01-01", 200, 210)).await;

    let (status, body) = app
        .send(get("/api/vessels/aggregate", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "date": "2024-01-01", "total_hire": 300, "total_market": 300 }])
    );
}

#[tokio::test]
async fn test_aggregate_range_and_no_zero_fill() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    add(&app, &token, vessel("V1", "2024-01-01", 1, 1)).await;
    add(&app, &token, vessel("V1", "2024-01-03", 2, 2)).await;
    add(&app, &token, vessel("V2", "2024-01-05", 4, 4)).await;

    let (status, body) = app
        .send(get(
            "/api/vessels/aggregate/?start_date=2024-01-01&end_date=2024-01-03",
            Some(&token),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);
}

#[tokio::test]
async fn test_aggregate_requires_staff() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send(get("/api/vessels/aggregate", Some(&token)))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_endpoints_require_authentication() {
    let app = TestApp::new().await;

    for request in [
        get("/api/vessels", None),
        get("/api/vessels/aggregate", None),
        post_json("/api/vessels", None, vessel("Evergreen", "2024-01-01", 1, 1)),
    ] {
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }
    assert_eq!(app.state.vessels.count().await.unwrap(), 0);
}
