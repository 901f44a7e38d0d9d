//! API integration tests for tile retrieval and error handling.
//!
//! Tests verify:
//! - Tile retrieval, empty tiles and id-filtered tiles
//! - Validation failures never reach the store
//! - Store failures surface as generic server errors
//! - HTTP response codes and headers

use axum::http::StatusCode;

use odh_tile_proxy::error::StoreError;
use odh_tile_proxy::query::QueryValue;
use odh_tile_proxy::tile::tile_bounds;

use super::test_utils::{
    body_bytes, body_json, get, post_json, router_for, MockTileStore, SAMPLE_TILE,
};

// =============================================================================
// Basic Tile Retrieval
// =============================================================================

#[tokio::test]
async fn test_tile_retrieval_success() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(router_for(&store), "/tiles/odhactivitypoi/14/2621/6333").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/vnd.mapbox-vector-tile"
    );
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );

    // Bytes are passed through untouched
    let body = body_bytes(response).await;
    assert_eq!(&body[..], SAMPLE_TILE);
}

#[tokio::test]
async fn test_tile_query_targets_mapped_table() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(router_for(&store), "/tiles/odhactivitypoi/14/2621/6333").await;
    assert_eq!(response.status(), StatusCode::OK);

    let query = store.last_query();
    assert!(query.sql().contains("FROM smgpois AS t"));
    assert!(query.sql().contains("ST_Transform(t.geo, 3857)"));

    let bbox = tile_bounds(2621, 6333, 14);
    assert_eq!(query.param("xmin"), Some(&QueryValue::Float(bbox.xmin)));
    assert_eq!(query.param("ymax"), Some(&QueryValue::Float(bbox.ymax)));
    assert!(query.param("source").is_none());
    assert!(query.param("ids").is_none());
}

#[tokio::test]
async fn test_tile_with_extension() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);

    let response = get(router_for(&store), "/tiles/event/3/4/2.pbf").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(router_for(&store), "/tiles/event/3/4/2.mvt").await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(store.request_count(), 2);
}

#[tokio::test]
async fn test_empty_tile_is_no_content() {
    let store = MockTileStore::empty();
    let response = get(router_for(&store), "/tiles/odhactivitypoi/14/2621/6333").await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().get("content-type").is_none());
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(store.request_count(), 1);
}

#[tokio::test]
async fn test_query_parameters_applied() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(
        router_for(&store),
        "/tiles/odhactivitypoi/10/545/361?source=suedtirolwein&fieldselector=Detail.de.Title,Shortname&geocolumn=gen_position",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let query = store.last_query();
    assert!(query.sql().contains("t.gen_position IS NOT NULL"));
    assert!(query
        .sql()
        .contains("t.data#>>'{Detail,de,Title}' AS \"Detail.de.Title\""));
    assert!(!query.sql().contains("suedtirolwein"));
    assert_eq!(
        query.param("source"),
        Some(&QueryValue::Text("suedtirolwein".to_string()))
    );
}

#[tokio::test]
async fn test_empty_query_parameters_ignored() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(
        router_for(&store),
        "/tiles/odhactivitypoi/0/0/0?source=&geocolumn=&fieldselector=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let query = store.last_query();
    assert!(query.param("source").is_none());
    assert!(query.sql().contains("t.geo IS NOT NULL"));
}

// =============================================================================
// Id Filter
// =============================================================================

#[tokio::test]
async fn test_post_with_ids() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = post_json(
        router_for(&store),
        "/tiles/odhactivitypoi/14/2621/6333",
        r#"["SMGPOI1", "SMGPOI2"]"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let query = store.last_query();
    assert!(query.sql().contains("AND t.id = ANY($5)"));
    assert!(!query.sql().contains("AND WHERE"));
    assert_eq!(
        query.param("ids"),
        Some(&QueryValue::TextArray(vec![
            "SMGPOI1".to_string(),
            "SMGPOI2".to_string()
        ]))
    );
}

#[tokio::test]
async fn test_post_with_ids_and_source() {
    let store = MockTileStore::empty();
    let response = post_json(
        router_for(&store),
        "/tiles/accommodation/12/2181/1451?source=lts",
        r#"["A1"]"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let query = store.last_query();
    assert_eq!(query.placeholder("source").as_deref(), Some("$5"));
    assert_eq!(query.placeholder("ids").as_deref(), Some("$6"));
    assert!(query.sql().contains("FROM accommodations AS t"));
}

#[tokio::test]
async fn test_post_with_malformed_body() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = post_json(
        router_for(&store),
        "/tiles/odhactivitypoi/14/2621/6333",
        r#"{"ids": "SMGPOI1"}"#,
    )
    .await;

    assert!(response.status().is_client_error());
    assert_eq!(store.request_count(), 0);
}

// =============================================================================
// Validation Errors
// =============================================================================

async fn assert_rejected(uri: &str, expected_error: &str) {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(router_for(&store), uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    let error = body_json(response).await;
    assert_eq!(error["error"], expected_error, "{}", uri);
    assert_eq!(error["status"], 400);
    assert_eq!(store.request_count(), 0, "{} reached the store", uri);
}

#[tokio::test]
async fn test_off_by_one_coordinates() {
    assert_rejected("/tiles/odhactivitypoi/1/2/0", "invalid_coordinates").await;
    assert_rejected("/tiles/odhactivitypoi/1/0/2", "invalid_coordinates").await;
    assert_rejected("/tiles/odhactivitypoi/14/16384/0", "invalid_coordinates").await;
    assert_rejected("/tiles/odhactivitypoi/14/-1/0", "invalid_coordinates").await;
}

#[tokio::test]
async fn test_unparseable_row() {
    assert_rejected("/tiles/odhactivitypoi/14/2621/6333.png", "invalid_coordinates").await;

    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(router_for(&store), "/tiles/odhactivitypoi/14/2621/6333.png").await;
    let error = body_json(response).await;
    assert!(error["message"].as_str().unwrap().contains("6333.png"));
}

#[tokio::test]
async fn test_zoom_limits() {
    assert_rejected("/tiles/odhactivitypoi/23/0/0", "invalid_zoom").await;

    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let response = get(router_for(&store), "/tiles/odhactivitypoi/22/0/0").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_entity_type() {
    assert_rejected("/tiles/smgpois/0/0/0", "unknown_entity_type").await;
}

#[tokio::test]
async fn test_invalid_geometry_column() {
    assert_rejected(
        "/tiles/odhactivitypoi/14/2621/6333?geocolumn=other",
        "invalid_geometry_column",
    )
    .await;
}

#[tokio::test]
async fn test_invalid_field_selector() {
    assert_rejected(
        "/tiles/odhactivitypoi/0/0/0?fieldselector=Detail.de.Title,Password",
        "invalid_field_selector",
    )
    .await;
}

#[tokio::test]
async fn test_injection_attempt_in_geometry_column() {
    assert_rejected(
        "/tiles/odhactivitypoi/0/0/0?geocolumn=geo%29%3B%20DROP%20TABLE%20smgpois%3B--",
        "invalid_geometry_column",
    )
    .await;
}

// =============================================================================
// Store Errors
// =============================================================================

#[tokio::test]
async fn test_store_failure_is_server_error() {
    let store = MockTileStore::failing(StoreError::Query(
        "relation \"smgpois\" does not exist".to_string(),
    ));
    let response = get(router_for(&store), "/tiles/odhactivitypoi/0/0/0").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = body_json(response).await;
    assert_eq!(error["error"], "store_error");
    // Store details stay in the logs
    assert!(!error["message"].as_str().unwrap().contains("smgpois"));
    assert_eq!(store.request_count(), 1);
}

#[tokio::test]
async fn test_store_connection_failure() {
    let store = MockTileStore::failing(StoreError::Connection("pool timed out".to_string()));
    let response = get(router_for(&store), "/tiles/event/5/17/11").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Auxiliary Endpoints
// =============================================================================

#[tokio::test]
async fn test_health() {
    let store = MockTileStore::empty();
    let response = get(router_for(&store), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_catalog() {
    let store = MockTileStore::empty();
    let response = get(router_for(&store), "/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);

    let catalog = body_json(response).await;
    let entity_types = catalog["entity_types"].as_array().unwrap();
    assert!(entity_types.iter().any(|e| e == "odhactivitypoi"));
    assert_eq!(catalog["default_geometry_column"], "geo");
    assert_eq!(
        catalog["geometry_columns"],
        serde_json::json!(["geo", "gen_position", "geometry"])
    );
    assert!(catalog["field_selectors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "Detail.de.Title"));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let store = MockTileStore::with_tile(SAMPLE_TILE);
    let router = router_for(&store);

    let handles: Vec<_> = (0..16u32)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                get(router, &format!("/tiles/odhactivitypoi/5/{}/{}", i, 31 - i)).await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().status(), StatusCode::OK);
    }
    assert_eq!(store.request_count(), 16);
}
