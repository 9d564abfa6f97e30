//! HTTP server for catalog endpoints
//!
//! Provides /health, /products, /products/simplified, /categories/tree and
//! /categories/most-specific. Product endpoints accept the filter criteria as
//! query parameters.

use crate::error::Result;
use crate::types::HealthResponse;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use product_catalog::{
    build_category_tree, category_paths, CatalogCache, ProductFilter, ProductSimplified,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

/// Shared state for the HTTP server
pub struct ServerState {
    pub catalog: CatalogCache,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(catalog: CatalogCache) -> Self {
        Self {
            catalog,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products))
        .route("/products/simplified", get(list_simplified_products))
        .route("/categories/tree", get(category_tree))
        .route("/categories/most-specific", get(most_specific_categories))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        collection: state.catalog.collection().to_string(),
        cache: state.catalog.stats(),
    })
}

/// Products of the latest export matching the query criteria
async fn list_products(
    State(state): State<SharedState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Response> {
    let products = state.catalog.products().await?;
    let matched = filter.apply(&products);
    debug!(total = products.len(), matched = matched.len(), "Listing products");

    Ok(Json(matched).into_response())
}

async fn list_simplified_products(
    State(state): State<SharedState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductSimplified>>> {
    let products = state.catalog.products().await?;
    let simplified = filter
        .apply(&products)
        .into_iter()
        .map(ProductSimplified::from)
        .collect();

    Ok(Json(simplified))
}

/// Category forest built from the matching products' breadcrumb paths
async fn category_tree(
    State(state): State<SharedState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Response> {
    let products = state.catalog.products().await?;
    let paths = category_paths(filter.apply(&products));

    Ok(Json(build_category_tree(&paths)).into_response())
}

/// Distinct most specific categories, sorted
async fn most_specific_categories(
    State(state): State<SharedState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<String>>> {
    let products = state.catalog.products().await?;
    let categories: BTreeSet<&str> = filter
        .apply(&products)
        .into_iter()
        .filter_map(|p| p.most_specific_category())
        .filter(|c| !c.is_empty())
        .collect();

    Ok(Json(categories.into_iter().map(str::to_string).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use object_store_gateway::MemoryObjectStore;
    use product_catalog::CatalogCacheConfig;
    use tower::ServiceExt;

    const COLLECTION: &str = "exports";

    const EXPORT: &str = r#"{"name": "Klohammare", "brand": "Acme", "offers": [{"price": "10,00", "availability": "InStock"}], "breadcrumbs": [{"name": "Tools"}, {"name": "Handheld"}, {"name": "Hammer"}], "additionalProperty": [{"name": "Tillverkare", "value": "Acme"}, {"name": "EAN", "value": "111"}]}

{"name": "Fogsvans", "offers": [{"price": "25,50", "availability": "OutOfStock"}], "breadcrumbs": [{"name": "Tools"}, {"name": "Handheld"}, {"name": "Saw"}], "additionalProperty": [{"name": "Tillverkare", "value": "Bahco"}]}
{not json
{"name": "Borrmaskin", "offers": [{"price": "999,00", "availability": "InStock"}], "breadcrumbs": [{"name": "Tools"}, {"name": "Machines"}]}
"#;

    async fn create_test_state(export: Option<&str>) -> SharedState {
        let store = Arc::new(MemoryObjectStore::new());
        if let Some(body) = export {
            store.put(COLLECTION, "latest.jl", Utc::now(), body).await;
        }

        let catalog = CatalogCache::new(
            store,
            CatalogCacheConfig {
                collection: COLLECTION.to_string(),
                ..CatalogCacheConfig::default()
            },
        );
        Arc::new(ServerState::new(catalog))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["collection"], COLLECTION);
        assert!(json["uptime_secs"].as_u64().is_some());
        assert!(json["cache"]["products"]["misses"].as_u64().is_some());
    }

    #[tokio::test]
    async fn test_products_unfiltered() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/products").await;

        assert_eq!(status, StatusCode::OK);
        let products = json.as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["name"], "Klohammare");
        assert_eq!(products[0]["additionalProperty"][0]["value"], "Acme");
    }

    #[tokio::test]
    async fn test_products_filtered_by_query() {
        let state = create_test_state(Some(EXPORT)).await;

        let get = |uri: &'static str| get_json(create_router(state.clone()), uri);

        let (_, json) = get("/products?manufacturer=ACME").await;
        assert_eq!(json.as_array().unwrap().len(), 1);

        let (_, json) = get("/products?minPrice=15&isInStock=true").await;
        let products = json.as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["name"], "Borrmaskin");

        let (_, json) = get("/products?category=handheld&maxPrice=20").await;
        assert_eq!(json.as_array().unwrap().len(), 1);

        // One export fetch shared by every request
        assert_eq!(state.catalog.stats().snapshot.misses, 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_ok() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/products?ean=does-not-exist").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_invalid_query_value_is_bad_request() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, _) = get_json(router, "/products?minPrice=cheap").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nan_price_bound_matches_nothing() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/products?minPrice=NaN").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_simplified_products() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/products/simplified?ean=111").await;

        assert_eq!(status, StatusCode::OK);
        let products = json.as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["title"], "Klohammare");
        assert_eq!(products[0]["categoryPath"], "Tools/Handheld/Hammer");
        assert_eq!(products[0]["mostSpecificCategory"], "Hammer");
        assert_eq!(products[0]["price"], 10.0);
        assert_eq!(products[0]["isInStock"], true);
    }

    #[tokio::test]
    async fn test_category_tree() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/categories/tree").await;

        assert_eq!(status, StatusCode::OK);
        let roots = json.as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["name"], "Tools");

        let children: Vec<&str> = roots[0]["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(children, vec!["Handheld", "Machines"]);
        assert_eq!(roots[0]["children"][0]["children"][1]["name"], "Saw");
    }

    #[tokio::test]
    async fn test_most_specific_categories() {
        let router = create_router(create_test_state(Some(EXPORT)).await);

        let (status, json) = get_json(router, "/categories/most-specific").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!(["Hammer", "Machines", "Saw"]));
    }

    #[tokio::test]
    async fn test_empty_collection_is_server_error() {
        let router = create_router(create_test_state(None).await);

        let response = router
            .oneshot(Request::builder().uri("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("No objects found in collection exports"));
    }

    #[test]
    fn test_server_state_new() {
        let catalog = CatalogCache::new(
            Arc::new(MemoryObjectStore::new()),
            CatalogCacheConfig::default(),
        );
        let state = ServerState::new(catalog);

        let diff = (Utc::now() - state.started_at).num_seconds();
        assert!(diff >= 0 && diff < 5);
    }
}
