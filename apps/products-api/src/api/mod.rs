//! API routes module

pub mod products;

use axum::Router;
use core_config::storage::StorageConfig;

/// Create all API routes
pub async fn routes(storage: &StorageConfig) -> eyre::Result<Router> {
    Ok(Router::new().nest("/products", products::router(storage).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum_helpers::server::{create_router, health_router};
    use core_config::{app_info, server::ServerConfig};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let api = routes(&StorageConfig::default()).await.unwrap();
        create_router::<ApiDoc>(api, &ServerConfig::default())
            .unwrap()
            .merge(health_router(app_info!()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_products_are_served_under_api_prefix() {
        let app = app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "title": "A", "description": "B", "price": 10, "code": "C1" }).to_string(),
            ))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["product"]["id"], 1);

        let request = Request::builder()
            .uri("/api/products/1")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["code"], "C1");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_failure_envelope() {
        let app = app().await;

        let request = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_health_reports_app_info() {
        let app = app().await;

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "products_api");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_catalog_paths() {
        let app = app().await;

        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/products/{id}"].is_object());

        let description = body["info"]["description"].as_str().unwrap();
        assert!(description.contains("branch on `success`"));
    }
}
