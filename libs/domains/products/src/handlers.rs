//! HTTP handlers for the product catalog

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{BodyRejection, FailureBody, JsonOrForm};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{CatalogError, CatalogResult, PRODUCT_NOT_FOUND_MESSAGE};
use crate::models::{
    CreateProduct, DeletedProductResponse, ListQuery, Product, ProductListResponse,
    ProductResponse, UpdateProduct,
};
use crate::service::{CatalogService, require_id};
use crate::store::ProductStore;

/// OpenAPI documentation for the catalog endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, update_product, delete_product),
    components(schemas(
        Product,
        CreateProduct,
        UpdateProduct,
        ProductListResponse,
        ProductResponse,
        DeletedProductResponse,
        FailureBody
    )),
    tags(
        (name = "Products", description = "Product catalog endpoints. Failures answer `{success: false, error}`; branch on `success` rather than the status code.")
    )
)]
pub struct ApiDoc;

type SharedService<S> = State<Arc<CatalogService<S>>>;

/// Router exposing the catalog operations; mount it under `/products`.
pub fn router<S: ProductStore + 'static>(service: CatalogService<S>) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(Arc::new(service))
}

/// Body decode failures are reported as validation failures.
fn body_or_validation<T>(body: Result<JsonOrForm<T>, BodyRejection>) -> CatalogResult<T> {
    body.map(|JsonOrForm(value)| value)
        .map_err(|rejection| CatalogError::Validation(rejection.message))
}

/// List products, optionally only the first `limit`
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "Products in creation order", body = ProductListResponse),
        (status = 500, description = "Unexpected failure", body = FailureBody)
    )
)]
async fn list_products<S: ProductStore>(
    State(service): SharedService<S>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> CatalogResult<Json<ProductListResponse>> {
    // an unreadable query string is treated like an absent limit
    let limit = query.ok().and_then(|Query(q)| q.limit);
    let products = service.list_products(limit.as_deref()).await?;
    Ok(Json(ProductListResponse::ok(products)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(
        content = CreateProduct,
        description = "JSON or application/x-www-form-urlencoded body"
    ),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Missing required fields", body = FailureBody),
        (status = 500, description = "Unexpected failure", body = FailureBody)
    )
)]
async fn create_product<S: ProductStore>(
    State(service): SharedService<S>,
    body: Result<JsonOrForm<CreateProduct>, BodyRejection>,
) -> CatalogResult<impl IntoResponse> {
    let input = body_or_validation(body)?;
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::ok(product))))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = u64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Invalid id", body = FailureBody),
        (status = 404, description = "Product not found", body = FailureBody),
        (status = 500, description = "Unexpected failure", body = FailureBody)
    )
)]
async fn get_product<S: ProductStore>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
) -> Response {
    match service.get_product(&id).await {
        Ok(Some(product)) => Json(ProductResponse::ok(product)).into_response(),
        Ok(None) => {
            tracing::info!(id = %id, "Product lookup missed");
            FailureBody::message(PRODUCT_NOT_FOUND_MESSAGE).with_status(StatusCode::NOT_FOUND)
        }
        Err(e) => e.into_response(),
    }
}

/// Update a product with a partial body
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = u64, Path, description = "Product id")
    ),
    request_body(
        content = UpdateProduct,
        description = "JSON or application/x-www-form-urlencoded body"
    ),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid id or body", body = FailureBody),
        (status = 404, description = "Product not found", body = FailureBody),
        (status = 500, description = "Unexpected failure", body = FailureBody)
    )
)]
async fn update_product<S: ProductStore>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
    body: Result<JsonOrForm<UpdateProduct>, BodyRejection>,
) -> CatalogResult<Json<ProductResponse>> {
    // a bad id is reported ahead of a bad body
    require_id(&id)?;
    let changes = body_or_validation(body)?;
    let product = service.update_product(&id, changes).await?;
    Ok(Json(ProductResponse::ok(product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = u64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted", body = DeletedProductResponse),
        (status = 400, description = "Invalid id", body = FailureBody),
        (status = 404, description = "Product not found", body = FailureBody),
        (status = 500, description = "Unexpected failure", body = FailureBody)
    )
)]
async fn delete_product<S: ProductStore>(
    State(service): SharedService<S>,
    Path(id): Path<String>,
) -> CatalogResult<Json<DeletedProductResponse>> {
    let deleted = service.delete_product(&id).await?;
    Ok(Json(DeletedProductResponse::ok(deleted)))
}
