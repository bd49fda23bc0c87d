//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{ApiResponse, ErrorBody, PageQuery, PageRequest, PaginationMeta};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{Attribute, CreateProduct, DeleteProduct, Product, ProductFilter, UpdateProduct};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Default page size for product listings.
const DEFAULT_PAGE_SIZE: u64 = 50;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_by_sku,
        create_products,
        update_full_products,
        update_products,
        delete_products,
    ),
    components(
        schemas(
            Product, Attribute, CreateProduct, UpdateProduct, DeleteProduct,
            ProductFilter, ErrorBody
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints (PostgreSQL)")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_products)
                .post(create_products)
                .put(update_full_products)
                .patch(update_products)
                .delete(delete_products),
        )
        .route("/{sku}", get(get_by_sku))
        .with_state(shared_service)
}

/// List products with filters and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter, PageQuery),
    responses(
        (status = 200, description = "Paginated list of products"),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageQuery>,
) -> ProductResult<impl IntoResponse> {
    let total_count = service.count_products(filter.clone()).await?;
    let meta = PaginationMeta::from_query(&page, total_count, DEFAULT_PAGE_SIZE);

    let products = service
        .get_all_products(filter, PageRequest::from(&meta))
        .await?;
    let meta = meta.with_count(products.len());

    Ok(ApiResponse::success(products).with_meta(meta))
}

/// Get a product by sku
#[utoipa::path(
    get,
    path = "/{sku}",
    tag = "Products",
    params(
        ("sku" = String, Path, description = "Product SKU")
    ),
    responses(
        (status = 200, description = "Product found", body = Vec<Product>),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn get_by_sku<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(sku): Path<String>,
) -> ProductResult<impl IntoResponse> {
    let products = service.get_product_by_sku(&sku).await?;
    Ok(ApiResponse::success(products))
}

/// Create a batch of products
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = Vec<CreateProduct>,
    responses(
        (status = 201, description = "Products created", body = Vec<Product>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Duplicate sku", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn create_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(inputs): Json<Vec<CreateProduct>>,
) -> ProductResult<impl IntoResponse> {
    let (created, warnings) = service.create_products(inputs).await?;
    Ok(ApiResponse::created(created).with_warnings(warnings))
}

/// Fully replace a batch of products
#[utoipa::path(
    put,
    path = "",
    tag = "Products",
    request_body = Vec<CreateProduct>,
    responses(
        (status = 201, description = "Products replaced", body = Vec<Product>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn update_full_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(inputs): Json<Vec<CreateProduct>>,
) -> ProductResult<impl IntoResponse> {
    let (updated, warnings) = service.update_full_products(inputs).await?;
    Ok(ApiResponse::created(updated).with_warnings(warnings))
}

/// Partially update a batch of products
#[utoipa::path(
    patch,
    path = "",
    tag = "Products",
    request_body = Vec<UpdateProduct>,
    responses(
        (status = 200, description = "Products updated", body = Vec<Product>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn update_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(inputs): Json<Vec<UpdateProduct>>,
) -> ProductResult<impl IntoResponse> {
    let (updated, warnings) = service.update_products(inputs).await?;
    Ok(ApiResponse::success(updated).with_warnings(warnings))
}

/// Delete a batch of products by sku
#[utoipa::path(
    delete,
    path = "",
    tag = "Products",
    request_body = Vec<DeleteProduct>,
    responses(
        (status = 200, description = "Products deleted", body = Vec<Product>),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn delete_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Json(inputs): Json<Vec<DeleteProduct>>,
) -> ProductResult<impl IntoResponse> {
    let (deleted, warnings) = service.delete_products(inputs).await?;
    Ok(ApiResponse::success(deleted).with_warnings(warnings))
}
