//! HTTP handlers for the Offers API

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{ApiResponse, ErrorBody, PageQuery, PageRequest, PaginationMeta};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OfferResult;
use crate::models::{
    CreateOffer, Currency, DeleteOffer, Offer, OfferFilter, Price, PriceType, UpdateOffer,
};
use crate::repository::{OfferRepository, ProductLookup};
use crate::service::OfferService;

/// Default page size for offer listings.
const DEFAULT_PAGE_SIZE: u64 = 50;

/// OpenAPI documentation for the Offers API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_offers,
        create_offers,
        update_full_offers,
        update_offers,
        delete_offers,
    ),
    components(
        schemas(
            Offer, Price, Currency, PriceType, CreateOffer, UpdateOffer,
            DeleteOffer, OfferFilter, ErrorBody
        )
    ),
    tags(
        (name = "Offers", description = "Offer endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the offers router with all HTTP endpoints
pub fn router<R, P>(service: OfferService<R, P>) -> Router
where
    R: OfferRepository + 'static,
    P: ProductLookup + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_offers)
                .post(create_offers)
                .put(update_full_offers)
                .patch(update_offers)
                .delete(delete_offers),
        )
        .with_state(shared_service)
}

/// List offers with filters and pagination
#[utoipa::path(
    get,
    path = "",
    tag = "Offers",
    params(OfferFilter, PageQuery),
    responses(
        (status = 200, description = "Paginated list of offers"),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn list_offers<R: OfferRepository, P: ProductLookup>(
    State(service): State<Arc<OfferService<R, P>>>,
    Query(filter): Query<OfferFilter>,
    Query(page): Query<PageQuery>,
) -> OfferResult<impl IntoResponse> {
    let total_count = service.count_offers(filter.clone()).await?;
    let meta = PaginationMeta::from_query(&page, total_count, DEFAULT_PAGE_SIZE);

    let offers = service
        .get_all_offers(filter, PageRequest::from(&meta))
        .await?;
    let meta = meta.with_count(offers.len());

    Ok(ApiResponse::success(offers).with_meta(meta))
}

/// Create a batch of offers
///
/// Fails with 404 naming every missing product sku before anything is
/// persisted; succeeds all-or-nothing with a freshly allocated offer id
/// per element.
#[utoipa::path(
    post,
    path = "",
    tag = "Offers",
    request_body = Vec<CreateOffer>,
    responses(
        (status = 201, description = "Offers created", body = Vec<Offer>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Referenced product not found", body = ErrorBody),
        (status = 409, description = "Offer sku or id already exists", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn create_offers<R: OfferRepository, P: ProductLookup>(
    State(service): State<Arc<OfferService<R, P>>>,
    Json(inputs): Json<Vec<CreateOffer>>,
) -> OfferResult<impl IntoResponse> {
    let (created, warnings) = service.create_offers(inputs).await?;
    Ok(ApiResponse::created(created).with_warnings(warnings))
}

/// Fully replace a batch of offers
#[utoipa::path(
    put,
    path = "",
    tag = "Offers",
    request_body = Vec<CreateOffer>,
    responses(
        (status = 201, description = "Offers replaced", body = Vec<Offer>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "One or more offers not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn update_full_offers<R: OfferRepository, P: ProductLookup>(
    State(service): State<Arc<OfferService<R, P>>>,
    Json(inputs): Json<Vec<CreateOffer>>,
) -> OfferResult<impl IntoResponse> {
    let (updated, warnings) = service.update_full_offers(inputs).await?;
    Ok(ApiResponse::created(updated).with_warnings(warnings))
}

/// Partially update a batch of offers
#[utoipa::path(
    patch,
    path = "",
    tag = "Offers",
    request_body = Vec<UpdateOffer>,
    responses(
        (status = 200, description = "Offers updated", body = Vec<Offer>),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "One or more offers not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn update_offers<R: OfferRepository, P: ProductLookup>(
    State(service): State<Arc<OfferService<R, P>>>,
    Json(inputs): Json<Vec<UpdateOffer>>,
) -> OfferResult<impl IntoResponse> {
    let (updated, warnings) = service.update_offers(inputs).await?;
    Ok(ApiResponse::success(updated).with_warnings(warnings))
}

/// Delete a batch of offers by sku
#[utoipa::path(
    delete,
    path = "",
    tag = "Offers",
    request_body = Vec<DeleteOffer>,
    responses(
        (status = 200, description = "Offers deleted; message reports the count"),
        (status = 500, description = "Server error", body = ErrorBody)
    )
)]
async fn delete_offers<R: OfferRepository, P: ProductLookup>(
    State(service): State<Arc<OfferService<R, P>>>,
    Json(inputs): Json<Vec<DeleteOffer>>,
) -> OfferResult<impl IntoResponse> {
    let (summary, warnings) = service.delete_offers(inputs).await?;
    Ok(ApiResponse::<Vec<Offer>>::message(summary).with_warnings(warnings))
}
