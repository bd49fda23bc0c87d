//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Catalog service for products (PostgreSQL) and offers (MongoDB)",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/offers", api = domain_offers::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints (PostgreSQL)"),
        (name = "Offers", description = "Offer endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;
