use super::handlers::{
    auth::{callback, relay, role, session},
    health,
};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated spec. The role router on `/` is intentionally
/// not documented; it only ever answers with a redirect.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(callback::callback))
        .routes(routes!(relay::microsoft_login))
        .routes(routes!(relay::microsoft_callback))
        .routes(routes!(role::role))
        .routes(routes!(session::logout));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description =
        Some("OAuth relay, callback resolution, session and role endpoints".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service health".to_string());

    let mut openapi = router.to_openapi();
    openapi.tags = Some(vec![auth_tag, health_tag]);

    OpenApiRouter::with_openapi(openapi).merge(router)
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}
