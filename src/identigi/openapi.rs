use super::handlers::{health, me, user_login, user_register, user_update};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(user_register::register, user_update::update_user))
        .routes(routes!(user_login::login))
        .routes(routes!(me::me))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    let mut users_tag = Tag::new("users");
    users_tag.description = Some("Registration and profile updates".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Phone number and password login".to_string());

    let mut me_tag = Tag::new("me");
    me_tag.description = Some("Logged in user profile".to_string());

    OpenApiBuilder::new()
        .info(info)
        .tags(Some(vec![users_tag, auth_tag, me_tag]))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_operations_are_documented() {
        let (_router, openapi) = api_router().split_for_parts();
        let spec = serde_json::to_value(&openapi).expect("openapi json");

        assert!(spec["paths"]["/health"]["get"].is_object());
        assert!(spec["paths"]["/users"]["post"].is_object());
        assert!(spec["paths"]["/users"]["patch"].is_object());
        assert!(spec["paths"]["/auth"]["post"].is_object());
        assert!(spec["paths"]["/me"]["get"].is_object());
        assert_eq!(spec["info"]["title"], env!("CARGO_PKG_NAME"));
    }
}
