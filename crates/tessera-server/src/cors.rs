use std::time::Duration;

use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use tessera_config::CorsConfig;

/// Build a Tower CORS layer from configuration
///
/// The canvas client sends custom credential headers, so headers and
/// methods stay permissive; only origins are restricted when configured
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any());

    layer = if config.origins.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<_> = config.origins.iter().filter_map(|origin| origin.parse().ok()).collect();
        layer.allow_origin(origins)
    };

    if let Some(max_age) = config.max_age {
        layer = layer.max_age(Duration::from_secs(max_age));
    }

    layer
}
