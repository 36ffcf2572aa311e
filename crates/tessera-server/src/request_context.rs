use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tessera_core::{ProviderCredentials, RequestContext};

/// Middleware that constructs a `RequestContext` from the incoming request
///
/// Extracts HTTP parts and the per-provider credential headers into a
/// unified context for downstream handlers
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let credentials = ProviderCredentials::from_headers(&parts.headers);

    let context = RequestContext {
        parts: parts.clone(),
        credentials,
    };

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(context);

    next.run(request).await
}
