use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use registry::AppRegistry;
use shared::error::AppError;

const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Marker extractor for admin routes: the request must carry the shared
/// secret in `x-admin-password`, verified by the injected authorizer.
pub struct AdminUser;

#[async_trait]
impl FromRequestParts<AppRegistry> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::UnauthorizedError)?;
        registry.admin_authorizer().verify(presented)?;
        Ok(Self)
    }
}
