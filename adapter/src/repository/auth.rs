use derive_new::new;

use kernel::repository::auth::AdminAuthorizer;
use shared::error::{AppError, AppResult};

/// Shared-secret admin gate. A plain equality check, injected through the
/// registry so a real credential store can replace it without touching the
/// handlers.
#[derive(new)]
pub struct SharedSecretAdminAuthorizer {
    password: String,
}

impl AdminAuthorizer for SharedSecretAdminAuthorizer {
    fn verify(&self, presented: &str) -> AppResult<()> {
        if presented == self.password {
            Ok(())
        } else {
            Err(AppError::UnauthorizedError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_configured_secret_passes() {
        let gate = SharedSecretAdminAuthorizer::new("canamadmin".into());
        assert!(gate.verify("canamadmin").is_ok());
        assert!(matches!(
            gate.verify("nope").unwrap_err(),
            AppError::UnauthorizedError
        ));
    }
}
