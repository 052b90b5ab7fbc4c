use shared::error::AppResult;

/// The admin gate: a single injected credential check. Deliberately not a
/// real auth system; the interface exists so one can be swapped in later.
pub trait AdminAuthorizer: Send + Sync {
    fn verify(&self, presented: &str) -> AppResult<()>;
}
