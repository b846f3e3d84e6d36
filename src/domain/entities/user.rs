//! Authenticated caller identity.

/// The user a request acts on behalf of, resolved from its API token.
///
/// Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}
