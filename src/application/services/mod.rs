//! Services shared by the HTTP handlers and the admin CLI.

pub mod auth_service;
pub mod link_service;
pub mod quota_guard;
pub mod redirect_service;
pub mod stats_service;

pub use auth_service::AuthService;
pub use link_service::{IssuedLink, LinkService, LinkSettings};
pub use quota_guard::QuotaGuard;
pub use redirect_service::RedirectService;
pub use stats_service::{StatsService, UserLinkStats};
