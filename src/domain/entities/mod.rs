//! Core domain entities.
//!
//! - [`Link`] - An issued short link and its two-phase [`LinkState`]
//! - [`AuthUser`] - The authenticated caller

pub mod link;
pub mod user;

pub use link::{Link, LinkState, NewLink, short_url_for};
pub use user::AuthUser;
