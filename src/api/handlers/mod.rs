//! One module per endpoint group.

pub mod health;
pub mod links;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::health_handler;
pub use links::{delete_link_handler, get_link_handler, list_links_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;
