//! Domain layer: entities, ports and click accounting.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Persistence and counter ports
//! - [`click_event`] - Click event model
//! - [`click_worker`] - Bounded click queue and its background worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect resolver finds a live link
//! 2. A [`click_event::ClickEvent`] is offered to [`click_worker::ClickDispatcher`]
//! 3. [`click_worker::run_click_worker`] increments the counter via
//!    [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
