//! HTTP surface: `/api` JSON endpoints and the `/{code}` redirect.
//!
//! Handlers stay thin. They parse the request, call one application service
//! and shape the reply; every failure leaves through [`crate::error::AppError`].

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
