//! Request and response bodies. Incoming bodies are checked with `validator`
//! before any service is called.

pub mod health;
pub mod links;
pub mod shorten;
pub mod stats;
