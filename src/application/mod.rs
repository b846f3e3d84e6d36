//! Use cases: issuing links, resolving codes, quotas, statistics and token
//! authentication.

pub mod services;
