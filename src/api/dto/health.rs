//! Health report body.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    Up,
    Down,
}

/// Outcome of probing a single dependency.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub state: Probe,
    pub detail: String,
}

impl ComponentHealth {
    pub fn up(detail: impl Into<String>) -> Self {
        Self {
            state: Probe::Up,
            detail: detail.into(),
        }
    }

    pub fn down(detail: impl Into<String>) -> Self {
        Self {
            state: Probe::Down,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Components {
    pub database: ComponentHealth,
    pub click_queue: ComponentHealth,
    pub cache: ComponentHealth,
}

impl Components {
    pub fn all_up(&self) -> bool {
        [&self.database, &self.click_queue, &self.cache]
            .iter()
            .all(|c| c.state == Probe::Up)
    }
}

/// `GET /api/health` body; `status` is `healthy` or `degraded`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub components: Components,
}
