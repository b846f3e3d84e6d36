//! Click event model for asynchronous click accounting.

/// A redirect that should be counted.
///
/// Sent from the redirect path to the background worker so the response never
/// waits on the counter store. The code is carried for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
}

impl ClickEvent {
    pub fn new(link_id: i64, code: impl Into<String>) -> Self {
        Self {
            link_id,
            code: code.into(),
        }
    }
}
