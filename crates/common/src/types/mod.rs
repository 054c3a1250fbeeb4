use serde::Serialize;

/// Health probe response body.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
}
