use serde::Serialize;

/// Ingest payload as the API expects it.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingPayload {
    pub device_id: String,
    pub temperature_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
