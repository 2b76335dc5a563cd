use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ingest request body as posted by a device.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingPayload {
    pub device_id: String,
    pub temperature_c: f64,
    /// Device-reported observation time, free form. Absent when the device
    /// has no clock fix.
    pub timestamp: Option<String>,
}

/// One persisted reading.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Reading {
    pub id: i64,
    pub device_id: String,
    pub temperature_c: f64,
    pub measured_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Identifiers handed back by the insert.
#[derive(Debug, sqlx::FromRow)]
pub struct InsertedReading {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub measured_at: Option<DateTime<Utc>>,
}

/// Successful ingest response.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: &'static str,
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub measured_at: Option<DateTime<Utc>>,
}

/// Listing row, with the observation instant rendered in Brazil local time
/// for display.
#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub id: i64,
    pub device_id: String,
    pub temperature_c: f64,
    pub measurement_br: Option<String>,
}

impl From<Reading> for ReadingView {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id,
            device_id: reading.device_id,
            temperature_c: reading.temperature_c,
            measurement_br: reading
                .measured_at
                .map(|utc| timestamp::to_brazil(utc).to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_view_renders_measured_at_in_brazil_time() {
        let reading = Reading {
            id: 7,
            device_id: "logger-01".to_string(),
            temperature_c: 23.12,
            measured_at: Some(Utc.with_ymd_and_hms(2025, 11, 24, 1, 55, 4).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 11, 24, 1, 55, 5).unwrap(),
        };

        let view = ReadingView::from(reading);
        assert_eq!(
            view.measurement_br.as_deref(),
            Some("2025-11-23T22:55:04-03:00")
        );
    }

    #[test]
    fn test_view_keeps_missing_measured_at_null() {
        let reading = Reading {
            id: 8,
            device_id: "logger-02".to_string(),
            temperature_c: -4.5,
            measured_at: None,
            created_at: Utc.with_ymd_and_hms(2025, 11, 24, 2, 0, 0).unwrap(),
        };

        let view = ReadingView::from(reading);
        assert_eq!(view.measurement_br, None);

        let body = serde_json::to_value(&view).unwrap();
        assert!(body["measurement_br"].is_null());
    }

    #[test]
    fn test_payload_accepts_missing_timestamp() {
        let payload: ReadingPayload =
            serde_json::from_str(r#"{"device_id":"logger-01","temperature_c":23.12}"#).unwrap();
        assert_eq!(payload.device_id, "logger-01");
        assert!(payload.timestamp.is_none());
    }
}
