use crate::errors::{Error, Result};
use crate::model::ReadingPayload;

/// Shape checks beyond what deserialization already enforces. Temperature is
/// deliberately not range-checked: the device reports whatever its sensor
/// says, outliers included.
pub fn validate(payload: &ReadingPayload) -> Result<()> {
    if payload.device_id.trim().is_empty() {
        return Err(Error::Validation(
            "device_id must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(device_id: &str, temperature_c: f64) -> ReadingPayload {
        ReadingPayload {
            device_id: device_id.to_string(),
            temperature_c,
            timestamp: None,
        }
    }

    #[test]
    fn test_valid_payload() {
        assert!(validate(&payload("logger-01", 23.12)).is_ok());
    }

    #[test]
    fn test_empty_device_id() {
        assert!(validate(&payload("", 23.12)).is_err());
    }

    #[test]
    fn test_blank_device_id() {
        assert!(validate(&payload("   ", 23.12)).is_err());
    }

    #[test]
    fn test_zero_and_negative_temperatures_are_accepted() {
        assert!(validate(&payload("logger-01", 0.0)).is_ok());
        assert!(validate(&payload("logger-01", -18.5)).is_ok());
    }
}
