//! JSON helpers with validated input and contextual errors.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Rejects empty input before handing it to serde.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Writes pretty JSON next to `path` and renames it into place, so a crash
/// mid-write never leaves a truncated file behind.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = to_json_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", tmp)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("replacing {:?}", path)))?;
    Ok(())
}

pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vivarium_data::{LiveEvent, RewardKind};

    #[test]
    fn test_empty_json_fails() {
        let result: Result<RewardKind> = from_json("   ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_invalid_json_fails() {
        let result: Result<RewardKind> = from_json("{ invalid json");
        assert!(result.is_err());
    }

    #[test]
    fn test_events_are_tagged() {
        let json = to_json(&RewardKind::Coin { value: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"Coin","value":3}"#);
        let event: LiveEvent =
            from_json(r#"{"event":"Poked","id":"slime-1-00000000000000000000000000000001","tick":4}"#)
                .unwrap();
        assert_eq!(event.tick(), 4);
    }

    #[test]
    fn test_missing_file_reports_not_found() {
        let path = std::env::temp_dir().join(format!("vivarium-missing-{}.json", uuid::Uuid::new_v4()));
        let err = read_json_file::<RewardKind, _>(&path).unwrap_err();
        assert!(err.is_not_found());
    }
}
