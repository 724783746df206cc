// Snapshot file output
use crate::types::Snapshot;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Write `snapshot` as pretty JSON to `path`, creating the parent directory
///
/// The document goes to a sibling temp file first and is renamed over `path`,
/// so readers see either the previous snapshot or the new one in full.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

    let tmp = temp_path(path);
    tokio::fs::write(&tmp, json.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e).with_context(|| format!("Failed to move snapshot into {}", path.display()));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MarketIndicator;
    use chrono::{TimeZone, Utc};

    async fn read_snapshot(path: &Path) -> Snapshot {
        let raw = tokio::fs::read_to_string(path).await.unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cmc-data.json");

        let mut snapshot = Snapshot::new(Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap());
        snapshot.dominance = Some(57.12);
        write_snapshot(&path, &snapshot).await.unwrap();

        snapshot.dominance = None;
        snapshot.market_indicators.gold = Some(MarketIndicator::new(2650.5, Some(0.42)));
        write_snapshot(&path, &snapshot).await.unwrap();

        let back = read_snapshot(&path).await;
        assert_eq!(back, snapshot);
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_written_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let snapshot = Snapshot::new(Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap());
        write_snapshot(&path, &snapshot).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'), "expected pretty-printed output");

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], "2026-10-19T08:00:00Z");
        assert!(value["altseasonIndex"].is_null());
        assert!(value["marketIndicators"]["btcPrice"].is_null());
        assert!(value["marketIndicators"]["treasury10y"].is_null());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory already sits where the file should go
        let path = dir.path().join("cmc-data.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let snapshot = Snapshot::new(Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap());
        assert!(write_snapshot(&path, &snapshot).await.is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path(Path::new("data/cmc-data.json")),
            PathBuf::from("data/cmc-data.json.tmp")
        );
    }
}
