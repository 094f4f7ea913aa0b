use crate::commands::{CmdMessage, CmdResult};
use crate::error::{InvenError, Result};
use crate::model::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// Fixed version stamp written into every backup file.
const BACKUP_VERSION: &str = "1.0.0";

/// The downloadable backup payload: every collection plus provenance.
/// One-way on purpose; there is no restore path.
#[derive(Serialize)]
struct Backup<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

pub fn run(snapshot: &Snapshot, prefix: &str) -> Result<CmdResult> {
    let now = Utc::now();
    let filename = format!("{}-{}.json", prefix, now.format("%Y-%m-%d_%H:%M:%S"));
    let file = File::create(&filename).map_err(InvenError::Io)?;

    write_backup(file, snapshot, now)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Exported to {}", filename)));
    Ok(result)
}

fn write_backup<W: Write>(mut writer: W, snapshot: &Snapshot, timestamp: DateTime<Utc>) -> Result<()> {
    let backup = Backup {
        snapshot,
        timestamp,
        version: BACKUP_VERSION,
    };
    let content = serde_json::to_string_pretty(&backup).map_err(InvenError::Serialization)?;
    writer.write_all(content.as_bytes()).map_err(InvenError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::Warehouse;

    #[test]
    fn backup_carries_all_collections_and_provenance() {
        let fixture = Warehouse::new();
        let mut buf = Vec::new();
        let stamp = Utc::now();

        write_backup(&mut buf, fixture.inventory.snapshot(), stamp).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        for key in ["items", "racks", "shelves", "cartons", "binders", "containers"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert_eq!(
            value["timestamp"].as_str().unwrap(),
            stamp.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
        );
    }

    #[test]
    fn backup_of_empty_snapshot_is_valid_json() {
        let mut buf = Vec::new();
        write_backup(&mut buf, &Snapshot::default(), Utc::now()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 0);
    }
}
