//! Filesystem sink used by the CLI commands.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use aisle_harvest::{DatasetSink, SinkError};

/// Writes each dataset to `<dir>/<name>.json`, pretty-printed.
///
/// The directory is created on first write. Re-persisting a name replaces
/// the previous file, so re-running a harvest leaves only the latest run.
#[derive(Debug)]
pub(crate) struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub(crate) fn new(dir: PathBuf) -> Self {
        JsonDirSink { dir }
    }
}

#[async_trait]
impl DatasetSink for JsonDirSink {
    async fn persist(&self, name: &str, dataset: &Value) -> Result<(), SinkError> {
        let bytes = serde_json::to_vec_pretty(dataset)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{name}.json"));
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), "dataset written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn writes_pretty_json_under_dataset_name() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = JsonDirSink::new(tmp.path().join("venue-a"));

        sink.persist("report", &json!({"unique_products": 8}))
            .await
            .expect("persist failed");

        let written = std::fs::read_to_string(tmp.path().join("venue-a/report.json"))
            .expect("read back");
        let value: Value = serde_json::from_str(&written).expect("parse back");
        assert_eq!(value, json!({"unique_products": 8}));
        // pretty printing puts the field on its own indented line
        assert!(written.contains("\n  \"unique_products\""));
    }

    #[tokio::test]
    async fn repersisting_a_name_replaces_the_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = JsonDirSink::new(tmp.path().to_path_buf());

        sink.persist("products", &json!({"run": 1}))
            .await
            .expect("persist failed");
        sink.persist("products", &json!({"run": 2}))
            .await
            .expect("persist failed");

        let written =
            std::fs::read_to_string(tmp.path().join("products.json")).expect("read back");
        let value: Value = serde_json::from_str(&written).expect("parse back");
        assert_eq!(value, json!({"run": 2}));
    }

    #[tokio::test]
    async fn unwritable_directory_surfaces_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"x").expect("write blocker");

        // blocker is a file, so creating a directory beneath it cannot work
        let sink = JsonDirSink::new(blocker.join("sub"));
        let result = sink.persist("report", &json!({})).await;
        match result {
            Err(SinkError::Io(_)) => {}
            other => panic!("expected Io error, got: {other:?}"),
        }
    }
}
