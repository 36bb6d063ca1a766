//! JSONL file writer for pipeline run events.
//!
//! Each progress event is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use redline_application::PipelineProgress;
use redline_domain::{ExecutionResult, ExtractorResult, PluginName, RoutingResult};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL run logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every event so a
/// crashed run still leaves a readable log. Flushes again on `Drop`.
pub struct JsonlRunLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create run log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create run log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_event(&self, event_type: &str, mut payload: serde_json::Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        if let serde_json::Value::Object(map) = &mut payload {
            map.insert("type".to_string(), json!(event_type));
            map.insert("timestamp".to_string(), json!(timestamp));
        }

        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl PipelineProgress for JsonlRunLogger {
    fn on_routing_start(&self, total_chunks: usize, total_plugins: usize) {
        self.write_event(
            "routing_start",
            json!({ "chunks": total_chunks, "plugins": total_plugins }),
        );
    }

    fn on_routing_complete(&self, result: &RoutingResult) {
        self.write_event(
            "routing_complete",
            json!({
                "decisions": result.decisions.len(),
                "cost_usd": result.total_cost_usd,
                "routing_time_ms": result.routing_time_ms,
            }),
        );
    }

    fn on_plugin_start(&self, plugin: &PluginName, chunk_count: usize) {
        self.write_event(
            "plugin_start",
            json!({ "plugin": plugin.as_str(), "chunks": chunk_count }),
        );
    }

    fn on_plugin_attempt(&self, plugin: &PluginName, attempt: u32) {
        self.write_event(
            "plugin_attempt",
            json!({ "plugin": plugin.as_str(), "attempt": attempt }),
        );
    }

    fn on_plugin_complete(&self, result: &ExecutionResult) {
        self.write_event(
            "plugin_complete",
            json!({
                "plugin": result.plugin_name.as_str(),
                "success": result.success,
                "attempts": result.attempts,
                "duration_ms": result.duration_ms,
                "error": result.error(),
            }),
        );
    }

    fn on_extractor_complete(&self, result: &ExtractorResult) {
        self.write_event(
            "extractor_complete",
            json!({
                "extractor": result.extractor_id.as_str(),
                "issues": result.issues.len(),
                "duration_ms": result.duration_ms,
                "error": result.error,
            }),
        );
    }

    fn on_judge_complete(&self, accepted: usize, rejected: usize) {
        self.write_event(
            "judge_complete",
            json!({ "accepted": accepted, "rejected": rejected }),
        );
    }
}

impl Drop for JsonlRunLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_written_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.jsonl");

        let logger = JsonlRunLogger::new(&path).unwrap();
        logger.on_routing_start(4, 2);
        logger.on_plugin_start(&PluginName::new("spelling"), 4);
        logger.on_judge_complete(3, 1);
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "routing_start");
        assert_eq!(first["chunks"], 4);
        assert!(first["timestamp"].is_string());

        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["accepted"], 3);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/run.jsonl");
        let logger = JsonlRunLogger::new(&path);
        assert!(logger.is_some());
        assert!(path.exists());
    }
}
