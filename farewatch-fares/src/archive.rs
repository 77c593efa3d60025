use std::path::{Path, PathBuf};
use tracing::{info, warn};

use farewatch_store::app_config::SnapshotConfig;

/// Writes fare snapshots and failure diagnostics to disk for later debugging.
///
/// Snapshots go to the first candidate path that accepts the write.
#[derive(Debug, Clone)]
pub struct SnapshotArchive {
    candidates: Vec<PathBuf>,
    diagnostics: PathBuf,
}

impl SnapshotArchive {
    pub fn new(candidates: Vec<PathBuf>, diagnostics: PathBuf) -> Self {
        Self { candidates, diagnostics }
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        Self::new(
            config.candidate_paths.iter().map(PathBuf::from).collect(),
            PathBuf::from(&config.diagnostics_path),
        )
    }

    /// Returns the path written, or `None` if no candidate was writable.
    pub async fn save_snapshot(&self, contents: &str) -> Option<PathBuf> {
        for path in &self.candidates {
            match tokio::fs::write(path, contents).await {
                Ok(()) => {
                    info!("Wrote fare snapshot to {}", path.display());
                    return Some(path.clone());
                }
                Err(e) => warn!("Could not write snapshot to {}: {}", path.display(), e),
            }
        }
        warn!("Failed to write fare snapshot to any candidate path");
        None
    }

    pub async fn save_diagnostic(&self, url: &str, error: &str) -> Option<PathBuf> {
        let contents = format!(
            "captured_at: {}\nurl: {}\nerror: {}\n",
            chrono::Utc::now().to_rfc3339(),
            url,
            error
        );
        match tokio::fs::write(&self.diagnostics, contents).await {
            Ok(()) => {
                info!("Diagnostic saved to {}", self.diagnostics.display());
                Some(self.diagnostics.clone())
            }
            Err(e) => {
                warn!("Could not write diagnostic to {}: {}", self.diagnostics.display(), e);
                None
            }
        }
    }

    pub fn diagnostics_path(&self) -> &Path {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_falls_through_to_writable_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let unwritable = dir.path().join("missing-dir").join("manual_search.html");
        let fallback = dir.path().join("manual_search.html");
        let archive = SnapshotArchive::new(
            vec![unwritable, fallback.clone()],
            dir.path().join("error_snapshot.txt"),
        );

        let written = archive.save_snapshot("<html></html>").await;

        assert_eq!(written, Some(fallback.clone()));
        assert_eq!(std::fs::read_to_string(fallback).unwrap(), "<html></html>");
    }

    #[tokio::test]
    async fn test_no_writable_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let archive = SnapshotArchive::new(
            vec![dir.path().join("a").join("x.html")],
            dir.path().join("b").join("err.txt"),
        );

        assert_eq!(archive.save_snapshot("x").await, None);
        assert_eq!(archive.save_diagnostic("https://example.test", "boom").await, None);
    }

    #[tokio::test]
    async fn test_diagnostic_contents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = SnapshotArchive::new(vec![], dir.path().join("error_snapshot.txt"));

        archive.save_diagnostic("https://example.test/search", "timed out").await.unwrap();

        let text = std::fs::read_to_string(archive.diagnostics_path()).unwrap();
        assert!(text.contains("url: https://example.test/search"));
        assert!(text.contains("error: timed out"));
    }
}
