//! Best-effort JSON snapshots of document metadata.
//!
//! The vector store has no durability; these files are the only record of
//! a document surviving a restart. Failures are logged and never fail the
//! calling operation.

use std::path::PathBuf;

use tracing::warn;
use uuid::Uuid;

use crate::domain::Document;

#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn file_path(&self, document_id: Uuid) -> PathBuf {
        self.path.join(format!("{document_id}.json"))
    }

    pub async fn write(&self, document: &Document) {
        if let Err(e) = tokio::fs::create_dir_all(&self.path).await {
            warn!(error = %e, path = %self.path.display(), "failed to create snapshot directory");
            return;
        }

        let json = match serde_json::to_vec_pretty(document) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, document_id = %document.id, "failed to serialize document snapshot");
                return;
            }
        };

        if let Err(e) = tokio::fs::write(self.file_path(document.id), json).await {
            warn!(error = %e, document_id = %document.id, "failed to write document snapshot");
        }
    }

    pub async fn remove(&self, document_id: Uuid) {
        let path = self.file_path(document_id);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, %document_id, "failed to remove document snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;

    #[tokio::test]
    async fn test_write_and_remove_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let doc = Document::new("a.txt", DocumentType::Txt, 10, "content");

        writer.write(&doc).await;
        let path = dir.path().join(format!("{}.json", doc.id));
        assert!(path.exists());

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["filename"], "a.txt");

        writer.remove(doc.id).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_snapshot_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        writer.remove(Uuid::new_v4()).await;
    }
}
