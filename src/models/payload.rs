use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Opaque input handle for a batch item.
///
/// The queue never inspects a payload beyond asking it for a human-readable label.
pub trait WorkPayload: Clone + Send + Sync + 'static {
    fn display_name(&self) -> String;
}

impl WorkPayload for PathBuf {
    fn display_name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

impl WorkPayload for String {
    fn display_name(&self) -> String {
        self.clone()
    }
}

/// A file selected for processing, as handed over by an upload surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub path: Option<PathBuf>,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
}

impl FileRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            size_bytes: 0,
            mime_type: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl WorkPayload for FileRef {
    fn display_name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display_name_uses_file_name() {
        let path = PathBuf::from("/uploads/2024/contract.pdf");
        assert_eq!(path.display_name(), "contract.pdf");
        assert_eq!(PathBuf::from("/").display_name(), "/");
    }

    #[test]
    fn test_file_ref_builder() {
        let file = FileRef::new("scan.png")
            .with_path("/tmp/scan.png")
            .with_size(2048)
            .with_mime_type("image/png");
        assert_eq!(file.display_name(), "scan.png");
        assert_eq!(file.size_bytes, 2048);
        assert_eq!(file.mime_type.as_deref(), Some("image/png"));
    }
}
