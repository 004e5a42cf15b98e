use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::library::Library;
use crate::domain::repository::LibraryRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed library file: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるLibraryRepository実装。
/// ファイル全体がレコードの配列で、保存のたびに丸ごと書き直す。
pub struct JsonLibraryRepository {
    path: PathBuf,
}

impl JsonLibraryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LibraryRepository for JsonLibraryRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "library file not found");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let library: Library = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), books = library.len(), "library loaded");
        Ok(Some(library))
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = to_pretty_json(library)?;
        let tmp = self.path.with_extension("tmp");
        if let Err(e) = std::fs::write(&tmp, &content)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
        {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), books = library.len(), "library saved");
        Ok(())
    }
}

/// 4スペースインデントで整形する。
fn to_pretty_json(library: &Library) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    library.serialize(&mut ser)?;
    Ok(buf)
}
