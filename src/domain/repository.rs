use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    /// 保存先が存在しなければ `Ok(None)`。
    fn load(&self) -> Result<Option<Library>, Self::Error>;
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
