use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    /// 利用者の入力起因のエラーか（ストレージ障害ではない）
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::Domain(_))
    }
}
