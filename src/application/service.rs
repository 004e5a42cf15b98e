use crate::domain::model::book::{Book, NewBook};
use crate::domain::model::library::Library;
use crate::domain::model::stats::LibraryStats;
use crate::domain::repository::LibraryRepository;

use super::error::AppError;

/// 蔵書に対するユースケース。
/// 起動時に一度だけloadし、以降はメモリ上のコレクションを正とする。
/// 変更系はコピーに適用 → save成功後に反映、の順で行うため、
/// 保存に失敗してもメモリとファイルは食い違わない。
pub struct LibraryService<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryService<R> {
    /// 保存先から蔵書を読み込む。保存先が無ければ空で始める。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let library = repo
            .load()
            .map_err(|e| AppError::Storage(Box::new(e)))?
            .unwrap_or_default();
        tracing::info!(books = library.len(), "library opened");
        Ok(Self { repo, library })
    }

    /// 本を追加して永続化し、追加したレコードを返す。
    pub fn add_book(&mut self, req: NewBook) -> Result<Book, AppError> {
        let mut next = self.library.clone();
        let book = match next.add_book(req) {
            Ok(book) => book.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "add_book rejected");
                return Err(e.into());
            }
        };
        self.commit(next)?;
        tracing::info!(title = book.title(), total = self.library.len(), "book added");
        Ok(book)
    }

    /// タイトルが一致する本を全て削除し、削除件数を返す。
    /// 一致が無ければ保存せずに0を返す。
    pub fn remove_book(&mut self, title: &str) -> Result<usize, AppError> {
        let mut next = self.library.clone();
        let removed = match next.remove_by_title(title) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, title, "remove_book rejected");
                return Err(e.into());
            }
        };
        if removed == 0 {
            tracing::info!(title, "no book matched title");
            return Ok(0);
        }
        self.commit(next)?;
        tracing::info!(title, removed, total = self.library.len(), "books removed");
        Ok(removed)
    }

    /// タイトルまたは著者で検索する。
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        self.library.search(query)
    }

    pub fn list_books(&self) -> &[Book] {
        self.library.books()
    }

    /// 削除候補として提示するタイトル一覧
    pub fn titles(&self) -> Vec<&str> {
        self.library.titles()
    }

    pub fn statistics(&self) -> LibraryStats {
        self.library.stats()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    // --- private ---

    fn commit(&mut self, next: Library) -> Result<(), AppError> {
        self.repo
            .save(&next)
            .map_err(|e| AppError::Storage(Box::new(e)))?;
        self.library = next;
        Ok(())
    }
}
