use serde::{Deserialize, Serialize};

use super::book::{Book, NewBook};
use super::stats::LibraryStats;
use crate::domain::error::DomainError;

/// 蔵書コレクション — 集約ルート。挿入順を保持する。
/// 永続化形式はレコードのJSON配列そのもの。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 全タイトル（重複含む、挿入順）
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(Book::title).collect()
    }

    /// 検証して末尾に追加する。重複チェックはしない。
    pub fn add_book(&mut self, req: NewBook) -> Result<&Book, DomainError> {
        let book = Book::new(req)?;
        self.books.push(book);
        let last = self.books.len() - 1;
        Ok(&self.books[last])
    }

    /// タイトルが完全一致（大文字小文字区別）するレコードを全て削除し、削除件数を返す。
    pub fn remove_by_title(&mut self, title: &str) -> Result<usize, DomainError> {
        if self.books.is_empty() {
            return Err(DomainError::EmptyLibrary);
        }
        let before = self.books.len();
        self.books.retain(|book| book.title() != title);
        Ok(before - self.books.len())
    }

    /// タイトルまたは著者の部分一致検索（大文字小文字無視）。順序は保持する。
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.matches_lowercase(&needle))
            .collect()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::tally(&self.books)
    }
}
