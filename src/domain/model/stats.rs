use serde::Serialize;

use super::book::Book;

/// 蔵書の集計値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    pub not_read: usize,
}

impl LibraryStats {
    pub fn tally<'a>(books: impl IntoIterator<Item = &'a Book>) -> Self {
        let (total, read) = books.into_iter().fold((0, 0), |(total, read), book| {
            (total + 1, read + usize::from(book.read_status().is_read()))
        });
        Self {
            total,
            read,
            not_read: total - read,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
