//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use personal_library::application::service::LibraryService;
use personal_library::domain::model::book::{NewBook, ReadStatus};
use personal_library::domain::model::library::Library;
use personal_library::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。
/// `fail_saves` を立てると以降のsaveが失敗する。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            saves: Cell::new(0),
            fail_saves: Cell::new(false),
        }
    }

    pub fn with_library(library: &Library) -> Self {
        let repo = Self::new();
        repo.save(library).unwrap();
        repo.saves.set(0);
        repo
    }

    /// 保存済みJSONをデコードした内容
    pub fn persisted(&self) -> Option<Library> {
        self.store
            .borrow()
            .as_ref()
            .map(|json| serde_json::from_str(json).unwrap())
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn fail_saves(&self) {
        self.fail_saves.set(true);
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        Ok(self.persisted())
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        if self.fail_saves.get() {
            return Err(InMemoryError);
        }
        let json = serde_json::to_string(library).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// `&InMemoryRepo` でもリポジトリとして使えるようにする（テスト側で中身を覗くため）。
impl LibraryRepository for &InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Option<Library>, Self::Error> {
        (**self).load()
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        (**self).save(library)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn new_book(title: &str, author: &str, status: ReadStatus) -> NewBook {
    NewBook {
        title: title.into(),
        author: author.into(),
        publication_year: 2000,
        genre: "Fiction".into(),
        read_status: status,
    }
}

/// 標準的なテスト用蔵書:
/// ```text
/// 1. Dune            / Frank Herbert  / 1965 / Science Fiction / Read
/// 2. Emma            / Jane Austen    / 1815 / Romance         / Not Read
/// 3. Dune            / Frank Herbert  / 1965 / Science Fiction / Not Read
/// 4. Children of Dune/ Frank Herbert  / 1976 / Science Fiction / Read
/// 5. Persuasion      / Jane Austen    / 1817 / Romance         / Read
/// ```
pub fn standard_library() -> Library {
    let mut library = Library::new();
    for (title, author, year, genre, status) in [
        ("Dune", "Frank Herbert", 1965, "Science Fiction", ReadStatus::Read),
        ("Emma", "Jane Austen", 1815, "Romance", ReadStatus::NotRead),
        ("Dune", "Frank Herbert", 1965, "Science Fiction", ReadStatus::NotRead),
        ("Children of Dune", "Frank Herbert", 1976, "Science Fiction", ReadStatus::Read),
        ("Persuasion", "Jane Austen", 1817, "Romance", ReadStatus::Read),
    ] {
        library
            .add_book(NewBook {
                title: title.into(),
                author: author.into(),
                publication_year: year,
                genre: genre.into(),
                read_status: status,
            })
            .unwrap();
    }
    library
}

/// InMemoryRepoに蔵書を保存してLibraryServiceを返す。
pub fn service_with_library(library: &Library) -> LibraryService<InMemoryRepo> {
    LibraryService::open(InMemoryRepo::with_library(library)).unwrap()
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
