use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Field};

/// 出版年の下限（フォームの入力範囲に合わせる）
pub const MIN_PUBLICATION_YEAR: u16 = 1000;
/// 出版年の上限
pub const MAX_PUBLICATION_YEAR: u16 = 2025;
/// フォームの出版年初期値
pub const DEFAULT_PUBLICATION_YEAR: u16 = 2024;

/// 読了状態。永続化時は "Read" / "Not Read" の文字列になる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadStatus {
    #[serde(rename = "Read")]
    Read,
    #[default]
    #[serde(rename = "Not Read")]
    NotRead,
}

impl ReadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::Read => "Read",
            ReadStatus::NotRead => "Not Read",
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, ReadStatus::Read)
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 本の追加リクエスト（フォームから受け取った未検証の値）。
/// 保存ファイルの読み込み時もこの形で受けてから検証する。
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(rename = "publication year")]
    pub publication_year: u16,
    pub genre: String,
    #[serde(rename = "read status")]
    pub read_status: ReadStatus,
}

/// 蔵書1冊分のレコード。IDは持たず、削除はタイトルをキーにする。
/// デシリアライズも `Book::new` を通る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewBook")]
pub struct Book {
    title: String,
    author: String,
    #[serde(rename = "publication year")]
    publication_year: u16,
    genre: String,
    #[serde(rename = "read status")]
    read_status: ReadStatus,
}

impl Book {
    /// リクエストを検証してレコードを作る。
    /// 空のテキスト項目はまとめて1つのエラーとして返す。
    pub fn new(req: NewBook) -> Result<Self, DomainError> {
        let missing: Vec<Field> = [
            (Field::Title, &req.title),
            (Field::Author, &req.author),
            (Field::Genre, &req.genre),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        if !(MIN_PUBLICATION_YEAR..=MAX_PUBLICATION_YEAR).contains(&req.publication_year) {
            return Err(DomainError::YearOutOfRange {
                year: req.publication_year,
            });
        }

        Ok(Self {
            title: req.title,
            author: req.author,
            publication_year: req.publication_year,
            genre: req.genre,
            read_status: req.read_status,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_year(&self) -> u16 {
        self.publication_year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn read_status(&self) -> ReadStatus {
        self.read_status
    }

    /// タイトルまたは著者に、大文字小文字を区別せずクエリを含むか。
    /// `needle` は小文字化済みであること。
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }
}

impl TryFrom<NewBook> for Book {
    type Error = DomainError;

    fn try_from(req: NewBook) -> Result<Self, Self::Error> {
        Self::new(req)
    }
}
