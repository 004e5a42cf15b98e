use std::fmt;

use super::model::book::{MAX_PUBLICATION_YEAR, MIN_PUBLICATION_YEAR};

/// 必須のテキスト項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Author,
    Genre,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Genre => "genre",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("please fill all the fields (missing: {})", join_fields(.0))]
    MissingFields(Vec<Field>),

    #[error(
        "publication year {year} out of range ({}-{})",
        MIN_PUBLICATION_YEAR,
        MAX_PUBLICATION_YEAR
    )]
    YearOutOfRange { year: u16 },

    #[error("no books in the library")]
    EmptyLibrary,
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
