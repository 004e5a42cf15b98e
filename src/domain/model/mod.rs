pub mod book;
pub mod library;
pub mod stats;
