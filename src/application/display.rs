use crate::domain::model::book::Book;
use crate::domain::model::stats::LibraryStats;

/// 蔵書 → 表示用Markdownへの変換
pub struct DisplayService;

impl DisplayService {
    /// 本の一覧をMarkdownテーブルにする。行順は入力順のまま。
    pub fn render_table<'a>(books: impl IntoIterator<Item = &'a Book>) -> String {
        let mut buf = String::from("| Title | Author | Year | Genre | Status |\n");
        buf.push_str("|-------|--------|------|-------|--------|\n");
        for book in books {
            buf.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                escape_cell(book.title()),
                escape_cell(book.author()),
                book.publication_year(),
                escape_cell(book.genre()),
                book.read_status()
            ));
        }
        buf
    }

    /// 集計値を見出し付きのリストにする。
    pub fn render_stats(stats: &LibraryStats) -> String {
        format!(
            "# Library Statistics\n\n- Total Books: {}\n- Read Books: {}\n- Not Read Books: {}\n",
            stats.total, stats.read, stats.not_read
        )
    }
}

/// セル内の `|` と改行がテーブルを壊さないようにする。
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
