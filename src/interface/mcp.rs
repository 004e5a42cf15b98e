//! MCP Server for personal-library
//!
//! MCP Protocol (stdio) <-> application::LibraryService / DisplayService
//!
//! 5 tools: add_book, remove_book, search_books, list_books, statistics

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::display::DisplayService;
use crate::application::error::AppError;
use crate::application::service::LibraryService;
use crate::domain::model::book::{NewBook, ReadStatus, DEFAULT_PUBLICATION_YEAR};
use crate::infra::json_store::JsonLibraryRepository;

const EMPTY_LIBRARY_MESSAGE: &str = "No books in the library!";

// =============================================================================
// Public entry point
// =============================================================================

/// 蔵書ファイルを読み込んでMCP Serverを起動する。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let repo = JsonLibraryRepository::new(&library_path);
    let service = LibraryService::open(repo)?;
    tracing::info!(path = %library_path.display(), "serving library over stdio");

    let server = LibraryMcpServer::new(service);
    let running = server.serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type Service = LibraryService<JsonLibraryRepository>;

#[derive(Clone)]
struct LibraryMcpServer {
    service: Arc<Mutex<Service>>,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(service: Service) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, Service>, McpError> {
        self.service
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    /// 入力起因のエラーはinvalid_params、保存失敗はinternal_errorにする。
    fn to_mcp_error(e: AppError) -> McpError {
        if e.is_user_error() {
            McpError::invalid_params(format!("{e}"), None)
        } else {
            McpError::internal_error(format!("{e}"), None)
        }
    }

    // --- 各ツールの本体（テキストを返す） ---

    fn add_book_text(&self, req: McpAddBookRequest) -> Result<String, McpError> {
        let read_status = req
            .read_status
            .as_deref()
            .map(parse_read_status)
            .transpose()?
            .unwrap_or_default();

        let new_book = NewBook {
            title: req.title,
            author: req.author,
            publication_year: req.publication_year.unwrap_or(DEFAULT_PUBLICATION_YEAR),
            genre: req.genre,
            read_status,
        };

        let mut svc = self.service()?;
        let book = svc.add_book(new_book).map_err(Self::to_mcp_error)?;
        Ok(format!("Book '{}' added successfully!", book.title()))
    }

    fn remove_book_text(&self, req: McpRemoveBookRequest) -> Result<String, McpError> {
        let mut svc = self.service()?;
        let removed = svc.remove_book(&req.title).map_err(Self::to_mcp_error)?;
        if removed == 0 {
            return Err(McpError::invalid_params(
                format!(
                    "No book titled '{}'. Available: {}",
                    req.title,
                    quote_titles(&svc.titles())
                ),
                None,
            ));
        }
        Ok(format!(
            "Book '{}' removed successfully! ({} record{})",
            req.title,
            removed,
            if removed == 1 { "" } else { "s" }
        ))
    }

    fn search_books_text(&self, req: McpSearchBooksRequest) -> Result<String, McpError> {
        let svc = self.service()?;
        let results = svc.search_books(&req.query);
        if results.is_empty() {
            return Ok("No books found!".to_string());
        }
        Ok(format!(
            "# Search Results ({})\n\n{}",
            count_books(results.len()),
            DisplayService::render_table(results)
        ))
    }

    fn list_books_text(&self) -> Result<String, McpError> {
        let svc = self.service()?;
        let books = svc.list_books();
        if books.is_empty() {
            return Ok(EMPTY_LIBRARY_MESSAGE.to_string());
        }
        Ok(format!(
            "# All Books ({})\n\n{}",
            count_books(books.len()),
            DisplayService::render_table(books)
        ))
    }

    fn statistics_text(&self) -> Result<String, McpError> {
        let stats = self.service()?.statistics();
        if stats.is_empty() {
            return Ok(EMPTY_LIBRARY_MESSAGE.to_string());
        }
        Ok(DisplayService::render_stats(&stats))
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "personal-library".to_string(),
                title: Some("Personal Library".to_string()),
                description: Some(
                    "Personal book tracker backed by a single JSON file.".to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Track the books you own and whether you have read them.\n\
                 \n\
                 Tools: `add_book`, `remove_book` (removes every book with the given title), \
                 `search_books` (title or author), `list_books`, `statistics`."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_read_status(s: &str) -> Result<ReadStatus, McpError> {
    match s {
        "Read" => Ok(ReadStatus::Read),
        "Not Read" => Ok(ReadStatus::NotRead),
        other => Err(McpError::invalid_params(
            format!("Unknown read_status: '{other}'. Use: Read, Not Read"),
            None,
        )),
    }
}

fn count_books(n: usize) -> String {
    if n == 1 {
        "1 book".to_string()
    } else {
        format!("{n} books")
    }
}

fn quote_titles(titles: &[&str]) -> String {
    if titles.is_empty() {
        return "(none)".to_string();
    }
    titles
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// テキスト項目は省略可能にして、未入力は検証エラーとして返す。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required)")]
    #[serde(default)]
    pub title: String,
    #[schemars(description = "Author name (required)")]
    #[serde(default)]
    pub author: String,
    #[schemars(description = "Publication year, 1000-2025 (default: 2024)")]
    pub publication_year: Option<u16>,
    #[schemars(description = "Genre (required)")]
    #[serde(default)]
    pub genre: String,
    #[schemars(description = "Read status: 'Read' or 'Not Read' (default: 'Not Read')")]
    pub read_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(
        description = "Exact title (case-sensitive). Every book with this title is removed."
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchBooksRequest {
    #[schemars(description = "Text to look for in titles and authors (case-insensitive)")]
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a book to the library. Title, author, and genre are required. Duplicate titles are allowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.add_book_text(req)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title exactly matches the given title (case-sensitive).",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.remove_book_text(req)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "search_books",
        description = "Search books whose title or author contains the query (case-insensitive).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.search_books_text(req)?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "list_books",
        description = "Show all books in the library as a table, in the order they were added.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.list_books_text()?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "statistics",
        description = "Show total, read, and not-read book counts.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.statistics_text()?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

// =============================================================================
// Tests
// =============================================================================
