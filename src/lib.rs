//! mdwiki - a small personal wiki
//!
//! Pages are written in Markdown, kept on disk in a source store, and
//! rendered to HTML into a second store on every save. The HTTP layer lists,
//! views, edits, saves and deletes pages.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::WikiError;
pub use handlers::router;
pub use types::{AppState, Page, PageView};
pub use services::{MarkdownService, PageService, PageStore};
pub use components::TemplateComponent;

pub use utils::{escape_html, is_valid_title};
