use std::sync::Arc;

use crate::components::TemplateComponent;
use crate::config::Config;
use crate::services::PageService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pages: Arc<PageService>,
    pub templates: Arc<TemplateComponent>,
}

impl AppState {
    pub fn new(config: Config, templates: TemplateComponent) -> Self {
        let pages = PageService::new(&config);
        Self {
            config: Arc::new(config),
            pages: Arc::new(pages),
            templates: Arc::new(templates),
        }
    }
}

/// A single wiki page as read from (or about to be written to) one store.
///
/// `body` is `None` for a page that has never been saved, which is distinct
/// from a saved page with empty content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Option<Vec<u8>>,
}

impl Page {
    /// A page with no stored body
    pub fn blank(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: None }
    }

    pub fn with_body(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { title: title.into(), body: Some(body.into()) }
    }

    pub fn is_new(&self) -> bool {
        self.body.is_none()
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn body_text(&self) -> String {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// View-model handed to the template renderer
#[derive(Debug, Clone)]
pub struct PageView {
    pub title: String,
    /// Markup inserted verbatim into the template
    pub body: String,
    pub is_new: bool,
}

impl PageView {
    /// View of a page whose body is already HTML (rendered store)
    pub fn rendered(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            body: page.body_text(),
            is_new: page.is_new(),
        }
    }

    /// View of a page whose body is Markdown source, escaped for a form field
    pub fn source(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            body: crate::utils::escape_html(&page.body_text()),
            is_new: page.is_new(),
        }
    }
}
