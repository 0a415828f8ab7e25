use log::{info, warn};

use crate::config::Config;
use crate::errors::WikiError;
use crate::services::{MarkdownService, PageStore};
use crate::types::Page;

/// Keeps the Markdown source store and the rendered HTML store in step.
///
/// The two stores are not transactional. A save writes the source first and
/// the rendered copy second, so a failure in the second write leaves the
/// source ahead of the rendered page until the next successful save.
#[derive(Debug, Clone)]
pub struct PageService {
    source: PageStore,
    rendered: PageStore,
    markdown: MarkdownService,
}

impl PageService {
    pub fn new(config: &Config) -> Self {
        Self::with_stores(
            PageStore::new(config.source_dir.as_ref().clone()),
            PageStore::new(config.page_dir.as_ref().clone()),
        )
    }

    pub fn with_stores(source: PageStore, rendered: PageStore) -> Self {
        Self { source, rendered, markdown: MarkdownService::new() }
    }

    pub fn source_store(&self) -> &PageStore {
        &self.source
    }

    pub fn rendered_store(&self) -> &PageStore {
        &self.rendered
    }

    /// Persist the Markdown source and its rendered HTML.
    pub fn save_page(&self, title: &str, markdown: &str) -> Result<(), WikiError> {
        self.source.save(title, markdown.as_bytes())?;

        let html = self.markdown.render(markdown);
        self.rendered.save(title, html.as_bytes())?;

        info!("Saved page '{}' ({} bytes source, {} bytes html)", title, markdown.len(), html.len());
        Ok(())
    }

    /// Load the Markdown source for editing
    pub fn load_source(&self, title: &str) -> Result<Page, WikiError> {
        self.source.load(title)
    }

    /// Load the rendered HTML for viewing
    pub fn load_rendered(&self, title: &str) -> Result<Page, WikiError> {
        self.rendered.load(title)
    }

    /// Every page in the rendered store
    pub fn list_rendered(&self) -> Result<Vec<Page>, WikiError> {
        self.rendered.list_all()
    }

    /// Remove both copies of a page. Errors from either store are logged and
    /// ignored, so deleting a page that does not exist succeeds.
    pub fn delete_page(&self, title: &str) {
        for store in [&self.source, &self.rendered] {
            if let Err(e) = store.delete(title) {
                warn!("Ignoring failure to delete '{}' from {:?}: {}", title, store.root(), e);
            }
        }
        info!("Deleted page '{}'", title);
    }
}
