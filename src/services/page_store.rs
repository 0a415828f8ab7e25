use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{debug, info, warn, error};
use crate::errors::WikiError;
use crate::types::Page;
use crate::utils::is_valid_title;

/// Flat, file-backed page collection: one file per title under `root`.
///
/// Titles are joined to the root verbatim; callers validate them first.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    /// Create a new page store
    pub fn new(root: PathBuf) -> Self {
        debug!("Creating PageStore rooted at {:?}", root);
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(title)
    }

    /// Create or overwrite the file for `title`. The file is left owner
    /// read/write only, whether it is new or already existed.
    pub fn save(&self, title: &str, body: &[u8]) -> Result<(), WikiError> {
        let full_path = self.path_for(title);
        debug!("Saving {} bytes to {:?}", body.len(), full_path);

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&full_path).map_err(|e| {
            error!("Failed to open {:?} for writing: {}", full_path, e);
            WikiError::Io(e)
        })?;
        // `mode` only applies on creation; tighten files that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(WikiError::Io)?;
        }
        file.write_all(body).map_err(|e| {
            error!("Failed to write {:?}: {}", full_path, e);
            WikiError::Io(e)
        })?;
        Ok(())
    }

    /// Read the file for `title`. A missing file is `WikiError::NotFound`.
    pub fn load(&self, title: &str) -> Result<Page, WikiError> {
        let full_path = self.path_for(title);
        debug!("Loading {:?}", full_path);

        let body = fs::read(&full_path).map_err(|e| {
            debug!("Failed to read {:?}: {}", full_path, e);
            WikiError::from(e)
        })?;
        Ok(Page::with_body(title, body))
    }

    /// Remove the file for `title`. Fails if it does not exist.
    pub fn delete(&self, title: &str) -> Result<(), WikiError> {
        let full_path = self.path_for(title);
        debug!("Deleting {:?}", full_path);
        fs::remove_file(&full_path)?;
        Ok(())
    }

    /// Load every page under the root.
    ///
    /// This is a best-effort snapshot: an entry that cannot be loaded after
    /// enumeration (removed meanwhile, not a regular file, unreadable) is
    /// skipped rather than failing the whole listing, as is any stray file
    /// whose name is not a valid page title. Only a failure to read
    /// the root directory itself is reported. Pages are sorted by title.
    pub fn list_all(&self) -> Result<Vec<Page>, WikiError> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            error!("Failed to read directory {:?}: {}", self.root, e);
            WikiError::Io(e)
        })?;

        let mut pages = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry in {:?}: {}", self.root, e);
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_valid_title(&name) {
                debug!("Skipping {:?} in listing: not a page title", name);
                continue;
            }
            match self.load(&name) {
                Ok(page) => pages.push(page),
                Err(e) => debug!("Skipping {:?} in listing: {}", name, e),
            }
        }

        pages.sort_by(|a, b| a.title.cmp(&b.title));
        info!("Listed {:?}, found {} pages", self.root, pages.len());
        Ok(pages)
    }
}
