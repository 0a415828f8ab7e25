use std::path::Path;

use tokio::net::TcpListener;

use mdwiki::logger::Logger;
use mdwiki::{router, AppState, Config, TemplateComponent, WikiError};

/// Create a store root if it is missing
fn ensure_dir(dir: &Path) -> Result<(), WikiError> {
    if dir.is_dir() {
        return Ok(());
    }
    log::info!("Creating directory {:?}", dir);
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir).map_err(WikiError::Io)
}

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    ensure_dir(&config.source_dir)?;
    ensure_dir(&config.page_dir)?;

    let templates = TemplateComponent::load(&config.template_dir)?;
    let addr = config.socket_addr();
    let app = router(AppState::new(config, templates));

    let listener = TcpListener::bind(&addr).await.map_err(WikiError::Io)?;
    log::info!("Wiki listening on http://{}", addr);
    axum::serve(listener, app).await.map_err(WikiError::Io)
}
