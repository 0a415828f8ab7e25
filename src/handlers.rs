use axum::{
    async_trait,
    extract::{rejection::FormRejection, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::errors::WikiError;
use crate::types::{AppState, Page, PageView};
use crate::utils::is_valid_title;

/// Build the route table
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_list))
        .route("/new", post(handle_new))
        .route("/view/:title", get(handle_view))
        .route("/edit/:title", get(handle_edit))
        .route("/save/:title", post(handle_save))
        .route("/delete/:title", post(handle_delete))
        .with_state(state)
}

/// Page title taken from the `:title` path segment.
///
/// Extraction fails with a 404 when the title does not pass
/// [`is_valid_title`], so handlers never see an invalid title and no store
/// is touched for one.
#[derive(Debug, Clone)]
pub struct ValidTitle(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ValidTitle
where
    S: Send + Sync,
{
    type Rejection = WikiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(title) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| WikiError::InvalidTitle)?;
        if !is_valid_title(&title) {
            log::info!("Rejected invalid title {:?}", title);
            return Err(WikiError::InvalidTitle);
        }
        Ok(Self(title))
    }
}

#[derive(Debug, Deserialize)]
pub struct NewPageForm {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SavePageForm {
    pub body: Option<String>,
}

/// 302 Found pointing at `location`
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// List every rendered page
pub async fn handle_list(State(state): State<AppState>) -> Result<Response, WikiError> {
    let pages = state.pages.list_rendered()?;
    let views: Vec<PageView> = pages.iter().map(PageView::rendered).collect();
    let html = state.templates.render_list("list", &views)?;
    Ok(Html(html).into_response())
}

/// Redirect to the editor for the submitted title, or back home if it is
/// unusable. A request that is not a form carries no title.
pub async fn handle_new(form: Result<Form<NewPageForm>, FormRejection>) -> Response {
    let title = match form {
        Ok(Form(form)) => form.title,
        Err(rejection) => {
            log::debug!("New page request without a usable form: {}", rejection);
            None
        }
    };
    match title.as_deref() {
        Some(title) if is_valid_title(title) => found(&format!("/edit/{}", title)),
        other => {
            log::info!("Ignoring new page request with title {:?}", other);
            found("/")
        }
    }
}

/// Show the rendered page, or send the user to create it
pub async fn handle_view(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Result<Response, WikiError> {
    let page = match state.pages.load_rendered(&title) {
        Ok(page) => page,
        Err(WikiError::NotFound) => {
            log::debug!("Page '{}' not found, redirecting to editor", title);
            return Ok(found(&format!("/edit/{}", title)));
        }
        Err(e) => return Err(e),
    };
    let html = state.templates.render("view", &PageView::rendered(&page))?;
    Ok(Html(html).into_response())
}

/// Show the editor pre-filled with the Markdown source. A page that cannot be
/// loaded is edited as a new, blank page.
pub async fn handle_edit(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Result<Response, WikiError> {
    let page = state.pages.load_source(&title).unwrap_or_else(|e| {
        log::debug!("Editing '{}' as a new page: {}", title, e);
        Page::blank(title.as_str())
    });
    let html = state.templates.render("edit", &PageView::source(&page))?;
    Ok(Html(html).into_response())
}

/// Persist source and rendered HTML, then show the page
pub async fn handle_save(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
    form: Result<Form<SavePageForm>, FormRejection>,
) -> Result<Response, WikiError> {
    let body = match form {
        Ok(Form(form)) => form.body,
        Err(rejection) => {
            log::debug!("Save request for '{}' without a usable form: {}", title, rejection);
            None
        }
    }
    .ok_or(WikiError::MissingField("body"))?;
    state.pages.save_page(&title, &body).map_err(|e| {
        log::error!("Failed to save page '{}': {}", title, e);
        e
    })?;
    Ok(found(&format!("/view/{}", title)))
}

/// Remove both copies of a page; always returns home
pub async fn handle_delete(
    State(state): State<AppState>,
    ValidTitle(title): ValidTitle,
) -> Response {
    state.pages.delete_page(&title);
    found("/")
}
