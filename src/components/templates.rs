use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use log::{debug, info};
use crate::errors::WikiError;
use crate::types::PageView;
use crate::utils::escape_html;

/// Template names, paired with the built-in fallback used when the template
/// directory does not provide an override.
const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("list", include_str!("../../templates/list.html")),
    ("list_item", include_str!("../../templates/list_item.html")),
    ("view", include_str!("../../templates/view.html")),
    ("edit", include_str!("../../templates/edit.html")),
];

const LIST_ITEM: &str = "list_item";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Var {
    Title,
    Body,
    Pages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Var(Var),
    /// `{{#NEW}}` when `inverted` is false, `{{^NEW}}` when true
    NewSection { inverted: bool, body: Vec<Segment> },
}

enum Context<'a> {
    Page(&'a PageView),
    List(&'a [PageView]),
}

/// Compiled template set. Built once at startup and read-only afterwards.
#[derive(Debug)]
pub struct TemplateComponent {
    templates: HashMap<&'static str, Vec<Segment>>,
}

impl TemplateComponent {
    /// Compile only the built-in templates
    pub fn builtin() -> Result<Self, WikiError> {
        let mut templates = HashMap::new();
        for (name, source) in BUILTIN_TEMPLATES {
            templates.insert(name, compile(name, source)?);
        }
        Ok(Self { templates })
    }

    /// Compile templates from `dir`, using the built-in version of any
    /// template whose `<name>.html` file is absent.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let mut templates = HashMap::new();
        for (name, builtin) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{}.html", name));
            let source = match fs::read_to_string(&path) {
                Ok(source) => {
                    info!("Loaded template '{}' from {:?}", name, path);
                    source
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("No override for template '{}', using built-in", name);
                    builtin.to_string()
                }
                Err(e) => return Err(WikiError::Io(e)),
            };
            templates.insert(name, compile(name, &source)?);
        }
        Ok(Self { templates })
    }

    /// Render a single-page template
    pub fn render(&self, name: &str, page: &PageView) -> Result<String, WikiError> {
        let segments = self.get(name)?;
        let mut out = String::new();
        self.emit(name, segments, &Context::Page(page), &mut out)?;
        Ok(out)
    }

    /// Render a list template; `{{PAGES}}` expands to one `list_item` per page
    pub fn render_list(&self, name: &str, pages: &[PageView]) -> Result<String, WikiError> {
        let segments = self.get(name)?;
        let mut out = String::new();
        self.emit(name, segments, &Context::List(pages), &mut out)?;
        Ok(out)
    }

    fn get(&self, name: &str) -> Result<&[Segment], WikiError> {
        self.templates
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| WikiError::RenderError(format!("no template named '{}'", name)))
    }

    fn emit(
        &self,
        name: &str,
        segments: &[Segment],
        ctx: &Context<'_>,
        out: &mut String,
    ) -> Result<(), WikiError> {
        for segment in segments {
            match (segment, ctx) {
                (Segment::Text(text), _) => out.push_str(text),
                (Segment::Var(Var::Title), Context::Page(page)) => out.push_str(&escape_html(&page.title)),
                (Segment::Var(Var::Body), Context::Page(page)) => out.push_str(&page.body),
                (Segment::Var(Var::Pages), Context::List(pages)) => {
                    for page in pages.iter() {
                        out.push_str(&self.render(LIST_ITEM, page)?);
                    }
                }
                (Segment::NewSection { inverted, body }, Context::Page(page)) => {
                    if page.is_new != *inverted {
                        self.emit(name, body, ctx, out)?;
                    }
                }
                (Segment::Var(var), Context::List(_)) => {
                    return Err(WikiError::RenderError(format!(
                        "template '{}': {:?} is not available in a page list", name, var
                    )));
                }
                (Segment::NewSection { .. }, Context::List(_)) => {
                    return Err(WikiError::RenderError(format!(
                        "template '{}': NEW is not available in a page list", name
                    )));
                }
                (Segment::Var(Var::Pages), Context::Page(_)) => {
                    return Err(WikiError::RenderError(format!(
                        "template '{}': PAGES is only available in a page list", name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse template source into segments, rejecting unknown tags and
/// unbalanced sections.
fn compile(name: &str, source: &str) -> Result<Vec<Segment>, WikiError> {
    let err = |msg: String| WikiError::TemplateError(format!("template '{}': {}", name, msg));

    let mut stack: Vec<(bool, Vec<Segment>)> = Vec::new();
    let mut current = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            current.push(Segment::Text(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| err("unclosed '{{'".to_string()))?;
        let tag = after[..end].trim();
        rest = &after[end + 2..];

        match tag {
            "TITLE" => current.push(Segment::Var(Var::Title)),
            "BODY" => current.push(Segment::Var(Var::Body)),
            "PAGES" => current.push(Segment::Var(Var::Pages)),
            "#NEW" | "^NEW" => stack.push((tag.starts_with('^'), std::mem::take(&mut current))),
            "/NEW" => {
                let (inverted, parent) = stack
                    .pop()
                    .ok_or_else(|| err("'{{/NEW}}' without an opening section".to_string()))?;
                let body = std::mem::replace(&mut current, parent);
                current.push(Segment::NewSection { inverted, body });
            }
            other => return Err(err(format!("unknown tag '{{{{{}}}}}'", other))),
        }
    }
    if !rest.is_empty() {
        current.push(Segment::Text(rest.to_string()));
    }
    if !stack.is_empty() {
        return Err(err("unclosed NEW section".to_string()));
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn view(title: &str, body: &str, is_new: bool) -> PageView {
        PageView { title: title.to_string(), body: body.to_string(), is_new }
    }

    #[test]
    fn test_builtin_templates_compile() {
        let templates = TemplateComponent::builtin().unwrap();
        let html = templates.render("view", &view("Home", "<h1>Hi</h1>", false)).unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("/edit/Home"));
    }

    #[test]
    fn test_title_is_escaped_body_is_not() {
        let segments = compile("t", "{{TITLE}}|{{BODY}}").unwrap();
        let templates = TemplateComponent { templates: HashMap::from([("t", segments)]) };
        let html = templates.render("t", &view("<x>", "<b>y</b>", false)).unwrap();
        assert_eq!(html, "&lt;x&gt;|<b>y</b>");
    }

    #[test]
    fn test_new_sections() {
        let segments = compile("t", "{{#NEW}}creating{{/NEW}}{{^NEW}}editing{{/NEW}} {{TITLE}}").unwrap();
        let templates = TemplateComponent { templates: HashMap::from([("t", segments)]) };
        assert_eq!(templates.render("t", &view("A", "", true)).unwrap(), "creating A");
        assert_eq!(templates.render("t", &view("A", "", false)).unwrap(), "editing A");
    }

    #[test]
    fn test_list_expands_items() {
        let templates = TemplateComponent::builtin().unwrap();
        let pages = vec![view("One", "<p>1</p>", false), view("Two", "<p>2</p>", false)];
        let html = templates.render_list("list", &pages).unwrap();
        assert!(html.contains("/view/One"));
        assert!(html.contains("<p>2</p>"));
    }

    #[test]
    fn test_malformed_templates_are_rejected() {
        assert!(matches!(compile("t", "{{TITLE"), Err(WikiError::TemplateError(_))));
        assert!(matches!(compile("t", "{{#NEW}}open"), Err(WikiError::TemplateError(_))));
        assert!(matches!(compile("t", "close{{/NEW}}"), Err(WikiError::TemplateError(_))));
        assert!(matches!(compile("t", "{{NAME}}"), Err(WikiError::TemplateError(_))));
    }

    #[test]
    fn test_render_errors() {
        let templates = TemplateComponent::builtin().unwrap();
        assert!(matches!(
            templates.render("missing", &view("A", "", false)),
            Err(WikiError::RenderError(_))
        ));

        let segments = compile("t", "{{PAGES}}").unwrap();
        let templates = TemplateComponent { templates: HashMap::from([("t", segments)]) };
        assert!(matches!(
            templates.render("t", &view("A", "", false)),
            Err(WikiError::RenderError(_))
        ));
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("view.html"), "custom {{TITLE}}").unwrap();

        let templates = TemplateComponent::load(dir.path()).unwrap();
        assert_eq!(templates.render("view", &view("Home", "", false)).unwrap(), "custom Home");
        assert!(templates.render("edit", &view("Home", "", true)).unwrap().contains("<form"));
    }

    #[test]
    fn test_broken_override_fails_to_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("edit.html"), "{{#NEW}}").unwrap();
        assert!(matches!(TemplateComponent::load(dir.path()), Err(WikiError::TemplateError(_))));
    }
}
