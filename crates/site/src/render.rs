//! HTML rendering
//!
//! Pages are plain strings assembled from escaped fragments. Every page
//! shares the same chrome (header, navigation, footer) so a page whose data
//! is unavailable still looks like part of the site.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use labsite_cms::models::{Media, PageKind, PageSettings, Seo};
use labsite_common::config::SiteConfig;
use labsite_common::errors::AppError;
use std::fmt::Write;

const NAVIGATION: [(&str, &str); 8] = [
    ("/", "Home"),
    ("/faculty", "Faculty"),
    ("/research", "Research"),
    ("/projects", "Projects"),
    ("/publications", "Publications"),
    ("/alumni", "Alumni"),
    ("/partners", "Partners"),
    ("/news", "News"),
];

/// Escape text for use in element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Title, subtitle and `<head>` metadata of one page
#[derive(Debug, Clone, Default)]
pub struct PageHead {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
    pub share_image: Option<String>,
    pub noindex: bool,
}

impl PageHead {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn subtitle(mut self, subtitle: Option<&str>) -> Self {
        self.subtitle = subtitle.filter(|s| !s.trim().is_empty()).map(str::to_string);
        self
    }

    /// Apply an SEO component when the backend provided one
    pub fn seo(mut self, seo: Option<&Seo>) -> Self {
        if let Some(seo) = seo {
            if let Some(title) = seo.meta_title.as_deref().filter(|t| !t.is_empty()) {
                self.title = title.to_string();
            }
            self.description = seo.meta_description.clone().or(self.description);
            self.canonical_url = seo.canonical_url.clone();
            self.share_image = seo.share_image.as_ref().map(|m| m.url.clone());
            self.noindex = seo.prevent_indexing;
        }
        self
    }

    /// Heading of a listing page, from its settings or the built-in title
    pub fn listing(kind: PageKind, settings: Option<&PageSettings>) -> Self {
        let title = settings
            .and_then(|s| s.title.as_deref())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(kind.default_title());

        PageHead::new(title)
            .subtitle(settings.and_then(|s| s.subtitle.as_deref()))
            .seo(settings.and_then(|s| s.seo.as_ref()))
    }
}

/// Full HTML document around `body`
pub fn layout(site: &SiteConfig, head: &PageHead, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} | {}</title>",
        escape(&head.title),
        escape(&site.name)
    );
    if let Some(description) = &head.description {
        let _ = writeln!(html, "<meta name=\"description\" content=\"{}\">", escape(description));
    }
    if let Some(canonical) = &head.canonical_url {
        let _ = writeln!(html, "<link rel=\"canonical\" href=\"{}\">", escape(canonical));
    }
    if let Some(image) = &head.share_image {
        let _ = writeln!(html, "<meta property=\"og:image\" content=\"{}\">", escape(image));
    }
    if head.noindex {
        html.push_str("<meta name=\"robots\" content=\"noindex\">\n");
    }
    html.push_str("</head>\n<body>\n");

    // Chrome
    let _ = writeln!(
        html,
        "<header class=\"site-header\"><a class=\"brand\" href=\"/\">{}</a><p class=\"tagline\">{}</p>",
        escape(&site.name),
        escape(&site.tagline)
    );
    html.push_str("<nav>");
    for (href, label) in NAVIGATION {
        let _ = write!(html, "<a href=\"{}\">{}</a>", href, label);
    }
    html.push_str("</nav>\n</header>\n<main>\n");

    let _ = writeln!(html, "<h1>{}</h1>", escape(&head.title));
    if let Some(subtitle) = &head.subtitle {
        let _ = writeln!(html, "<p class=\"subtitle\">{}</p>", escape(subtitle));
    }

    html.push_str(body);
    html.push_str("\n</main>\n");
    let _ = writeln!(html, "<footer>{}</footer>", escape(&site.name));
    html.push_str("</body>\n</html>\n");
    html
}

/// Placeholder for a section without content
pub fn empty_state(message: &str) -> String {
    format!("<p class=\"empty-state\">{}</p>", escape(message))
}

/// Error page with the site chrome; 404 for missing content
pub fn error_page(site: &SiteConfig, error: &AppError) -> Response {
    let (status, head, message) = match error {
        AppError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            PageHead::new("Page not found"),
            "The page you are looking for does not exist or has been moved.",
        ),
        _ => (
            error.status_code(),
            PageHead::new("Something went wrong"),
            "This page could not be displayed. Please try again later.",
        ),
    };

    let body = format!("{}<p><a href=\"/\">Back to the home page</a></p>", empty_state(message));
    (status, Html(layout(site, &head, &body))).into_response()
}

// ============================================================================
// Fragments
// ============================================================================

pub fn image(media: Option<&Media>, format: &str, alt: &str) -> String {
    match media {
        Some(media) => format!(
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            escape(media.format_url(format)),
            escape(media.alt_or(alt))
        ),
        None => String::new(),
    }
}

/// Anchor for a safe href; any other scheme renders the bare text
pub fn link(href: &str, text: &str) -> String {
    if is_safe_href(href) {
        format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
    } else {
        tracing::debug!(href = %href, "Dropping link with unsupported scheme");
        escape(text)
    }
}

/// Relative references plus http, https and mailto
fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    let scheme_end = href.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(i) if href[i..].starts_with(':') => {
            let scheme = href[..i].to_ascii_lowercase();
            matches!(scheme.as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// Paragraph for optional text; empty when absent
pub fn paragraph(class: &str, text: Option<&str>) -> String {
    match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => format!("<p class=\"{}\">{}</p>", class, escape(text)),
        None => String::new(),
    }
}

/// `<section>` with a heading, skipped entirely when `items` is empty
pub fn titled_list(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut html = format!("<section><h2>{}</h2><ul>", escape(heading));
    for item in items {
        let _ = write!(html, "<li>{}</li>", item);
    }
    html.push_str("</ul></section>");
    html
}

/// `<select>` with an "all" option followed by `(value, label)` pairs
pub fn select(name: &str, all_label: &str, options: &[(String, String)], selected: Option<&str>) -> String {
    let mut html = format!("<select name=\"{}\"><option value=\"\">{}</option>", name, escape(all_label));
    for (value, label) in options {
        let marker = if selected == Some(value.as_str()) { " selected" } else { "" };
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            marker,
            escape(label)
        );
    }
    html.push_str("</select>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_layout_has_chrome_and_escaped_title() {
        let site = SiteConfig::default();
        let html = layout(&site, &PageHead::new("Tom & Jerry"), "<p>body</p>");

        assert!(html.contains("<nav>"));
        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(&escape(&site.name)));
    }

    #[test]
    fn test_listing_head_falls_back_to_default_title() {
        let head = PageHead::listing(PageKind::Research, None);
        assert_eq!(head.title, "Research Lines");

        let settings = PageSettings {
            title: Some("Our Research".to_string()),
            subtitle: Some("What we work on".to_string()),
            ..PageSettings::default()
        };
        let head = PageHead::listing(PageKind::Research, Some(&settings));
        assert_eq!(head.title, "Our Research");
        assert_eq!(head.subtitle.as_deref(), Some("What we work on"));
    }

    #[test]
    fn test_not_found_page_status() {
        let error = AppError::NotFound {
            resource_type: "faculty".to_string(),
            slug: "nobody".to_string(),
        };
        let response = error_page(&SiteConfig::default(), &error);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_select_marks_current_value() {
        let options = vec![
            ("2024".to_string(), "2024".to_string()),
            ("2023".to_string(), "2023".to_string()),
        ];
        let html = select("year", "All years", &options, Some("2023"));

        assert!(html.starts_with("<select name=\"year\"><option value=\"\">All years</option>"));
        assert!(html.contains("<option value=\"2023\" selected>2023</option>"));
        assert!(html.contains("<option value=\"2024\">2024</option>"));
    }

    #[test]
    fn test_link_rejects_script_hrefs() {
        assert_eq!(link("javascript:alert(1)", "CTA"), "CTA");
        assert_eq!(link(" JavaScript:alert(1)", "CTA"), "CTA");
        assert_eq!(link("data:text/html,x", "<b>"), "&lt;b&gt;");
    }

    #[test]
    fn test_link_allows_web_and_relative_hrefs() {
        assert_eq!(link("https://orcid.org/0000", "ORCID"), "<a href=\"https://orcid.org/0000\">ORCID</a>");
        assert_eq!(link("mailto:a@b.org", "a@b.org"), "<a href=\"mailto:a@b.org\">a@b.org</a>");
        assert_eq!(link("/news/x?a=1", "x"), "<a href=\"/news/x?a=1\">x</a>");
        assert_eq!(link("#team", "Team"), "<a href=\"#team\">Team</a>");
    }
}
