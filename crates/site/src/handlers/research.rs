//! Research line pages

use super::{detail_page, essential, Listing};
use crate::render::{self, PageHead};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, Response},
};
use labsite_cms::models::{PageKind, ResearchLine};
use labsite_cms::{Fallback, QueryConfig};

pub async fn list(State(state): State<AppState>) -> Html<String> {
    let (settings, lines) = tokio::join!(
        state.content.page_settings(PageKind::Research),
        state.content.research_lines(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Research, settings);
    let lines = lines.into_section("research.lines");

    let body = listing.section(&lines, |lines| {
        let mut html = String::from("<ul class=\"cards research\">");
        for line in lines {
            html.push_str(&format!(
                "<li class=\"card\">{}<h3>{}</h3>{}</li>",
                render::image(line.cover_image.as_ref(), "small", &line.title),
                render::link(&format!("/research/{}", line.slug), &line.title),
                render::paragraph("summary", line.short_description.as_deref()),
            ));
        }
        html.push_str("</ul>");
        html
    });

    listing.render(&state, &body)
}

pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let line = state.content.research_line_by_slug(&slug).await;
    let page = essential(line, "research line", &slug).map(|line| overview(&line));
    detail_page(&state, page)
}

fn overview(line: &ResearchLine) -> (PageHead, String) {
    let head = PageHead::new(line.title.clone()).subtitle(line.short_description.as_deref());
    let mut body = render::image(line.cover_image.as_ref(), "large", &line.title);

    body.push_str(&render::paragraph("description", line.description.as_deref()));

    let members: Vec<String> = line
        .faculty_members
        .iter()
        .flatten()
        .map(|m| {
            format!(
                "{}{}",
                render::image(m.photo.as_ref(), "thumbnail", &m.name),
                render::link(&format!("/faculty/{}", m.slug), &m.name)
            )
        })
        .collect();
    body.push_str(&render::titled_list("Researchers", &members));

    let projects: Vec<String> = line
        .projects
        .iter()
        .flatten()
        .map(|p| render::link(&format!("/projects/{}", p.slug), &p.title))
        .collect();
    body.push_str(&render::titled_list("Projects", &projects));

    let publications: Vec<String> = line
        .publications
        .iter()
        .flatten()
        .map(|p| render::link(&format!("/publications/{}", p.slug), &p.title))
        .collect();
    body.push_str(&render::titled_list("Publications", &publications));

    (head, body)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_detail_lists_related_content() {
        let source = StaticContentSource::new(base_url()).with_response(
            "research-lines",
            json!({ "data": [{ "id": 2, "attributes": {
                "title": "Machine Learning", "slug": "ml",
                "facultyMembers": { "data": [{ "id": 1, "attributes": { "name": "Ana", "slug": "ana" } }] },
                "projects": { "data": [] },
                "publications": { "data": null }
            }}]}),
        );

        let (status, body) = get(app(source), "/research/ml").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Machine Learning</h1>"));
        assert!(body.contains("href=\"/faculty/ana\""));
        assert!(!body.contains("<h2>Projects</h2>"));
    }

    #[tokio::test]
    async fn test_list_without_backend() {
        let (status, body) = get(offline_app(), "/research").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Research Lines</h1>"));
        assert!(body.contains("Connect to the backend to see this content."));
    }
}
