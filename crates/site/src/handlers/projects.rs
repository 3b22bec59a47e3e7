//! Project pages

use super::{detail_page, essential, Listing};
use crate::render::{self, escape, PageHead};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, Response},
};
use labsite_cms::models::{Media, PageKind, Project};
use labsite_cms::{Fallback, QueryConfig};

pub async fn list(State(state): State<AppState>) -> Html<String> {
    let (settings, projects) = tokio::join!(
        state.content.page_settings(PageKind::Projects),
        state.content.projects(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Projects, settings);
    let projects = projects.into_section("projects.list");

    let body = listing.section(&projects, |projects| {
        let mut html = String::from("<ul class=\"cards projects\">");
        for project in projects {
            html.push_str(&card(project));
        }
        html.push_str("</ul>");
        html
    });

    listing.render(&state, &body)
}

/// Period, status and funding agency on one line
fn facts(project: &Project) -> String {
    [project.period(), project.status.clone(), project.funding_agency.clone()]
        .into_iter()
        .flatten()
        .map(|fact| escape(&fact))
        .collect::<Vec<_>>()
        .join(" &middot; ")
}

fn progress(project: &Project) -> String {
    match project.progress_percent() {
        Some(percent) => format!(
            "<progress max=\"100\" value=\"{0}\">{0}%</progress>",
            percent
        ),
        None => String::new(),
    }
}

fn card(project: &Project) -> String {
    let coordinator = project
        .coordinator
        .as_ref()
        .map(|c| format!("<p class=\"coordinator\">Coordinator: {}</p>", escape(&c.name)))
        .unwrap_or_default();

    format!(
        "<li class=\"card\">{}<h3>{}</h3><p class=\"facts\">{}</p>{}{}{}</li>",
        render::image(project.cover_image.as_ref(), "small", &project.title),
        render::link(&format!("/projects/{}", project.slug), &project.title),
        facts(project),
        render::paragraph("summary", project.summary.as_deref()),
        coordinator,
        progress(project),
    )
}

pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let project = state.content.project_by_slug(&slug).await;
    let page = essential(project, "project", &slug).map(|project| overview(&project));
    detail_page(&state, page)
}

fn overview(project: &Project) -> (PageHead, String) {
    let head = PageHead::new(project.title.clone()).subtitle(project.summary.as_deref());

    let mut body = render::image(project.cover_image.as_ref(), "large", &project.title);
    body.push_str(&format!("<p class=\"facts\">{}</p>", facts(project)));
    body.push_str(&progress(project));
    body.push_str(&render::paragraph("description", project.description.as_deref()));

    let coordinator: Vec<String> = project
        .coordinator
        .iter()
        .map(|c| person(&c.name, &c.slug, c.photo.as_ref()))
        .collect();
    body.push_str(&render::titled_list("Coordinator", &coordinator));

    let team: Vec<String> = project
        .team
        .iter()
        .flatten()
        .map(|m| person(&m.name, &m.slug, m.photo.as_ref()))
        .collect();
    body.push_str(&render::titled_list("Team", &team));

    let lines: Vec<String> = project
        .research_lines
        .iter()
        .flatten()
        .map(|l| render::link(&format!("/research/{}", l.slug), &l.title))
        .collect();
    body.push_str(&render::titled_list("Research Lines", &lines));

    let publications: Vec<String> = project
        .publications
        .iter()
        .flatten()
        .map(|p| render::link(&format!("/publications/{}", p.slug), &p.title))
        .collect();
    body.push_str(&render::titled_list("Publications", &publications));

    (head, body)
}

fn person(name: &str, slug: &str, photo: Option<&Media>) -> String {
    format!(
        "{}{}",
        render::image(photo, "thumbnail", name),
        render::link(&format!("/faculty/{}", slug), name)
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_shows_period_and_progress() {
        let source = StaticContentSource::new(base_url()).with_response(
            "projects",
            json!({ "data": [{ "id": 3, "attributes": {
                "title": "Smart Grids", "slug": "smart-grids",
                "startDate": "2021-02-01", "endDate": "2024-12-31",
                "status": "active", "progress": 72.4,
                "coordinator": { "data": { "id": 1, "attributes": { "name": "Ana", "slug": "ana" } } }
            }}]}),
        );

        let (status, body) = get(app(source), "/projects").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("2021 - 2024 &middot; active"));
        assert!(body.contains("value=\"72\""));
        assert!(body.contains("Coordinator: Ana"));
    }

    #[tokio::test]
    async fn test_detail_without_backend_is_404() {
        let (status, body) = get(offline_app(), "/projects/smart-grids").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<nav>"));
    }
}
