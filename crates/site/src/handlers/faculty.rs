//! Faculty pages

use super::{detail_page, essential, Listing};
use crate::render::{self, escape, PageHead};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, Response},
};
use labsite_cms::models::{FacultyMember, PageKind};
use labsite_cms::{Fallback, QueryConfig};
use std::fmt::Write;

pub async fn list(State(state): State<AppState>) -> Html<String> {
    let (settings, members) = tokio::join!(
        state.content.page_settings(PageKind::Faculty),
        state.content.faculty_members(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Faculty, settings);
    let members = members.into_section("faculty.members");

    let body = listing.section(&members, |members| {
        let mut html = String::from("<ul class=\"cards faculty\">");
        for member in members {
            html.push_str(&card(member));
        }
        html.push_str("</ul>");
        html
    });

    listing.render(&state, &body)
}

fn card(member: &FacultyMember) -> String {
    format!(
        "<li class=\"card\">{}<h3>{}</h3>{}{}</li>",
        render::image(member.photo.as_ref(), "thumbnail", &member.name),
        render::link(&format!("/faculty/{}", member.slug), &member.name),
        render::paragraph("role", member.role.as_deref()),
        render::paragraph("summary", member.summary()),
    )
}

pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let member = state.content.faculty_member_by_slug(&slug).await;
    let page = essential(member, "faculty member", &slug).map(|member| profile(&member));
    detail_page(&state, page)
}

fn profile(member: &FacultyMember) -> (PageHead, String) {
    let head = PageHead::new(member.name.clone()).subtitle(member.role.as_deref());
    let mut body = String::new();

    body.push_str(&render::image(member.photo.as_ref(), "medium", &member.name));

    // Contact
    let mut contact = Vec::new();
    if let Some(email) = member.email.as_deref() {
        contact.push(render::link(&format!("mailto:{}", email), email));
    }
    for value in [&member.phone, &member.office].into_iter().flatten() {
        contact.push(escape(value));
    }
    for (label, href) in [
        ("Lattes", &member.lattes),
        ("ORCID", &member.orcid),
        ("Google Scholar", &member.google_scholar),
    ] {
        if let Some(href) = href.as_deref() {
            contact.push(render::link(href, label));
        }
    }
    body.push_str(&render::titled_list("Contact", &contact));

    body.push_str(&render::paragraph("bio", member.bio.as_deref().or(member.short_bio.as_deref())));

    // Academic metrics
    let metrics: Vec<String> = [
        ("Citations", member.citation_count),
        ("h-index", member.h_index),
        ("Publications", member.publication_count),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| format!("{}: {}", label, v)))
    .collect();
    body.push_str(&render::titled_list("Metrics", &metrics));

    let education: Vec<String> = member
        .education
        .iter()
        .map(|e| {
            let mut line = escape(&e.degree);
            if let Some(institution) = e.institution.as_deref() {
                let _ = write!(line, ", {}", escape(institution));
            }
            if let Some(year) = e.year {
                let _ = write!(line, " ({})", year);
            }
            line
        })
        .collect();
    body.push_str(&render::titled_list("Education", &education));

    let awards: Vec<String> = member
        .awards
        .iter()
        .map(|a| match a.year {
            Some(year) => format!("{} ({})", escape(&a.title), year),
            None => escape(&a.title),
        })
        .collect();
    body.push_str(&render::titled_list("Awards", &awards));

    let lines: Vec<String> = member
        .research_lines
        .iter()
        .flatten()
        .map(|l| render::link(&format!("/research/{}", l.slug), &l.title))
        .collect();
    body.push_str(&render::titled_list("Research Lines", &lines));

    let projects: Vec<String> = member
        .projects
        .iter()
        .flatten()
        .map(|p| {
            let lines = p
                .research_lines
                .iter()
                .flatten()
                .map(|l| escape(&l.title))
                .collect::<Vec<_>>()
                .join(", ");
            if lines.is_empty() {
                render::link(&format!("/projects/{}", p.slug), &p.title)
            } else {
                format!("{} <small>{}</small>", render::link(&format!("/projects/{}", p.slug), &p.title), lines)
            }
        })
        .collect();
    body.push_str(&render::titled_list("Projects", &projects));

    let publications: Vec<String> = member
        .publications
        .iter()
        .flatten()
        .map(|p| match p.year {
            Some(year) => format!("{} ({})", render::link(&format!("/publications/{}", p.slug), &p.title), year),
            None => render::link(&format!("/publications/{}", p.slug), &p.title),
        })
        .collect();
    body.push_str(&render::titled_list("Publications", &publications));

    let advisees: Vec<String> = member
        .advisees
        .iter()
        .map(|a| match a.level.as_deref() {
            Some(level) => format!("{} ({})", escape(&a.name), escape(level)),
            None => escape(&a.name),
        })
        .collect();
    body.push_str(&render::titled_list("Advisees", &advisees));

    (head, body)
}
