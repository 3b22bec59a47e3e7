//! Partner institutions

use super::Listing;
use crate::render::{self, escape};
use crate::AppState;
use axum::{extract::State, response::Html};
use labsite_cms::models::{PageKind, Partner};
use labsite_cms::{Fallback, QueryConfig};
use std::fmt::Write;

pub async fn list(State(state): State<AppState>) -> Html<String> {
    let (settings, partners) = tokio::join!(
        state.content.page_settings(PageKind::Partners),
        state.content.partners(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Partners, settings);
    let partners = partners.into_section("partners.list");

    let body = listing.section(&partners, |partners| {
        let mut html = String::from("<ul class=\"cards partners\">");
        for partner in partners {
            html.push_str(&card(partner));
        }
        html.push_str("</ul>");
        html
    });

    listing.render(&state, &body)
}

fn card(partner: &Partner) -> String {
    let mut html = String::from("<li class=\"card\">");
    html.push_str(&render::image(partner.logo.as_ref(), "small", &partner.name));

    let name = match partner.acronym.as_deref() {
        Some(acronym) => format!("{} ({})", partner.name, acronym),
        None => partner.name.clone(),
    };
    match partner.website.as_deref() {
        Some(website) => {
            let _ = write!(html, "<h3>{}</h3>", render::link(website, &name));
        }
        None => {
            let _ = write!(html, "<h3>{}</h3>", escape(&name));
        }
    }

    let facts: Vec<String> = [partner.partner_type.as_ref().map(|t| t.name.clone()), partner.location()]
        .into_iter()
        .flatten()
        .map(|f| escape(&f))
        .collect();
    if !facts.is_empty() {
        let _ = write!(html, "<p class=\"facts\">{}</p>", facts.join(" &middot; "));
    }
    html.push_str(&render::paragraph("description", partner.description.as_deref()));

    let funded: Vec<String> = partner
        .funded_projects
        .iter()
        .map(|p| {
            let mut line = escape(&p.title);
            if let Some(agency) = p.agency.as_deref() {
                let _ = write!(line, ", {}", escape(agency));
            }
            if let Some(year) = p.year {
                let _ = write!(line, " ({})", year);
            }
            line
        })
        .collect();
    html.push_str(&render::titled_list("Funded Projects", &funded));

    let collaborators: Vec<String> = partner
        .collaborators
        .iter()
        .flatten()
        .map(|m| render::link(&format!("/faculty/{}", m.slug), &m.name))
        .collect();
    html.push_str(&render::titled_list("Collaborators", &collaborators));

    html.push_str("</li>");
    html
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_renders_partner_details() {
        let source = StaticContentSource::new(base_url()).with_response(
            "partners",
            json!({ "data": [{ "id": 4, "attributes": {
                "name": "Federal University", "acronym": "FU",
                "website": "https://fu.example.edu",
                "city": "Recife", "country": "Brazil",
                "partnerType": { "data": { "id": 2, "attributes": { "name": "University" } } },
                "fundedProjects": [{ "title": "Grid Lab", "agency": "CNPq", "year": 2022 }],
                "collaborators": { "data": [{ "id": 1, "attributes": { "name": "Ana", "slug": "ana" } }] }
            }}]}),
        );

        let (status, body) = get(app(source), "/partners").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<a href=\"https://fu.example.edu\">Federal University (FU)</a>"));
        assert!(body.contains("University &middot; Recife, Brazil"));
        assert!(body.contains("Grid Lab, CNPq (2022)"));
        assert!(body.contains("href=\"/faculty/ana\""));
    }

    #[tokio::test]
    async fn test_empty_list_uses_empty_copy() {
        let source = StaticContentSource::new(base_url()).with_response("partners", json!({ "data": [] }));
        let (status, body) = get(app(source), "/partners").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Nothing has been published here yet."));
    }
}
