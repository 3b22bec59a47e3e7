//! Publication pages and exports

use super::{attachment, detail_page, essential, Listing};
use crate::render::{self, escape, PageHead};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Response},
};
use labsite_cms::models::{PageKind, Publication};
use labsite_cms::{Fallback, QueryConfig};
use labsite_common::errors::Result;
use labsite_listing::{
    facet_values, group_by, publication_columns, to_bibtex, to_csv, Choice, ListFilter, SortOrder,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// `?q=&type=&year=&line=`
#[derive(Debug, Default, Deserialize)]
pub struct PublicationParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
}

impl PublicationParams {
    pub fn filter(&self) -> ListFilter {
        ListFilter::new()
            .search(self.q.as_deref().unwrap_or_default())
            .category(Choice::<String>::from_param(self.kind.as_deref()))
            .year(Choice::<i32>::from_param(self.year.as_deref()))
            .taxonomy(Choice::<String>::from_param(self.line.as_deref()))
    }

    /// The same filters as a query string, for export links
    fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [("q", &self.q), ("type", &self.kind), ("year", &self.year), ("line", &self.line)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

pub async fn list(State(state): State<AppState>, Query(params): Query<PublicationParams>) -> Html<String> {
    let (settings, publications) = tokio::join!(
        state.content.page_settings(PageKind::Publications),
        state.content.publications(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Publications, settings);
    let publications = publications.into_section("publications.list");

    let body = listing.section(&publications, |publications| {
        let filter = params.filter();
        let mut html = filter_form(&params, publications);

        let qs = params.query_string();
        let suffix = if qs.is_empty() { String::new() } else { format!("?{}", qs) };
        let _ = write!(
            html,
            "<p class=\"exports\"><a href=\"/publications/export.csv{0}\">CSV</a> <a href=\"/publications/export.bib{0}\">BibTeX</a></p>",
            escape(&suffix)
        );

        let visible = filter.apply(publications);
        if visible.is_empty() {
            html.push_str(&render::empty_state("No publications match the current filters."));
            return html;
        }

        let _ = write!(html, "<p class=\"result-count\">{} publications</p>", visible.len());
        for group in group_by(visible, |p: &Publication| p.year, SortOrder::Descending) {
            let heading = group.key.map_or_else(|| "Undated".to_string(), |y| y.to_string());
            let _ = write!(
                html,
                "<section class=\"group\"><h2>{} <span class=\"count\">({})</span></h2><ol>",
                heading,
                group.count()
            );
            for publication in &group.items {
                let _ = write!(html, "<li>{}</li>", citation(publication));
            }
            html.push_str("</ol></section>");
        }
        html
    });

    listing.render(&state, &body)
}

fn filter_form(params: &PublicationParams, publications: &[Publication]) -> String {
    let facets = facet_values(publications);

    // slug -> title for the research line dropdown
    let lines: BTreeMap<&str, &str> = publications
        .iter()
        .filter_map(|p| p.research_line.as_deref())
        .map(|l| (l.slug.as_str(), l.title.as_str()))
        .collect();

    let kinds: Vec<(String, String)> = publications
        .iter()
        .filter_map(|p| p.kind)
        .map(|k| (k.as_str().to_string(), k.label().to_string()))
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .collect();
    let years: Vec<(String, String)> = facets.years.iter().map(|y| (y.to_string(), y.to_string())).collect();
    let lines: Vec<(String, String)> = lines.into_iter().map(|(s, t)| (s.to_string(), t.to_string())).collect();

    let mut html = String::from("<form class=\"filters\" method=\"get\" action=\"/publications\">");
    let _ = write!(
        html,
        "<input type=\"search\" name=\"q\" placeholder=\"Search\" value=\"{}\">",
        escape(params.q.as_deref().unwrap_or_default())
    );
    html.push_str(&render::select("type", "All types", &kinds, params.kind.as_deref()));
    html.push_str(&render::select("year", "All years", &years, params.year.as_deref()));
    html.push_str(&render::select("line", "All research lines", &lines, params.line.as_deref()));
    html.push_str("<button type=\"submit\">Filter</button> <a href=\"/publications\">Clear</a></form>");
    html
}

/// One list entry: authors, linked title, venue and type
fn citation(publication: &Publication) -> String {
    let mut html = String::new();
    if let Some(authors) = publication.authors.as_deref() {
        let _ = write!(html, "<span class=\"authors\">{}</span>. ", escape(authors));
    }
    html.push_str(&render::link(&format!("/publications/{}", publication.slug), &publication.title));
    if let Some(venue) = publication.venue() {
        let _ = write!(html, ". <em>{}</em>", escape(venue));
    }
    let _ = write!(html, " <span class=\"type\">{}</span>", publication.kind_or_other().label());
    if let Some(doi) = publication.doi_url() {
        let _ = write!(html, " {}", render::link(&doi, "DOI"));
    }
    html
}

pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let publication = state.content.publication_by_slug(&slug).await;
    let page = essential(publication, "publication", &slug).map(|p| overview(&p));
    detail_page(&state, page)
}

fn overview(publication: &Publication) -> (PageHead, String) {
    let head = PageHead::new(publication.title.clone()).subtitle(publication.authors.as_deref());
    let mut body = String::new();

    let mut facts = vec![publication.kind_or_other().label().to_string()];
    if let Some(venue) = publication.venue() {
        facts.push(escape(venue));
    }
    if let Some(year) = publication.year {
        facts.push(year.to_string());
    }
    for (label, value) in [("Qualis", &publication.qualis), ("Quartile", &publication.quartile)] {
        if let Some(value) = value.as_deref() {
            facts.push(format!("{} {}", label, escape(value)));
        }
    }
    let _ = write!(body, "<p class=\"facts\">{}</p>", facts.join(" &middot; "));

    if let Some(doi) = publication.doi_url() {
        body.push_str(&format!("<p>{}</p>", render::link(&doi, &doi)));
    }
    body.push_str(&render::paragraph("abstract", publication.abstract_text.as_deref()));

    let authors: Vec<String> = publication
        .author_records
        .iter()
        .flatten()
        .map(|a| render::link(&format!("/faculty/{}", a.slug), &a.name))
        .collect();
    body.push_str(&render::titled_list("Group Authors", &authors));

    if let Some(line) = publication.research_line.as_deref() {
        body.push_str(&render::titled_list(
            "Research Line",
            &[render::link(&format!("/research/{}", line.slug), &line.title)],
        ));
    }

    let formats: Vec<String> = [("APA", &publication.apa), ("ABNT", &publication.abnt)]
        .into_iter()
        .filter_map(|(label, text)| text.as_deref().map(|t| format!("<strong>{}</strong> {}", label, escape(t))))
        .chain(std::iter::once(format!(
            "<strong>BibTeX</strong><pre>{}</pre>",
            escape(&labsite_listing::export::bibtex_entry(publication))
        )))
        .collect();
    body.push_str(&render::titled_list("Cite", &formats));

    (head, body)
}

// ============================================================================
// Exports
// ============================================================================

/// Publications passing the request's filters
async fn filtered(state: &AppState, params: &PublicationParams) -> Result<Vec<Publication>> {
    let publications = state.content.publications(QueryConfig::new()).await?;
    let filter = params.filter();
    Ok(publications.into_iter().filter(|p| filter.matches(p)).collect())
}

pub async fn export_csv(State(state): State<AppState>, Query(params): Query<PublicationParams>) -> Result<Response> {
    let publications = filtered(&state, &params).await?;
    tracing::info!(count = publications.len(), "Publications exported as CSV");

    Ok(attachment(
        "text/csv; charset=utf-8",
        "publications.csv",
        to_csv(&publications, &publication_columns()),
    ))
}

pub async fn export_bibtex(State(state): State<AppState>, Query(params): Query<PublicationParams>) -> Result<Response> {
    let publications = filtered(&state, &params).await?;
    tracing::info!(count = publications.len(), "Publications exported as BibTeX");

    Ok(attachment(
        "application/x-bibtex; charset=utf-8",
        "publications.bib",
        to_bibtex(&publications),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;
    use serde_json::{json, Value};

    fn publications() -> Value {
        json!({ "data": [
            { "id": 1, "attributes": {
                "title": "Graph Networks", "slug": "graph-networks", "year": 2024, "type": "journal",
                "authors": "Souza, A.; Lima, B.", "journal": "Neural Computing",
                "researchLine": { "data": { "id": 9, "attributes": { "title": "AI", "slug": "ai" } } }
            }},
            { "id": 2, "attributes": {
                "title": "Load Forecasting, Revisited", "slug": "load-forecasting", "year": 2024,
                "type": "conference", "conference": "PES GM",
                "researchLine": { "data": null }
            }},
            { "id": 3, "attributes": {
                "title": "Market Design", "slug": "market-design", "year": 2022, "type": "journal",
                "researchLine": { "data": null }
            }}
        ]})
    }

    fn source() -> StaticContentSource {
        StaticContentSource::new(base_url()).with_response("publications", publications())
    }

    #[tokio::test]
    async fn test_list_groups_by_year() {
        let (status, body) = get(app(source()), "/publications").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>2024 <span class=\"count\">(2)</span></h2>"));
        assert!(body.contains("<h2>2022 <span class=\"count\">(1)</span></h2>"));
        assert!(body.find("2024 <span").unwrap() < body.find("2022 <span").unwrap());
    }

    #[tokio::test]
    async fn test_list_applies_query_filters() {
        let (_, body) = get(app(source()), "/publications?type=journal&year=2022").await;

        assert!(body.contains("href=\"/publications/market-design\""));
        assert!(!body.contains("href=\"/publications/graph-networks\""));
        assert!(body.contains("<option value=\"journal\" selected>"));
    }

    #[tokio::test]
    async fn test_list_with_no_matches() {
        let (status, body) = get(app(source()), "/publications?q=quantum").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No publications match the current filters."));
    }

    #[tokio::test]
    async fn test_list_without_backend() {
        let (status, body) = get(offline_app(), "/publications").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Publications</h1>"));
        assert!(body.contains("Connect to the backend to see this content."));
    }

    #[tokio::test]
    async fn test_csv_export() {
        let (status, body) = get(app(source()), "/publications/export.csv?line=ai").await;

        assert_eq!(status, StatusCode::OK);
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Title,Authors,Year,Type,Venue,DOI,Research Line");
        assert!(lines[1].starts_with("Graph Networks,\"Souza, A.; Lima, B.\",2024"));
    }

    #[tokio::test]
    async fn test_bibtex_export() {
        let (status, body) = get(app(source()), "/publications/export.bib?year=2022").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("@article{2022market,"));
    }

    #[tokio::test]
    async fn test_export_without_backend_is_bad_gateway() {
        let (status, _) = get(offline_app(), "/publications/export.csv").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_detail_renders_citation_formats() {
        let (status, body) = get(app(source()), "/publications/graph-networks").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Graph Networks</h1>"));
        assert!(body.contains("@article{souza2024graph,"));
        assert!(body.contains("href=\"/research/ai\""));
    }
}
