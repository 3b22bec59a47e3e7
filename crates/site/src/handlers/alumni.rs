//! Alumni directory

use super::{attachment, Listing};
use crate::render::{self, escape};
use crate::AppState;
use axum::{
    extract::{Query, State},
    response::{Html, Response},
};
use labsite_cms::models::{Alumnus, PageKind};
use labsite_cms::{Fallback, QueryConfig};
use labsite_common::errors::Result;
use labsite_listing::{alumni_columns, facet_values, group_by, to_csv, Choice, ListFilter, SortOrder};
use serde::Deserialize;
use std::fmt::Write;

/// `?q=&level=&sector=`
#[derive(Debug, Default, Deserialize)]
pub struct AlumniParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl AlumniParams {
    pub fn filter(&self) -> ListFilter {
        ListFilter::new()
            .search(self.q.as_deref().unwrap_or_default())
            .category(Choice::<String>::from_param(self.level.as_deref()))
            .taxonomy(Choice::<String>::from_param(self.sector.as_deref()))
    }

    /// Active filters re-encoded for the export link
    fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in [("q", &self.q), ("level", &self.level), ("sector", &self.sector)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

pub async fn list(State(state): State<AppState>, Query(params): Query<AlumniParams>) -> Html<String> {
    let (settings, alumni) = tokio::join!(
        state.content.page_settings(PageKind::Alumni),
        state.content.alumni(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::Alumni, settings);
    let alumni = alumni.into_section("alumni.list");

    let body = listing.section(&alumni, |alumni| {
        let filter = params.filter();
        let facets = facet_values(alumni);
        let as_options = |values: &[String]| -> Vec<(String, String)> {
            values.iter().map(|v| (v.clone(), v.clone())).collect()
        };

        let mut html = String::from("<form class=\"filters\" method=\"get\" action=\"/alumni\">");
        let _ = write!(
            html,
            "<input type=\"search\" name=\"q\" placeholder=\"Search\" value=\"{}\">",
            escape(params.q.as_deref().unwrap_or_default())
        );
        html.push_str(&render::select("level", "All degrees", &as_options(&facets.categories), params.level.as_deref()));
        html.push_str(&render::select("sector", "All sectors", &as_options(&facets.taxonomies), params.sector.as_deref()));
        html.push_str("<button type=\"submit\">Filter</button> <a href=\"/alumni\">Clear</a></form>");
        let qs = params.query_string();
        let suffix = if qs.is_empty() { String::new() } else { format!("?{}", qs) };
        let _ = write!(
            html,
            "<p class=\"exports\"><a href=\"/alumni/export.csv{}\">CSV</a></p>",
            escape(&suffix)
        );

        let visible = filter.apply(alumni);
        if visible.is_empty() {
            html.push_str(&render::empty_state("No alumni match the current filters."));
            return html;
        }

        let groups = group_by(
            visible,
            |a: &Alumnus| a.degree_level_name().unwrap_or("Other").to_string(),
            SortOrder::Ascending,
        );
        for group in groups {
            let _ = write!(
                html,
                "<section class=\"group\"><h2>{} <span class=\"count\">({})</span></h2><ul class=\"alumni\">",
                escape(&group.key),
                group.count()
            );
            for alumnus in &group.items {
                html.push_str(&entry(alumnus));
            }
            html.push_str("</ul></section>");
        }
        html
    });

    listing.render(&state, &body)
}

fn entry(alumnus: &Alumnus) -> String {
    let mut html = format!(
        "<li>{}<strong>{}</strong>",
        render::image(alumnus.photo.as_ref(), "thumbnail", &alumnus.name),
        escape(&alumnus.name)
    );
    if let Some(year) = alumnus.defense_year {
        let _ = write!(html, " ({})", year);
    }
    html.push_str(&render::paragraph("thesis", alumnus.thesis_title.as_deref()));
    if let Some(advisor) = alumnus.advisor.as_deref() {
        let _ = write!(html, "<p class=\"advisor\">Advisor: {}</p>", escape(advisor));
    }

    let now: Vec<&str> = [&alumnus.current_position, &alumnus.current_institution]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    if !now.is_empty() {
        let _ = write!(html, "<p class=\"current\">{}</p>", escape(&now.join(", ")));
    }

    for (label, href) in [("Lattes", &alumnus.lattes), ("LinkedIn", &alumnus.linkedin)] {
        if let Some(href) = href.as_deref() {
            let _ = write!(html, " {}", render::link(href, label));
        }
    }
    html.push_str("</li>");
    html
}

pub async fn export_csv(State(state): State<AppState>, Query(params): Query<AlumniParams>) -> Result<Response> {
    let alumni = state.content.alumni(QueryConfig::new()).await?;
    let filter = params.filter();
    let alumni: Vec<&Alumnus> = alumni.iter().filter(|a| filter.matches(*a)).collect();
    tracing::info!(count = alumni.len(), "Alumni exported as CSV");

    Ok(attachment(
        "text/csv; charset=utf-8",
        "alumni.csv",
        to_csv(alumni, &alumni_columns()),
    ))
}
