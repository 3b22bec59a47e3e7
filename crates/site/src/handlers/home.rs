//! Home page
//!
//! Four independent sections fetched concurrently. Each one falls back on its
//! own, so a slow or failing collection only blanks its own block.

use crate::handlers::news;
use crate::render::{self, escape, PageHead};
use crate::AppState;
use axum::{extract::State, response::Html};
use labsite_cms::models::HomepageSettings;
use labsite_cms::{Fallback, QueryConfig, Section};
use std::fmt::Write;

const FEATURED_PUBLICATIONS: u32 = 5;
const LATEST_NEWS: u32 = 3;

pub async fn home(State(state): State<AppState>) -> Html<String> {
    let (settings, lines, publications, latest) = tokio::join!(
        state.content.homepage_settings(),
        state.content.research_lines(QueryConfig::new()),
        state.content.featured_publications(FEATURED_PUBLICATIONS),
        state.content.latest_news(LATEST_NEWS),
    );

    let settings: HomepageSettings = settings.or_fallback("home.settings").unwrap_or_default();
    let lines = lines.into_section("home.research_lines");
    let publications = publications.into_section("home.publications");
    let latest = latest.into_section("home.news");

    let site = &state.config.site;
    let hero_title = settings
        .hero_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| site.name.clone());
    let hero_subtitle = settings.hero_subtitle.as_deref().or(Some(site.tagline.as_str()));

    let head = PageHead::new(hero_title)
        .subtitle(hero_subtitle)
        .seo(settings.seo.as_ref());

    let mut body = String::new();
    if let (Some(label), Some(url)) = (settings.cta_label.as_deref(), settings.cta_url.as_deref()) {
        let _ = write!(body, "<p class=\"cta\">{}</p>", render::link(url, label));
    }

    if settings.about_text.is_some() {
        let _ = write!(
            body,
            "<section class=\"about\"><h2>{}</h2>{}</section>",
            escape(settings.about_title.as_deref().unwrap_or("About")),
            render::paragraph("about", settings.about_text.as_deref()),
        );
    }

    let unavailable = &site.empty_state_message;

    body.push_str(&block("Research Lines", "/research", &lines, unavailable, |lines| {
        lines
            .iter()
            .map(|l| render::link(&format!("/research/{}", l.slug), &l.title))
            .collect()
    }));

    body.push_str(&block("Featured Publications", "/publications", &publications, unavailable, |publications| {
        publications
            .iter()
            .map(|p| match p.year {
                Some(year) => format!("{} ({})", render::link(&format!("/publications/{}", p.slug), &p.title), year),
                None => render::link(&format!("/publications/{}", p.slug), &p.title),
            })
            .collect()
    }));

    body.push_str(&block("Latest News", "/news", &latest, unavailable, |items| {
        items
            .iter()
            .map(|n| format!("{} <small>{}</small>", render::link(&format!("/news/{}", n.slug), &n.title), news::byline(n)))
            .collect()
    }));

    Html(render::layout(site, &head, &body))
}

/// One home page section with a "see all" link
fn block<T>(
    heading: &str,
    href: &str,
    section: &Section<Vec<T>>,
    unavailable: &str,
    render_items: impl FnOnce(&[T]) -> Vec<String>,
) -> String {
    let inner = match section {
        Section::Unavailable => render::empty_state(unavailable),
        Section::Loaded(items) if items.is_empty() => String::new(),
        Section::Loaded(items) => {
            let mut html = String::from("<ul>");
            for item in render_items(items) {
                let _ = write!(html, "<li>{}</li>", item);
            }
            html.push_str("</ul>");
            html
        }
    };

    format!(
        "<section class=\"home-block\"><h2>{}</h2>{}<p>{}</p></section>",
        escape(heading),
        inner,
        render::link(href, "See all")
    )
}
