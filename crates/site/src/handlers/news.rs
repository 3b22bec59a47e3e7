//! News pages

use super::{detail_page, essential, Listing};
use crate::render::{self, escape, PageHead};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{Html, Response},
};
use labsite_cms::models::{NewsItem, PageKind};
use labsite_cms::{Fallback, QueryConfig};
use std::fmt::Write;

const TEASER_CHARS: usize = 200;

pub async fn list(State(state): State<AppState>) -> Html<String> {
    let (settings, news) = tokio::join!(
        state.content.page_settings(PageKind::News),
        state.content.news(QueryConfig::new()),
    );

    let listing = Listing::new(&state, PageKind::News, settings);
    let news = news.into_section("news.list");

    let body = listing.section(&news, |items| {
        let mut html = String::from("<ul class=\"cards news\">");
        for item in items {
            html.push_str(&card(item));
        }
        html.push_str("</ul>");
        html
    });

    listing.render(&state, &body)
}

/// Publish date and category
pub(crate) fn byline(item: &NewsItem) -> String {
    [
        item.publish_date.map(|d| d.format("%Y-%m-%d").to_string()),
        item.category.as_ref().map(|c| c.name.clone()),
    ]
    .into_iter()
    .flatten()
    .map(|part| escape(&part))
    .collect::<Vec<_>>()
    .join(" &middot; ")
}

fn card(item: &NewsItem) -> String {
    let class = if item.pinned { "card pinned" } else { "card" };
    format!(
        "<li class=\"{}\">{}<h3>{}</h3><p class=\"byline\">{}</p>{}</li>",
        class,
        render::image(item.cover_image.as_ref(), "small", &item.title),
        render::link(&format!("/news/{}", item.slug), &item.title),
        byline(item),
        render::paragraph("teaser", item.teaser(TEASER_CHARS).as_deref()),
    )
}

pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let item = state.content.news_by_slug(&slug).await;
    let page = essential(item, "news item", &slug).map(|item| article(&item));
    detail_page(&state, page)
}

fn article(item: &NewsItem) -> (PageHead, String) {
    let head = PageHead::new(item.title.clone()).subtitle(item.excerpt.as_deref());

    let mut body = format!("<p class=\"byline\">{}</p>", byline(item));
    body.push_str(&render::image(item.cover_image.as_ref(), "large", &item.title));

    // Blank lines separate paragraphs
    let content = item.content.as_deref().unwrap_or_default();
    for paragraph in content.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let _ = write!(body, "<p>{}</p>", escape(paragraph));
    }

    (head, body)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;
    use serde_json::json;

    fn news() -> serde_json::Value {
        json!({ "data": [{ "id": 8, "attributes": {
            "title": "Best paper award", "slug": "best-paper",
            "content": "The group won.\n\nThe paper covers graph networks.",
            "publishDate": "2024-05-02T10:00:00.000Z",
            "pinned": true,
            "category": { "data": { "id": 1, "attributes": { "name": "Awards" } } }
        }}]})
    }

    #[tokio::test]
    async fn test_list_shows_byline() {
        let source = StaticContentSource::new(base_url()).with_response("news-items", news());
        let (status, body) = get(app(source), "/news").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li class=\"card pinned\">"));
        assert!(body.contains("2024-05-02 &middot; Awards"));
    }

    #[tokio::test]
    async fn test_detail_splits_paragraphs() {
        let source = StaticContentSource::new(base_url()).with_response("news-items", news());
        let (status, body) = get(app(source), "/news/best-paper").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<p>The group won.</p><p>The paper covers graph networks.</p>"));
    }

    #[tokio::test]
    async fn test_detail_without_backend_is_404() {
        let (status, _) = get(offline_app(), "/news/best-paper").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
