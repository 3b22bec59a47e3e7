//! Typed content accessors
//!
//! Every accessor is fetch, classify, flatten, deserialize. Default
//! populate/sort settings live here so call sites only pass overrides.
//! Errors are returned as-is; degrading to empty content is the page's call
//! (see `fallback`).

use crate::envelope::{ResponseData, ResponseEnvelope};
use crate::flatten::{FlatData, FlatRecord, Flattener, DEFAULT_DEPTH};
use crate::models::{
    Alumnus, ContentType, FacultyMember, HomepageSettings, NewsItem, PageKind, PageSettings,
    Partner, Project, Publication, ResearchLine,
};
use crate::query::{Populate, PopulateNode, QueryConfig};
use crate::source::ContentSource;
use futures::future::try_join_all;
use labsite_common::errors::{AppError, Result};
use labsite_common::DEFAULT_PAGE_SIZE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Relation depth for detail pages whose relations carry their own relations
const DETAIL_DEPTH: usize = 2;

/// Read-only handle over a content source
#[derive(Clone)]
pub struct ContentApi {
    source: Arc<dyn ContentSource>,
    page_size: u32,
}

impl ContentApi {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used when enumerating whole collections
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Check backend reachability
    pub async fn ping(&self) -> Result<()> {
        self.source.ping().await
    }

    // ========================================================================
    // Faculty
    // ========================================================================

    pub async fn faculty_members(&self, overrides: QueryConfig) -> Result<Vec<FacultyMember>> {
        let defaults = QueryConfig::new()
            .populate(Populate::fields(&["photo"]))
            .sort(&["order:asc", "name:asc"]);
        self.collection(ContentType::Faculty.resource(), defaults.merge(overrides), DEFAULT_DEPTH)
            .await
    }

    /// Profile with research lines, projects (and their lines) and publications
    pub async fn faculty_member_by_slug(&self, slug: &str) -> Result<Option<FacultyMember>> {
        let populate = Populate::nested()
            .relation("photo", PopulateNode::default())
            .relation("researchLines", PopulateNode::default())
            .relation("projects", PopulateNode::with(Populate::fields(&["researchLines"])))
            .relation("publications", PopulateNode::default());
        self.by_slug(ContentType::Faculty.resource(), slug, populate, DETAIL_DEPTH)
            .await
    }

    // ========================================================================
    // Research lines
    // ========================================================================

    pub async fn research_lines(&self, overrides: QueryConfig) -> Result<Vec<ResearchLine>> {
        let defaults = QueryConfig::new()
            .populate(Populate::fields(&["coverImage"]))
            .sort(&["order:asc"]);
        self.collection(ContentType::ResearchLine.resource(), defaults.merge(overrides), DEFAULT_DEPTH)
            .await
    }

    pub async fn research_line_by_slug(&self, slug: &str) -> Result<Option<ResearchLine>> {
        let populate = Populate::nested()
            .relation("coverImage", PopulateNode::default())
            .relation("facultyMembers", PopulateNode::with(Populate::fields(&["photo"])))
            .relation("projects", PopulateNode::default())
            .relation("publications", PopulateNode::default());
        self.by_slug(ContentType::ResearchLine.resource(), slug, populate, DEFAULT_DEPTH)
            .await
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub async fn projects(&self, overrides: QueryConfig) -> Result<Vec<Project>> {
        let defaults = QueryConfig::new()
            .populate(Populate::fields(&["coverImage", "coordinator"]))
            .sort(&["startDate:desc"]);
        self.collection(ContentType::Project.resource(), defaults.merge(overrides), DEFAULT_DEPTH)
            .await
    }

    pub async fn project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let populate = Populate::nested()
            .relation("coverImage", PopulateNode::default())
            .relation("coordinator", PopulateNode::with(Populate::fields(&["photo"])))
            .relation("team", PopulateNode::with(Populate::fields(&["photo"])))
            .relation("researchLines", PopulateNode::default())
            .relation("publications", PopulateNode::default());
        self.by_slug(ContentType::Project.resource(), slug, populate, DEFAULT_DEPTH)
            .await
    }

    // ========================================================================
    // Publications
    // ========================================================================

    fn publication_defaults() -> QueryConfig {
        QueryConfig::new()
            .populate(Populate::fields(&["researchLine"]))
            .sort(&["year:desc", "title:asc"])
    }

    pub async fn publications(&self, overrides: QueryConfig) -> Result<Vec<Publication>> {
        let query = Self::publication_defaults().merge(overrides);
        self.collection(ContentType::Publication.resource(), query, DEFAULT_DEPTH)
            .await
    }

    pub async fn publication_by_slug(&self, slug: &str) -> Result<Option<Publication>> {
        let populate = Populate::fields(&["authorRecords", "researchLine"]);
        self.by_slug(ContentType::Publication.resource(), slug, populate, DEFAULT_DEPTH)
            .await
    }

    /// Most recent publications flagged as featured
    pub async fn featured_publications(&self, limit: u32) -> Result<Vec<Publication>> {
        let query = Self::publication_defaults().merge(
            QueryConfig::new()
                .filter_eq("featured", true)
                .sort(&["year:desc"])
                .page(1, limit),
        );
        self.collection(ContentType::Publication.resource(), query, DEFAULT_DEPTH)
            .await
    }

    // ========================================================================
    // Alumni & partners
    // ========================================================================

    pub async fn alumni(&self, overrides: QueryConfig) -> Result<Vec<Alumnus>> {
        let defaults = QueryConfig::new()
            .populate(Populate::fields(&["photo", "degreeLevel", "sector"]))
            .sort(&["defenseYear:desc"]);
        self.collection(ContentType::Alumnus.resource(), defaults.merge(overrides), DEFAULT_DEPTH)
            .await
    }

    pub async fn partners(&self, overrides: QueryConfig) -> Result<Vec<Partner>> {
        let defaults = QueryConfig::new()
            .populate(Populate::fields(&["logo", "partnerType", "fundedProjects", "collaborators"]))
            .sort(&["name:asc"]);
        self.collection(ContentType::Partner.resource(), defaults.merge(overrides), DEFAULT_DEPTH)
            .await
    }

    // ========================================================================
    // News
    // ========================================================================

    fn news_defaults() -> QueryConfig {
        QueryConfig::new()
            .populate(Populate::fields(&["coverImage", "category"]))
            .sort(&["pinned:desc", "publishDate:desc"])
    }

    pub async fn news(&self, overrides: QueryConfig) -> Result<Vec<NewsItem>> {
        let query = Self::news_defaults().merge(overrides);
        self.collection(ContentType::News.resource(), query, DEFAULT_DEPTH)
            .await
    }

    pub async fn news_by_slug(&self, slug: &str) -> Result<Option<NewsItem>> {
        let populate = Populate::fields(&["coverImage", "category"]);
        self.by_slug(ContentType::News.resource(), slug, populate, DEFAULT_DEPTH)
            .await
    }

    pub async fn latest_news(&self, limit: u32) -> Result<Vec<NewsItem>> {
        let query = Self::news_defaults().merge(QueryConfig::new().page(1, limit));
        self.collection(ContentType::News.resource(), query, DEFAULT_DEPTH)
            .await
    }

    // ========================================================================
    // Singletons
    // ========================================================================

    pub async fn homepage_settings(&self) -> Result<Option<HomepageSettings>> {
        self.single("homepage", seo_populate()).await
    }

    pub async fn page_settings(&self, kind: PageKind) -> Result<Option<PageSettings>> {
        self.single(kind.resource(), seo_populate()).await
    }

    // ========================================================================
    // Static paths
    // ========================================================================

    /// Every slug in a collection, following backend pagination
    pub async fn slugs(&self, content_type: ContentType) -> Result<Vec<String>> {
        let resource = content_type.resource();
        let mut slugs = Vec::new();
        let mut page = 1;

        loop {
            let query = QueryConfig::new()
                .fields(&["slug"])
                .page(page, self.page_size);
            let envelope = self.fetch_envelope(resource, &query).await?;
            let page_count = envelope.page_count().unwrap_or(1);

            let records = self.flattener(0).flatten_data(&envelope.data).into_records();
            if records.is_empty() {
                break;
            }
            slugs.extend(
                records
                    .iter()
                    .filter_map(|r| r.get("slug").and_then(Value::as_str))
                    .map(str::to_string),
            );

            if page >= page_count {
                break;
            }
            page += 1;
        }

        tracing::debug!(resource = resource, count = slugs.len(), "Slugs enumerated");
        Ok(slugs)
    }

    /// `/<section>/<slug>` for every routed detail page
    pub async fn static_paths(&self) -> Result<Vec<String>> {
        let per_type = try_join_all(ContentType::ROUTED.iter().map(|content_type| async move {
            let slugs = self.slugs(*content_type).await?;
            Ok::<_, AppError>(
                slugs
                    .into_iter()
                    .map(|slug| format!("{}/{}", content_type.route_prefix(), slug))
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        Ok(per_type.into_iter().flatten().collect())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn flattener(&self, depth: usize) -> Flattener {
        Flattener::new(self.source.base_url().clone()).depth(depth)
    }

    async fn fetch_envelope(&self, resource: &str, query: &QueryConfig) -> Result<ResponseEnvelope> {
        let body = self.source.fetch(resource, query).await?;
        ResponseEnvelope::parse(&body)
    }

    async fn collection<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: QueryConfig,
        depth: usize,
    ) -> Result<Vec<T>> {
        let flattener = self.flattener(depth);

        // Caller asked for one window
        if query.pagination.is_some() {
            let envelope = self.fetch_envelope(resource, &query).await?;
            let records = flattener.flatten_data(&envelope.data).into_records();
            tracing::debug!(resource = resource, count = records.len(), "Collection loaded");
            return decode_records(&records);
        }

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let envelope = self
                .fetch_envelope(resource, &query.clone().page(page, self.page_size))
                .await?;
            let page_count = envelope.page_count().unwrap_or(1);
            let batch = flattener.flatten_data(&envelope.data).into_records();
            if batch.is_empty() {
                break;
            }
            records.extend(batch);

            if page >= page_count {
                break;
            }
            page += 1;
        }

        tracing::debug!(resource = resource, count = records.len(), pages = page, "Collection loaded");
        decode_records(&records)
    }

    async fn by_slug<T: DeserializeOwned>(
        &self,
        resource: &str,
        slug: &str,
        populate: Populate,
        depth: usize,
    ) -> Result<Option<T>> {
        let query = QueryConfig::new().filter_eq("slug", slug).populate(populate);
        let envelope = self.fetch_envelope(resource, &query).await?;
        let mut records = self.flattener(depth).flatten_data(&envelope.data).into_records();

        if records.len() > 1 {
            tracing::warn!(
                resource = resource,
                slug = slug,
                matches = records.len(),
                "Slug is not unique, using the first match"
            );
        }
        if records.is_empty() {
            tracing::debug!(resource = resource, slug = slug, "Slug not found");
            return Ok(None);
        }

        let record = records.swap_remove(0);
        Ok(Some(serde_json::from_value(record.to_json())?))
    }

    async fn single<T: DeserializeOwned>(&self, resource: &str, populate: Populate) -> Result<Option<T>> {
        let query = QueryConfig::new().populate(populate);
        let envelope = match self.fetch_envelope(resource, &query).await {
            Ok(envelope) => envelope,
            Err(AppError::Backend { status: 404, .. }) => {
                tracing::debug!(resource = resource, "Singleton not defined on the backend");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if let ResponseData::Many(_) = envelope.data {
            return Err(AppError::malformed(format!(
                "{} returned a collection where a single entry was expected",
                resource
            )));
        }

        match self.flattener(DEFAULT_DEPTH).flatten_data(&envelope.data) {
            FlatData::One(record) => Ok(Some(serde_json::from_value(record.to_json())?)),
            _ => Ok(None),
        }
    }
}

fn seo_populate() -> Populate {
    Populate::nested().relation("seo", PopulateNode::with(Populate::fields(&["shareImage"])))
}

fn decode_records<T: DeserializeOwned>(records: &[FlatRecord]) -> Result<Vec<T>> {
    records
        .iter()
        .map(|record| serde_json::from_value(record.to_json()).map_err(AppError::from))
        .collect()
}
