//! Carousel slide access with read-through caching.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::CarouselGateway;
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::{CarouselRecord, SearchQuery};

const LIST_TTL: Duration = Duration::from_secs(15 * 60);
const ENTRY_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct CarouselService {
    gateway: Arc<dyn CarouselGateway>,
    cache: Arc<ObjectCache>,
}

impl CarouselService {
    pub fn new(gateway: Arc<dyn CarouselGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, query: SearchQuery) -> Result<Vec<CarouselRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::CAROUSEL_ALL, LIST_TTL, move || async move {
                gateway.search(&query).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: &str) -> Result<CarouselRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        let owned = id.to_string();
        self.cache
            .get_or_fetch(&keys::carousel_item(id), ENTRY_TTL, move || async move {
                gateway.fetch(&owned).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn create(&self, slide: &CarouselRecord) -> Result<CarouselRecord, AppError> {
        self.cache.invalidate(keys::CAROUSEL_ALL);
        Ok(self.gateway.create(slide).await?)
    }

    pub async fn update(&self, id: &str, slide: &CarouselRecord) -> Result<CarouselRecord, AppError> {
        self.cache.invalidate(keys::CAROUSEL_ALL);
        self.cache
            .invalidate(&keys::carousel_company(slide.company_id));
        self.cache.invalidate(&keys::carousel_item(id));
        Ok(self.gateway.update(id, slide).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<CarouselRecord, AppError> {
        let deleted = self.gateway.delete(id).await?;
        self.cache.invalidate(keys::CAROUSEL_ALL);
        self.cache
            .invalidate_pattern(&keys::CAROUSEL_COMPANY_PREFIX);
        self.cache.invalidate(&keys::carousel_item(id));
        Ok(deleted)
    }

    /// Manual refresh: drop every carousel key.
    pub fn refresh(&self) {
        self.cache.invalidate_pattern(&keys::CAROUSEL_PREFIX);
    }
}
