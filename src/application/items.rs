//! Item catalog access with read-through caching.
//!
//! Invalidation here is deliberately asymmetric: creating an item only clears
//! the list key, while delete also sweeps the per-company keys. Each write
//! path mirrors what its storefront call site expects, nothing more.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::ItemsGateway;
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::{ItemRecord, SearchQuery};

const LIST_TTL: Duration = Duration::from_secs(15 * 60);
const ENTRY_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct ItemService {
    gateway: Arc<dyn ItemsGateway>,
    cache: Arc<ObjectCache>,
}

impl ItemService {
    pub fn new(gateway: Arc<dyn ItemsGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, query: SearchQuery) -> Result<Vec<ItemRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::ITEM_ALL, LIST_TTL, move || async move {
                gateway.search(&query).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: &str) -> Result<ItemRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        let owned = id.to_string();
        self.cache
            .get_or_fetch(&keys::item(id), ENTRY_TTL, move || async move {
                gateway.fetch(&owned).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn create(&self, item: &ItemRecord) -> Result<ItemRecord, AppError> {
        self.cache.invalidate(keys::ITEM_ALL);
        Ok(self.gateway.create(item).await?)
    }

    pub async fn update(&self, id: &str, item: &ItemRecord) -> Result<ItemRecord, AppError> {
        self.cache.invalidate(keys::ITEM_ALL);
        self.cache.invalidate(&keys::item_company(item.company_id));
        self.cache.invalidate(&keys::item(id));
        Ok(self.gateway.update(id, item).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<ItemRecord, AppError> {
        let deleted = self.gateway.delete(id).await?;
        self.cache.invalidate(keys::ITEM_ALL);
        self.cache.invalidate_pattern(&keys::ITEM_COMPANY_PREFIX);
        self.cache.invalidate(&keys::item(id));
        Ok(deleted)
    }

    /// Manual refresh: drop every item key.
    pub fn refresh(&self) {
        self.cache.invalidate_pattern(&keys::ITEM_PREFIX);
    }
}
