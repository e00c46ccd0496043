//! Product catalog access with read-through caching.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::{ProductsGateway, UpstreamError};
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::{ProductRecord, SearchQuery};

const LIST_TTL: Duration = Duration::from_secs(5 * 60);
const ENTRY_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct ProductService {
    gateway: Arc<dyn ProductsGateway>,
    cache: Arc<ObjectCache>,
}

impl ProductService {
    pub fn new(gateway: Arc<dyn ProductsGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self, query: SearchQuery) -> Result<Vec<ProductRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::PRODUCT_ALL, LIST_TTL, move || async move {
                gateway.search(&query).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: &str) -> Result<ProductRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        let owned = id.to_string();
        self.cache
            .get_or_fetch(&keys::product_item(id), ENTRY_TTL, move || async move {
                gateway.fetch(&owned).await
            })
            .await
            .map_err(AppError::from)
    }

    /// The upstream has no per-company endpoint; the full list is fetched and
    /// filtered here, cached under the company key.
    pub async fn company_products(&self, company_id: i64) -> Result<Vec<ProductRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(
                &keys::product_company(company_id),
                ENTRY_TTL,
                move || async move {
                    let all = gateway.search(&SearchQuery::default()).await?;
                    Ok::<Vec<ProductRecord>, UpstreamError>(all
                        .into_iter()
                        .filter(|product| product.company_id == company_id)
                        .collect::<Vec<_>>())
                },
            )
            .await
            .map_err(AppError::from)
    }

    pub async fn create(&self, product: &ProductRecord) -> Result<ProductRecord, AppError> {
        self.cache.invalidate(keys::PRODUCT_ALL);
        Ok(self.gateway.create(product).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        product: &ProductRecord,
    ) -> Result<ProductRecord, AppError> {
        self.cache.invalidate(keys::PRODUCT_ALL);
        self.cache
            .invalidate(&keys::product_company(product.company_id));
        self.cache.invalidate(&keys::product_item(id));
        Ok(self.gateway.update(id, product).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<ProductRecord, AppError> {
        let deleted = self.gateway.delete(id).await?;
        self.cache.invalidate(keys::PRODUCT_ALL);
        self.cache.invalidate_pattern(&keys::PRODUCT_COMPANY_PREFIX);
        self.cache.invalidate(&keys::product_item(id));
        Ok(deleted)
    }
}
