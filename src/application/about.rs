//! About-us content access with read-through caching.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::AboutGateway;
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::AboutRecord;

const ABOUT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Clone)]
pub struct AboutService {
    gateway: Arc<dyn AboutGateway>,
    cache: Arc<ObjectCache>,
}

impl AboutService {
    pub fn new(gateway: Arc<dyn AboutGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn for_company(&self, company_id: i64) -> Result<AboutRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(
                &keys::about_company(company_id),
                ABOUT_TTL,
                move || async move { gateway.fetch(company_id).await },
            )
            .await
            .map_err(AppError::from)
    }

    pub async fn update(&self, id: &str, about: &AboutRecord) -> Result<AboutRecord, AppError> {
        self.cache.invalidate(&keys::about_company(about.company_id));
        Ok(self.gateway.update(id, about).await?)
    }
}
