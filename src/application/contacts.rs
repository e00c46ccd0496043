//! Contact/address access with read-through caching.
//!
//! Contact data changes rarely but renders on every page, so the list and
//! company lookups run on a short five-minute TTL while single entries get
//! ten. There is no create or delete path; the upstream seeds one contact row
//! per company.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::{ContactsGateway, UpstreamError};
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::ContactRecord;

const LIST_TTL: Duration = Duration::from_secs(5 * 60);
const ENTRY_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Clone)]
pub struct ContactService {
    gateway: Arc<dyn ContactsGateway>,
    cache: Arc<ObjectCache>,
}

impl ContactService {
    pub fn new(gateway: Arc<dyn ContactsGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self) -> Result<Vec<ContactRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::CONTACT_ALL, LIST_TTL, move || async move {
                gateway.list().await
            })
            .await
            .map_err(AppError::from)
    }

    /// The upstream has no per-company endpoint; the full list is fetched and
    /// the company's row picked out, cached under the company key.
    pub async fn company_contact(
        &self,
        company_id: i64,
    ) -> Result<Option<ContactRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(
                &keys::contact_company(company_id),
                LIST_TTL,
                move || async move {
                    let all = gateway.list().await?;
                    Ok::<Option<ContactRecord>, UpstreamError>(all
                        .into_iter()
                        .find(|contact| contact.company_id == company_id))
                },
            )
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: &str) -> Result<ContactRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        let owned = id.to_string();
        self.cache
            .get_or_fetch(&keys::contact_item(id), ENTRY_TTL, move || async move {
                gateway.fetch(&owned).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn update(&self, id: &str, contact: &ContactRecord) -> Result<ContactRecord, AppError> {
        self.cache.invalidate(keys::CONTACT_ALL);
        self.cache
            .invalidate(&keys::contact_company(contact.company_id));
        self.cache.invalidate(&keys::contact_item(id));
        Ok(self.gateway.update(id, contact).await?)
    }

    /// Manual refresh: drop every contact key.
    pub fn refresh(&self) {
        self.cache.invalidate_pattern(&keys::CONTACT_PREFIX);
    }
}
