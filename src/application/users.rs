//! User administration with read-through caching.
//!
//! User writes only touch exact keys. Searches share the `users_all` key
//! regardless of filter, so a filtered search can serve another filter's
//! result until the entry rolls over; admin screens tolerate that.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::UsersGateway;
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::{SearchQuery, UserRecord};

const USER_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct UserService {
    gateway: Arc<dyn UsersGateway>,
    cache: Arc<ObjectCache>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn UsersGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Vec<UserRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::USERS_ALL, USER_TTL, move || async move {
                gateway.search(&query).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: i64) -> Result<UserRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(&keys::user(id), USER_TTL, move || async move {
                gateway.fetch(id).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn create(&self, user: &UserRecord) -> Result<UserRecord, AppError> {
        self.clear_user_cache(None);
        Ok(self.gateway.create(user).await?)
    }

    pub async fn update(&self, id: i64, user: &UserRecord) -> Result<UserRecord, AppError> {
        self.clear_user_cache(Some(id));
        Ok(self.gateway.update(id, user).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<UserRecord, AppError> {
        self.clear_user_cache(Some(id));
        let deleted = self.gateway.delete(id).await?;
        self.cache.invalidate(&keys::user(id));
        Ok(deleted)
    }

    /// Manual refresh: the list key plus every user key.
    pub fn refresh(&self) {
        self.cache.invalidate(keys::USERS_ALL);
        self.cache.invalidate_pattern(&keys::USER_PREFIX);
    }

    fn clear_user_cache(&self, id: Option<i64>) {
        self.cache.invalidate(keys::USERS_ALL);
        if let Some(id) = id {
            self.cache.invalidate(&keys::user(id));
        }
    }
}
