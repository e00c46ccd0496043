//! Menu access with read-through caching.
//!
//! Menu writes clear the per-user tree caches wholesale: trees are derived
//! from the full menu table, so any structural change can affect any user.

use std::sync::Arc;
use std::time::Duration;

use crate::application::error::AppError;
use crate::application::gateways::MenusGateway;
use crate::cache::keys;
use crate::cache::ObjectCache;
use crate::domain::entities::{MenuRecord, MenuTreeNode};

const MENU_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone)]
pub struct MenuService {
    gateway: Arc<dyn MenusGateway>,
    cache: Arc<ObjectCache>,
}

impl MenuService {
    pub fn new(gateway: Arc<dyn MenusGateway>, cache: Arc<ObjectCache>) -> Self {
        Self { gateway, cache }
    }

    pub async fn list(&self) -> Result<Vec<MenuRecord>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(keys::MENUS_ALL, MENU_TTL, move || async move {
                gateway.search().await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn get(&self, id: i64) -> Result<MenuRecord, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(&keys::menu(id), MENU_TTL, move || async move {
                gateway.fetch(id).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn tree_for_user(&self, user_id: i64) -> Result<Vec<MenuTreeNode>, AppError> {
        let gateway = Arc::clone(&self.gateway);
        self.cache
            .get_or_fetch(&keys::menu_tree_user(user_id), MENU_TTL, move || async move {
                gateway.tree_data(user_id).await
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn create(&self, menu: &MenuRecord) -> Result<MenuRecord, AppError> {
        self.clear_menu_cache(None);
        Ok(self.gateway.create(menu).await?)
    }

    pub async fn update(&self, id: i64, menu: &MenuRecord) -> Result<MenuRecord, AppError> {
        self.clear_menu_cache(Some(id));
        Ok(self.gateway.update(id, menu).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<MenuRecord, AppError> {
        self.clear_menu_cache(Some(id));
        let deleted = self.gateway.delete(id).await?;
        self.cache.invalidate(&keys::menu(id));
        Ok(deleted)
    }

    /// Manual refresh: the list key plus every menu and tree key.
    pub fn refresh(&self) {
        self.cache.invalidate(keys::MENUS_ALL);
        self.cache.invalidate_pattern(&keys::MENU_PREFIX);
        self.cache.invalidate_pattern(&keys::MENU_TREE_PREFIX);
    }

    fn clear_menu_cache(&self, id: Option<i64>) {
        self.cache.invalidate(keys::MENUS_ALL);
        self.cache
            .invalidate_pattern(&keys::MENU_TREE_USER_PREFIX);
        if let Some(id) = id {
            self.cache.invalidate(&keys::menu(id));
        }
    }
}
