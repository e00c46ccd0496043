//! Upstream gateway traits.
//!
//! The data-access services are written against these traits; the reqwest
//! implementation lives in `infra::upstream`. Tests substitute mocks.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    AboutRecord, CarouselRecord, ContactRecord, Credentials, ItemRecord, LoginGrant, MenuRecord,
    MenuTreeNode, ProductRecord, SearchQuery, UserRecord,
};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("upstream transport failure: {0}")]
    Transport(String),
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

#[async_trait]
pub trait ProductsGateway: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>, UpstreamError>;
    async fn fetch(&self, id: &str) -> Result<ProductRecord, UpstreamError>;
    async fn create(&self, product: &ProductRecord) -> Result<ProductRecord, UpstreamError>;
    async fn update(&self, id: &str, product: &ProductRecord)
    -> Result<ProductRecord, UpstreamError>;
    async fn delete(&self, id: &str) -> Result<ProductRecord, UpstreamError>;
}

#[async_trait]
pub trait ItemsGateway: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ItemRecord>, UpstreamError>;
    async fn fetch(&self, id: &str) -> Result<ItemRecord, UpstreamError>;
    async fn create(&self, item: &ItemRecord) -> Result<ItemRecord, UpstreamError>;
    async fn update(&self, id: &str, item: &ItemRecord) -> Result<ItemRecord, UpstreamError>;
    async fn delete(&self, id: &str) -> Result<ItemRecord, UpstreamError>;
}

#[async_trait]
pub trait CarouselGateway: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CarouselRecord>, UpstreamError>;
    async fn fetch(&self, id: &str) -> Result<CarouselRecord, UpstreamError>;
    async fn create(&self, slide: &CarouselRecord) -> Result<CarouselRecord, UpstreamError>;
    async fn update(&self, id: &str, slide: &CarouselRecord)
    -> Result<CarouselRecord, UpstreamError>;
    async fn delete(&self, id: &str) -> Result<CarouselRecord, UpstreamError>;
}

#[async_trait]
pub trait MenusGateway: Send + Sync {
    async fn search(&self) -> Result<Vec<MenuRecord>, UpstreamError>;
    async fn fetch(&self, id: i64) -> Result<MenuRecord, UpstreamError>;
    async fn create(&self, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError>;
    async fn update(&self, id: i64, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError>;
    async fn delete(&self, id: i64) -> Result<MenuRecord, UpstreamError>;
    async fn tree_data(&self, user_id: i64) -> Result<Vec<MenuTreeNode>, UpstreamError>;
}

#[async_trait]
pub trait UsersGateway: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<UserRecord>, UpstreamError>;
    async fn fetch(&self, id: i64) -> Result<UserRecord, UpstreamError>;
    async fn create(&self, user: &UserRecord) -> Result<UserRecord, UpstreamError>;
    async fn update(&self, id: i64, user: &UserRecord) -> Result<UserRecord, UpstreamError>;
    async fn delete(&self, id: i64) -> Result<UserRecord, UpstreamError>;
}

#[async_trait]
pub trait ContactsGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<ContactRecord>, UpstreamError>;
    async fn fetch(&self, id: &str) -> Result<ContactRecord, UpstreamError>;
    async fn update(&self, id: &str, contact: &ContactRecord)
    -> Result<ContactRecord, UpstreamError>;
}

#[async_trait]
pub trait AboutGateway: Send + Sync {
    async fn fetch(&self, company_id: i64) -> Result<AboutRecord, UpstreamError>;
    async fn update(&self, id: &str, about: &AboutRecord) -> Result<AboutRecord, UpstreamError>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, UpstreamError>;
}
