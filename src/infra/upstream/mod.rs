//! Reqwest-backed implementation of the upstream gateway traits.
//!
//! The remote catalog API is a conventional REST surface: `POST <R>/Search`
//! for lists, `GET`/`PUT`/`DELETE <R>/{id}` for single records, plus a couple
//! of legacy route shapes (`Address/EditAddress/{id}`, the `userId` query on
//! user updates) that are preserved verbatim.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::application::gateways::{
    AboutGateway, AuthGateway, CarouselGateway, ContactsGateway, ItemsGateway, MenusGateway,
    ProductsGateway, UpstreamError, UsersGateway,
};
use crate::config::UpstreamSettings;
use crate::domain::entities::{
    AboutRecord, CarouselRecord, ContactRecord, Credentials, ItemRecord, LoginGrant, MenuRecord,
    MenuTreeNode, ProductRecord, SearchQuery, UserRecord,
};
use crate::infra::error::InfraError;

pub struct UpstreamClient {
    http: Client,
    base: Url,
}

impl UpstreamClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, InfraError> {
        let base = settings.base_url()?;
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build upstream client: {err}"))
            })?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|err| UpstreamError::Transport(err.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let message = Self::error_body(response, status).await;
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|err| UpstreamError::Decode(err.to_string()))
    }

    async fn error_body(response: Response, status: StatusCode) -> String {
        match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => {
                debug!(status = %status, "upstream error response had no body");
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        Self::send(self.http.get(self.endpoint(path))).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        Self::send(self.http.post(self.endpoint(path)).json(body)).await
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, UpstreamError> {
        Self::send(self.http.put(self.endpoint(path)).json(body)).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, UpstreamError> {
        Self::send(self.http.delete(self.endpoint(path))).await
    }
}

#[async_trait]
impl ProductsGateway for UpstreamClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>, UpstreamError> {
        self.post_json("Product/Search", query).await
    }

    async fn fetch(&self, id: &str) -> Result<ProductRecord, UpstreamError> {
        self.get_json(&format!("Product/{id}")).await
    }

    async fn create(&self, product: &ProductRecord) -> Result<ProductRecord, UpstreamError> {
        self.post_json("Product", product).await
    }

    async fn update(
        &self,
        id: &str,
        product: &ProductRecord,
    ) -> Result<ProductRecord, UpstreamError> {
        self.put_json(&format!("Product/{id}"), product).await
    }

    async fn delete(&self, id: &str) -> Result<ProductRecord, UpstreamError> {
        self.delete_json(&format!("Product/{id}")).await
    }
}

#[async_trait]
impl ItemsGateway for UpstreamClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ItemRecord>, UpstreamError> {
        self.post_json("Item/Search", query).await
    }

    async fn fetch(&self, id: &str) -> Result<ItemRecord, UpstreamError> {
        self.get_json(&format!("Item/{id}")).await
    }

    async fn create(&self, item: &ItemRecord) -> Result<ItemRecord, UpstreamError> {
        self.post_json("Item", item).await
    }

    async fn update(&self, id: &str, item: &ItemRecord) -> Result<ItemRecord, UpstreamError> {
        self.put_json(&format!("Item/{id}"), item).await
    }

    async fn delete(&self, id: &str) -> Result<ItemRecord, UpstreamError> {
        self.delete_json(&format!("Item/{id}")).await
    }
}

#[async_trait]
impl CarouselGateway for UpstreamClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CarouselRecord>, UpstreamError> {
        self.post_json("Carousel/Search", query).await
    }

    async fn fetch(&self, id: &str) -> Result<CarouselRecord, UpstreamError> {
        self.get_json(&format!("Carousel/{id}")).await
    }

    async fn create(&self, slide: &CarouselRecord) -> Result<CarouselRecord, UpstreamError> {
        self.post_json("Carousel", slide).await
    }

    async fn update(
        &self,
        id: &str,
        slide: &CarouselRecord,
    ) -> Result<CarouselRecord, UpstreamError> {
        self.put_json(&format!("Carousel/{id}"), slide).await
    }

    async fn delete(&self, id: &str) -> Result<CarouselRecord, UpstreamError> {
        self.delete_json(&format!("Carousel/{id}")).await
    }
}

#[async_trait]
impl MenusGateway for UpstreamClient {
    async fn search(&self) -> Result<Vec<MenuRecord>, UpstreamError> {
        self.post_json("Menu/Search", &serde_json::json!({})).await
    }

    async fn fetch(&self, id: i64) -> Result<MenuRecord, UpstreamError> {
        self.get_json(&format!("Menu/{id}")).await
    }

    async fn create(&self, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError> {
        self.post_json("Menu", menu).await
    }

    async fn update(&self, id: i64, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError> {
        self.put_json(&format!("Menu/{id}"), menu).await
    }

    async fn delete(&self, id: i64) -> Result<MenuRecord, UpstreamError> {
        self.delete_json(&format!("Menu/{id}")).await
    }

    async fn tree_data(&self, user_id: i64) -> Result<Vec<MenuTreeNode>, UpstreamError> {
        Self::send(
            self.http
                .get(self.endpoint("Menu/GenerateTreeData"))
                .query(&[("userId", user_id)]),
        )
        .await
    }
}

#[async_trait]
impl UsersGateway for UpstreamClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<UserRecord>, UpstreamError> {
        self.post_json("User/Search", query).await
    }

    async fn fetch(&self, id: i64) -> Result<UserRecord, UpstreamError> {
        self.get_json(&format!("User/{id}")).await
    }

    async fn create(&self, user: &UserRecord) -> Result<UserRecord, UpstreamError> {
        self.post_json("User", user).await
    }

    async fn update(&self, id: i64, user: &UserRecord) -> Result<UserRecord, UpstreamError> {
        // Legacy route: the user id travels in the path and the query string.
        Self::send(
            self.http
                .put(self.endpoint(&format!("User/{id}")))
                .query(&[("userId", id)])
                .json(user),
        )
        .await
    }

    async fn delete(&self, id: i64) -> Result<UserRecord, UpstreamError> {
        self.delete_json(&format!("User/{id}")).await
    }
}

#[async_trait]
impl ContactsGateway for UpstreamClient {
    async fn list(&self) -> Result<Vec<ContactRecord>, UpstreamError> {
        self.get_json("Address").await
    }

    async fn fetch(&self, id: &str) -> Result<ContactRecord, UpstreamError> {
        self.get_json(&format!("Address/{id}")).await
    }

    async fn update(
        &self,
        id: &str,
        contact: &ContactRecord,
    ) -> Result<ContactRecord, UpstreamError> {
        self.put_json(&format!("Address/EditAddress/{id}"), contact).await
    }
}

#[async_trait]
impl AboutGateway for UpstreamClient {
    async fn fetch(&self, company_id: i64) -> Result<AboutRecord, UpstreamError> {
        self.get_json(&format!("AboutUs/{company_id}")).await
    }

    async fn update(&self, id: &str, about: &AboutRecord) -> Result<AboutRecord, UpstreamError> {
        self.put_json(&format!("AboutUs/{id}"), about).await
    }
}

#[async_trait]
impl AuthGateway for UpstreamClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, UpstreamError> {
        self.post_json("Authentication/Login", credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(&UpstreamSettings {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = client("http://catalog.local/api/");
        assert_eq!(
            client.endpoint("Product/Search"),
            "http://catalog.local/api/Product/Search"
        );
        assert_eq!(
            client.endpoint("/Address"),
            "http://catalog.local/api/Address"
        );
    }

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let result = UpstreamClient::new(&UpstreamSettings {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(InfraError::Configuration { .. })));
    }
}
