//! Shared fixtures: canned records and counting mock gateways.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use vitrina::application::gateways::{
    AboutGateway, AuthGateway, CarouselGateway, ContactsGateway, ItemsGateway, MenusGateway,
    ProductsGateway, UpstreamError, UsersGateway,
};
use vitrina::domain::entities::{
    AboutRecord, CarouselRecord, ContactRecord, Credentials, ItemRecord, LoginGrant, MenuRecord,
    MenuTreeNode, ProductRecord, SearchQuery, UserRecord,
};

pub fn product(id: &str, company_id: i64) -> ProductRecord {
    ProductRecord {
        id: id.to_string(),
        company_id,
        product_category: "Imaging".to_string(),
        product_name: format!("Scanner {id}"),
        brand: "Acme".to_string(),
        model: "US-300".to_string(),
        origin: "DE".to_string(),
        description: "Portable ultrasound scanner".to_string(),
        aditional_information: String::new(),
        special_feature: String::new(),
        catalog_url: None,
        image_url: None,
    }
}

pub fn item(id: &str, company_id: i64) -> ItemRecord {
    ItemRecord {
        id: id.to_string(),
        company_id,
        item_name: format!("Item {id}"),
        item_category: "Consumables".to_string(),
        description: String::new(),
        image_url: None,
    }
}

pub fn slide(id: &str, company_id: i64) -> CarouselRecord {
    CarouselRecord {
        id: id.to_string(),
        company_id,
        title: format!("Slide {id}"),
        description: String::new(),
        image_url: None,
    }
}

pub fn contact(id: &str, company_id: i64) -> ContactRecord {
    ContactRecord {
        id: id.to_string(),
        company_id,
        address1: Some("1 Clinic Way".to_string()),
        address2: None,
        phone_number1: Some("555-0100".to_string()),
        phone_number2: None,
        phone_number3: None,
        email: Some("office@example.test".to_string()),
        facebook_link: None,
        others_link1: None,
        others_link2: None,
    }
}

pub fn about(company_id: i64) -> AboutRecord {
    AboutRecord {
        id: format!("about-{company_id}"),
        company_id,
        heading: "Who we are".to_string(),
        title: "Vitrina Medical".to_string(),
        description: "Medical equipment distributor".to_string(),
        title2: None,
        description2: None,
        title3: None,
        description3: None,
        title4: None,
        description4: None,
        title5: None,
        description5: None,
    }
}

pub fn menu(id: i64) -> MenuRecord {
    MenuRecord {
        id,
        parent_id: None,
        menu_name: format!("Menu {id}"),
        path: format!("/menu-{id}"),
        sort_order: id as i32,
    }
}

pub fn menu_node(id: i64, path: &str) -> MenuTreeNode {
    MenuTreeNode {
        id,
        menu_name: format!("Node {id}"),
        path: path.to_string(),
        children: Vec::new(),
    }
}

pub fn user(id: i64) -> UserRecord {
    UserRecord {
        id,
        company_id: Some(1),
        username: format!("user{id}"),
        email: None,
    }
}

/// A gateway serving canned data and counting upstream calls.
#[derive(Default)]
pub struct MockCatalog {
    pub products: Vec<ProductRecord>,
    pub items: Vec<ItemRecord>,
    pub slides: Vec<CarouselRecord>,
    pub contacts: Vec<ContactRecord>,
    pub menus: Vec<MenuRecord>,
    pub users: Vec<UserRecord>,
    pub abouts: Vec<AboutRecord>,
    pub calls: AtomicUsize,
}

impl MockCatalog {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductsGateway for MockCatalog {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<ProductRecord>, UpstreamError> {
        self.tick();
        Ok(self.products.clone())
    }

    async fn fetch(&self, id: &str) -> Result<ProductRecord, UpstreamError> {
        self.tick();
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such product"))
    }

    async fn create(&self, product: &ProductRecord) -> Result<ProductRecord, UpstreamError> {
        self.tick();
        Ok(product.clone())
    }

    async fn update(
        &self,
        _id: &str,
        product: &ProductRecord,
    ) -> Result<ProductRecord, UpstreamError> {
        self.tick();
        Ok(product.clone())
    }

    async fn delete(&self, id: &str) -> Result<ProductRecord, UpstreamError> {
        self.tick();
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such product"))
    }
}

#[async_trait]
impl ItemsGateway for MockCatalog {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<ItemRecord>, UpstreamError> {
        self.tick();
        Ok(self.items.clone())
    }

    async fn fetch(&self, id: &str) -> Result<ItemRecord, UpstreamError> {
        self.tick();
        self.items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such item"))
    }

    async fn create(&self, item: &ItemRecord) -> Result<ItemRecord, UpstreamError> {
        self.tick();
        Ok(item.clone())
    }

    async fn update(&self, _id: &str, item: &ItemRecord) -> Result<ItemRecord, UpstreamError> {
        self.tick();
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<ItemRecord, UpstreamError> {
        self.tick();
        self.items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such item"))
    }
}

#[async_trait]
impl CarouselGateway for MockCatalog {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<CarouselRecord>, UpstreamError> {
        self.tick();
        Ok(self.slides.clone())
    }

    async fn fetch(&self, id: &str) -> Result<CarouselRecord, UpstreamError> {
        self.tick();
        self.slides
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such slide"))
    }

    async fn create(&self, slide: &CarouselRecord) -> Result<CarouselRecord, UpstreamError> {
        self.tick();
        Ok(slide.clone())
    }

    async fn update(
        &self,
        _id: &str,
        slide: &CarouselRecord,
    ) -> Result<CarouselRecord, UpstreamError> {
        self.tick();
        Ok(slide.clone())
    }

    async fn delete(&self, id: &str) -> Result<CarouselRecord, UpstreamError> {
        self.tick();
        self.slides
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such slide"))
    }
}

#[async_trait]
impl MenusGateway for MockCatalog {
    async fn search(&self) -> Result<Vec<MenuRecord>, UpstreamError> {
        self.tick();
        Ok(self.menus.clone())
    }

    async fn fetch(&self, id: i64) -> Result<MenuRecord, UpstreamError> {
        self.tick();
        self.menus
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such menu"))
    }

    async fn create(&self, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError> {
        self.tick();
        Ok(menu.clone())
    }

    async fn update(&self, _id: i64, menu: &MenuRecord) -> Result<MenuRecord, UpstreamError> {
        self.tick();
        Ok(menu.clone())
    }

    async fn delete(&self, id: i64) -> Result<MenuRecord, UpstreamError> {
        self.tick();
        self.menus
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such menu"))
    }

    async fn tree_data(&self, user_id: i64) -> Result<Vec<MenuTreeNode>, UpstreamError> {
        self.tick();
        Ok(vec![menu_node(user_id, "/admin/products")])
    }
}

#[async_trait]
impl UsersGateway for MockCatalog {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<UserRecord>, UpstreamError> {
        self.tick();
        Ok(self.users.clone())
    }

    async fn fetch(&self, id: i64) -> Result<UserRecord, UpstreamError> {
        self.tick();
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such user"))
    }

    async fn create(&self, user: &UserRecord) -> Result<UserRecord, UpstreamError> {
        self.tick();
        Ok(user.clone())
    }

    async fn update(&self, _id: i64, user: &UserRecord) -> Result<UserRecord, UpstreamError> {
        self.tick();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<UserRecord, UpstreamError> {
        self.tick();
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such user"))
    }
}

#[async_trait]
impl ContactsGateway for MockCatalog {
    async fn list(&self) -> Result<Vec<ContactRecord>, UpstreamError> {
        self.tick();
        Ok(self.contacts.clone())
    }

    async fn fetch(&self, id: &str) -> Result<ContactRecord, UpstreamError> {
        self.tick();
        self.contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no such contact"))
    }

    async fn update(
        &self,
        _id: &str,
        contact: &ContactRecord,
    ) -> Result<ContactRecord, UpstreamError> {
        self.tick();
        Ok(contact.clone())
    }
}

#[async_trait]
impl AboutGateway for MockCatalog {
    async fn fetch(&self, company_id: i64) -> Result<AboutRecord, UpstreamError> {
        self.tick();
        self.abouts
            .iter()
            .find(|a| a.company_id == company_id)
            .cloned()
            .ok_or_else(|| UpstreamError::status(404, "no about content"))
    }

    async fn update(&self, _id: &str, about: &AboutRecord) -> Result<AboutRecord, UpstreamError> {
        self.tick();
        Ok(about.clone())
    }
}

/// Auth gateway accepting a single credential pair.
pub struct MockAuth {
    pub grant: LoginGrant,
}

impl MockAuth {
    pub fn accepting(username: &str, menu: Vec<MenuTreeNode>) -> Self {
        Self {
            grant: LoginGrant {
                token: "upstream-token".to_string(),
                expiration: time::OffsetDateTime::now_utc() + time::Duration::hours(1),
                username: username.to_string(),
                company_id: Some(1),
                user_menu: menu,
            },
        }
    }
}

#[async_trait]
impl AuthGateway for MockAuth {
    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, UpstreamError> {
        if credentials.username == self.grant.username && credentials.password == "correct" {
            Ok(self.grant.clone())
        } else {
            Err(UpstreamError::status(401, "invalid login"))
        }
    }
}

/// Convenience alias used by the service-level tests.
pub type SharedMock = Arc<MockCatalog>;
