//! Catalog REST handlers.
//!
//! Reads are public and served through the object cache; writes require a
//! session whose menu grants the matching admin path.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::application::error::AppError;
use crate::domain::entities::{
    AboutRecord, CarouselRecord, ContactRecord, ItemRecord, MenuRecord, MenuTreeNode,
    ProductRecord, SearchQuery, UserRecord,
};

use super::AppState;
use super::auth::{AuthAck, authenticated_user, require_permission};

const PRODUCTS_PATH: &str = "/admin/products";
const ITEMS_PATH: &str = "/admin/items";
const CAROUSEL_PATH: &str = "/admin/carousel";
const MENUS_PATH: &str = "/admin/menus";
const USERS_PATH: &str = "/admin/users";
const CONTACTS_PATH: &str = "/admin/contacts";
const ABOUT_PATH: &str = "/admin/about";
const CACHE_PATH: &str = "/admin/cache";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub company: Option<i64>,
    pub term: Option<String>,
}

impl ListQuery {
    fn search(&self) -> SearchQuery {
        SearchQuery {
            company_id: self.company,
            term: self.term.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

// ============================================================================
// Products
// ============================================================================

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductRecord>>, AppError> {
    let products = match query.company {
        Some(company_id) => state.products.company_products(company_id).await?,
        None => state.products.list(query.search()).await?,
    };
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductRecord>, AppError> {
    Ok(Json(state.products.get(&id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(product): Json<ProductRecord>,
) -> Result<Json<ProductRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, PRODUCTS_PATH)?;
    Ok(Json(state.products.create(&product).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(product): Json<ProductRecord>,
) -> Result<Json<ProductRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, PRODUCTS_PATH)?;
    Ok(Json(state.products.update(&id, &product).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Json<ProductRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, PRODUCTS_PATH)?;
    Ok(Json(state.products.delete(&id).await?))
}

// ============================================================================
// Items
// ============================================================================

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ItemRecord>>, AppError> {
    Ok(Json(state.items.list(query.search()).await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemRecord>, AppError> {
    Ok(Json(state.items.get(&id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(item): Json<ItemRecord>,
) -> Result<Json<ItemRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, ITEMS_PATH)?;
    Ok(Json(state.items.create(&item).await?))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(item): Json<ItemRecord>,
) -> Result<Json<ItemRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, ITEMS_PATH)?;
    Ok(Json(state.items.update(&id, &item).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Json<ItemRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, ITEMS_PATH)?;
    Ok(Json(state.items.delete(&id).await?))
}

// ============================================================================
// Carousel
// ============================================================================

pub async fn list_carousel(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CarouselRecord>>, AppError> {
    Ok(Json(state.carousels.list(query.search()).await?))
}

pub async fn get_carousel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CarouselRecord>, AppError> {
    Ok(Json(state.carousels.get(&id).await?))
}

pub async fn create_carousel(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(slide): Json<CarouselRecord>,
) -> Result<Json<CarouselRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, CAROUSEL_PATH)?;
    Ok(Json(state.carousels.create(&slide).await?))
}

pub async fn update_carousel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(slide): Json<CarouselRecord>,
) -> Result<Json<CarouselRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, CAROUSEL_PATH)?;
    Ok(Json(state.carousels.update(&id, &slide).await?))
}

pub async fn delete_carousel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Json<CarouselRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, CAROUSEL_PATH)?;
    Ok(Json(state.carousels.delete(&id).await?))
}

// ============================================================================
// Menus
// ============================================================================

pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<MenuRecord>>, AppError> {
    Ok(Json(state.menus.list().await?))
}

pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MenuRecord>, AppError> {
    Ok(Json(state.menus.get(id).await?))
}

pub async fn menu_tree(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<MenuTreeNode>>, AppError> {
    authenticated_user(&state, &jar)?;
    Ok(Json(state.menus.tree_for_user(query.user_id).await?))
}

pub async fn create_menu(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(menu): Json<MenuRecord>,
) -> Result<Json<MenuRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, MENUS_PATH)?;
    Ok(Json(state.menus.create(&menu).await?))
}

pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Json(menu): Json<MenuRecord>,
) -> Result<Json<MenuRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, MENUS_PATH)?;
    Ok(Json(state.menus.update(id, &menu).await?))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Json<MenuRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, MENUS_PATH)?;
    Ok(Json(state.menus.delete(id).await?))
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, USERS_PATH)?;
    Ok(Json(state.users.search(query.search()).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Json<UserRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, USERS_PATH)?;
    Ok(Json(state.users.get(id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(record): Json<UserRecord>,
) -> Result<Json<UserRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, USERS_PATH)?;
    Ok(Json(state.users.create(&record).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
    Json(record): Json<UserRecord>,
) -> Result<Json<UserRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, USERS_PATH)?;
    Ok(Json(state.users.update(id, &record).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> Result<Json<UserRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, USERS_PATH)?;
    Ok(Json(state.users.delete(id).await?))
}

// ============================================================================
// Contacts
// ============================================================================

pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactRecord>>, AppError> {
    Ok(Json(state.contacts.list().await?))
}

pub async fn company_contact(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Option<ContactRecord>>, AppError> {
    Ok(Json(state.contacts.company_contact(company_id).await?))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactRecord>, AppError> {
    Ok(Json(state.contacts.get(&id).await?))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(contact): Json<ContactRecord>,
) -> Result<Json<ContactRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, CONTACTS_PATH)?;
    Ok(Json(state.contacts.update(&id, &contact).await?))
}

// ============================================================================
// About
// ============================================================================

pub async fn company_about(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<AboutRecord>, AppError> {
    Ok(Json(state.about.for_company(company_id).await?))
}

pub async fn storefront_about(
    State(state): State<AppState>,
) -> Result<Json<AboutRecord>, AppError> {
    Ok(Json(state.about.for_company(state.company_code).await?))
}

pub async fn update_about(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    Json(about): Json<AboutRecord>,
) -> Result<Json<AboutRecord>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, ABOUT_PATH)?;
    Ok(Json(state.about.update(&id, &about).await?))
}

// ============================================================================
// Cache administration
// ============================================================================

pub async fn refresh_cache(
    State(state): State<AppState>,
    Path(scope): Path<String>,
    jar: CookieJar,
) -> Result<Json<AuthAck>, AppError> {
    let user = authenticated_user(&state, &jar)?;
    require_permission(&user, CACHE_PATH)?;

    match scope.as_str() {
        "items" => state.items.refresh(),
        "carousel" => state.carousels.refresh(),
        "menus" => state.menus.refresh(),
        "users" => state.users.refresh(),
        "contacts" => state.contacts.refresh(),
        "all" => state.cache.invalidate_all(),
        _ => return Err(AppError::NotFound),
    }
    Ok(Json(AuthAck { success: true }))
}
