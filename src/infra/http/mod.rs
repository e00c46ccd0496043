pub mod auth;
pub mod bootstrap;
pub mod catalog;
pub mod middleware;
pub mod session;

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::application::{
    about::AboutService, auth::AuthService, carousels::CarouselService, contacts::ContactService,
    items::ItemService, menus::MenuService, products::ProductService, users::UserService,
};
use crate::cache::ObjectCache;

use session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub items: ItemService,
    pub carousels: CarouselService,
    pub menus: MenuService,
    pub users: UserService,
    pub contacts: ContactService,
    pub about: AboutService,
    pub auth: AuthService,
    pub sessions: Arc<SessionStore>,
    pub cache: Arc<ObjectCache>,
    pub company_code: i64,
    pub jwt_secret: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/api/login", post(auth::login))
        .route("/api/me", get(auth::me))
        .route("/api/logout", post(auth::logout))
        .route("/api/bootstrap", get(bootstrap::bootstrap))
        .route(
            "/api/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/api/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/api/items",
            get(catalog::list_items).post(catalog::create_item),
        )
        .route(
            "/api/items/{id}",
            get(catalog::get_item)
                .put(catalog::update_item)
                .delete(catalog::delete_item),
        )
        .route(
            "/api/carousel",
            get(catalog::list_carousel).post(catalog::create_carousel),
        )
        .route(
            "/api/carousel/{id}",
            get(catalog::get_carousel)
                .put(catalog::update_carousel)
                .delete(catalog::delete_carousel),
        )
        .route(
            "/api/menus",
            get(catalog::list_menus).post(catalog::create_menu),
        )
        .route("/api/menus/tree", get(catalog::menu_tree))
        .route(
            "/api/menus/{id}",
            get(catalog::get_menu)
                .put(catalog::update_menu)
                .delete(catalog::delete_menu),
        )
        .route(
            "/api/users",
            get(catalog::list_users).post(catalog::create_user),
        )
        .route(
            "/api/users/{id}",
            get(catalog::get_user)
                .put(catalog::update_user)
                .delete(catalog::delete_user),
        )
        .route("/api/contacts", get(catalog::list_contacts))
        .route("/api/contacts/company/{company_id}", get(catalog::company_contact))
        .route(
            "/api/contacts/{id}",
            get(catalog::get_contact).put(catalog::update_contact),
        )
        .route("/api/about", get(catalog::storefront_about))
        .route(
            "/api/about/{id}",
            get(catalog::company_about).put(catalog::update_about),
        )
        .route("/api/cache/refresh/{scope}", post(catalog::refresh_cache))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .with_state(state)
}
