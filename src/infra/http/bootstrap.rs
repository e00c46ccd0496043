//! Server-render bootstrap endpoint.
//!
//! Performs the storefront's first-paint reads through the object cache, then
//! snapshots the touched keys into a transfer payload the hydrating client
//! consumes instead of refetching.

use axum::{Json, extract::State};

use crate::application::error::AppError;
use crate::cache::{TransferPayload, keys};
use crate::domain::entities::SearchQuery;

use super::AppState;

pub async fn bootstrap(State(state): State<AppState>) -> Result<Json<TransferPayload>, AppError> {
    let company = state.company_code;

    tokio::try_join!(
        state.products.company_products(company),
        state.carousels.list(SearchQuery::for_company(company)),
        state.contacts.company_contact(company),
        state.about.for_company(company),
    )?;

    let payload = TransferPayload::record(
        &state.cache,
        &[
            keys::product_company(company),
            keys::CAROUSEL_ALL.to_string(),
            keys::contact_company(company),
            keys::about_company(company),
        ],
    );
    Ok(Json(payload))
}
