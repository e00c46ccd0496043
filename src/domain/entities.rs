//! Catalog domain records.
//!
//! Field names follow the upstream catalog API contract (camelCase JSON with
//! the legacy `companyID` spelling), so every record round-trips the wire
//! format unchanged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    pub product_category: String,
    pub product_name: String,
    pub brand: String,
    pub model: String,
    pub origin: String,
    pub description: String,
    pub aditional_information: String,
    pub special_feature: String,
    pub catalog_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    pub id: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    pub item_name: String,
    pub item_category: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselRecord {
    pub id: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub phone_number1: Option<String>,
    pub phone_number2: Option<String>,
    pub phone_number3: Option<String>,
    pub email: Option<String>,
    pub facebook_link: Option<String>,
    pub others_link1: Option<String>,
    pub others_link2: Option<String>,
}

/// About-us content. The upstream contract carries up to five numbered
/// title/description pairs; only the first is mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutRecord {
    pub id: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    pub heading: String,
    pub title: String,
    pub description: String,
    pub title2: Option<String>,
    pub description2: Option<String>,
    pub title3: Option<String>,
    pub description3: Option<String>,
    pub title4: Option<String>,
    pub description4: Option<String>,
    pub title5: Option<String>,
    pub description5: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub menu_name: String,
    pub path: String,
    pub sort_order: i32,
}

/// A menu subtree as returned by the upstream tree endpoint and embedded in
/// login grants. Presence of a node is what grants access to its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuTreeNode {
    pub id: i64,
    pub menu_name: String,
    pub path: String,
    #[serde(default)]
    pub children: Vec<MenuTreeNode>,
}

impl MenuTreeNode {
    /// Depth-first search for a node with the given path.
    pub fn grants(&self, path: &str) -> bool {
        self.path == path || self.children.iter().any(|child| child.grants(path))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    #[serde(rename = "companyID")]
    pub company_id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
}

/// Credentials relayed to the upstream authentication endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A successful upstream login: the signed token plus the profile data the
/// storefront session is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expiration: OffsetDateTime,
    pub username: String,
    #[serde(rename = "companyID")]
    pub company_id: Option<i64>,
    pub user_menu: Vec<MenuTreeNode>,
}

/// Search filter posted to upstream `/Search` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(rename = "companyID", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

impl SearchQuery {
    pub fn for_company(company_id: i64) -> Self {
        Self {
            company_id: Some(company_id),
            term: None,
        }
    }
}
