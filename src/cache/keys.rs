//! Cache key conventions.
//!
//! The store is agnostic to key structure; call sites build keys through these
//! helpers so the naming convention (`<entity>_all`, `<entity>_item_<id>`,
//! `<entity>_company_<companyID>`, and the shorter `item_<id>`/`menu_<id>`/
//! `user_<id>` spellings) stays in one place, together with the prefix
//! patterns used for bulk invalidation.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

pub const PRODUCT_ALL: &str = "product_all";
pub const ITEM_ALL: &str = "item_all";
pub const CAROUSEL_ALL: &str = "carousel_all";
pub const MENUS_ALL: &str = "menus_all";
pub const USERS_ALL: &str = "users_all";
pub const CONTACT_ALL: &str = "contact_all";

pub fn product_item(id: impl Display) -> String {
    format!("product_item_{id}")
}

pub fn product_company(company_id: impl Display) -> String {
    format!("product_company_{company_id}")
}

pub fn item(id: impl Display) -> String {
    format!("item_{id}")
}

pub fn item_company(company_id: impl Display) -> String {
    format!("item_company_{company_id}")
}

pub fn carousel_item(id: impl Display) -> String {
    format!("carousel_item_{id}")
}

pub fn carousel_company(company_id: impl Display) -> String {
    format!("carousel_company_{company_id}")
}

pub fn menu(id: impl Display) -> String {
    format!("menu_{id}")
}

pub fn menu_tree_user(user_id: impl Display) -> String {
    format!("menu_tree_user_{user_id}")
}

pub fn user(id: impl Display) -> String {
    format!("user_{id}")
}

pub fn contact_item(id: impl Display) -> String {
    format!("contact_item_{id}")
}

pub fn contact_company(company_id: impl Display) -> String {
    format!("contact_company_{company_id}")
}

pub fn about_company(company_id: impl Display) -> String {
    format!("about_company_{company_id}")
}

macro_rules! prefix_pattern {
    ($name:ident, $pattern:literal) => {
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("static cache key pattern"));
    };
}

prefix_pattern!(PRODUCT_COMPANY_PREFIX, "^product_company_");
prefix_pattern!(ITEM_PREFIX, "^item_");
prefix_pattern!(ITEM_COMPANY_PREFIX, "^item_company_");
prefix_pattern!(CAROUSEL_PREFIX, "^carousel_");
prefix_pattern!(CAROUSEL_COMPANY_PREFIX, "^carousel_company_");
prefix_pattern!(MENU_PREFIX, "^menu_");
prefix_pattern!(MENU_TREE_PREFIX, "^menu_tree_");
prefix_pattern!(MENU_TREE_USER_PREFIX, "^menu_tree_user_");
prefix_pattern!(USER_PREFIX, "^user_");
prefix_pattern!(CONTACT_PREFIX, "^contact_");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_naming_convention() {
        assert_eq!(product_item(12), "product_item_12");
        assert_eq!(product_company(3), "product_company_3");
        assert_eq!(item("9f"), "item_9f");
        assert_eq!(carousel_item("c-2"), "carousel_item_c-2");
        assert_eq!(menu_tree_user(42), "menu_tree_user_42");
        assert_eq!(contact_company(7), "contact_company_7");
        assert_eq!(about_company(1), "about_company_1");
    }

    #[test]
    fn company_prefix_does_not_match_list_key() {
        assert!(CAROUSEL_COMPANY_PREFIX.is_match(&carousel_company(4)));
        assert!(!CAROUSEL_COMPANY_PREFIX.is_match(CAROUSEL_ALL));
        assert!(!CAROUSEL_COMPANY_PREFIX.is_match(&carousel_item(4)));
    }

    #[test]
    fn menus_list_key_escapes_menu_prefix() {
        // `menus_all` is cleared exactly, never by the `menu_` pattern.
        assert!(!MENU_PREFIX.is_match(MENUS_ALL));
        assert!(MENU_PREFIX.is_match(&menu(3)));
    }

    #[test]
    fn entity_prefix_matches_every_variant() {
        assert!(ITEM_PREFIX.is_match(ITEM_ALL));
        assert!(ITEM_PREFIX.is_match(&item(5)));
        assert!(ITEM_PREFIX.is_match(&item_company(5)));
        assert!(!ITEM_PREFIX.is_match(PRODUCT_ALL));
    }

    #[test]
    fn menu_tree_prefixes_nest() {
        let key = menu_tree_user(8);
        assert!(MENU_PREFIX.is_match(&key));
        assert!(MENU_TREE_PREFIX.is_match(&key));
        assert!(MENU_TREE_USER_PREFIX.is_match(&key));
        assert!(!MENU_TREE_USER_PREFIX.is_match(MENUS_ALL));
    }
}
