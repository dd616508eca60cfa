//! Storefront browsing over an already-fetched product list.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::domain::{Category, Product};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    /// Store order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
    Newest,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    /// Every listed tag must be present.
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub in_stock_only: bool,
    pub sort: ProductSort,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.in_stock_only && !product.in_stock() {
            return false;
        }
        if !self.tags.iter().all(|tag| product.has_tag(tag)) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
                    || product.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
        }
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut found: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            ProductSort::Featured => {}
            ProductSort::PriceAsc => found.sort_by_key(|p| p.price),
            ProductSort::PriceDesc => found.sort_by_key(|p| Reverse(p.price)),
            ProductSort::Name => found.sort_by_key(|p| p.name.to_lowercase()),
            ProductSort::Newest => found.sort_by_key(|p| Reverse(p.created_at)),
        }
        found
    }
}
