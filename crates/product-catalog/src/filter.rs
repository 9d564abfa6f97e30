//! Product filtering by optional criteria

use crate::product::Product;
use serde::Deserialize;

/// Conjunction of optional criteria. An unset criterion matches everything.
///
/// Deserializes straight from a query string
/// (`?manufacturer=acme&minPrice=15&isInStock=true`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub manufacturer: Option<String>,
    pub ean: Option<String>,
    pub article_number: Option<String>,
    pub is_in_stock: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `product` satisfies every criterion that is set.
    ///
    /// A product without a price fails any price bound, and one without a
    /// stock flag fails `is_in_stock`. A `NaN` bound matches nothing.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(manufacturer) = &self.manufacturer {
            if product.manufacturer() != manufacturer.to_lowercase() {
                return false;
            }
        }
        if let Some(ean) = &self.ean {
            if product.ean() != ean.to_lowercase() {
                return false;
            }
        }
        if let Some(article_number) = &self.article_number {
            if product.article_number() != article_number.to_lowercase() {
                return false;
            }
        }
        if let Some(in_stock) = self.is_in_stock {
            if product.is_in_stock() != Some(in_stock) {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = product.price() else {
                return false;
            };
            if self.min_price.is_some_and(|min| min.is_nan() || price < min) {
                return false;
            }
            if self.max_price.is_some_and(|max| max.is_nan() || price > max) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !product.in_category(category) {
                return false;
            }
        }
        true
    }

    /// The matching products, in input order
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
