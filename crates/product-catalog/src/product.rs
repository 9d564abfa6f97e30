//! Product records as exported by the scraper, plus the derived views served to clients

use serde::{Deserialize, Deserializer, Serialize};

const PROPERTY_MANUFACTURER: &str = "tillverkare";
const PROPERTY_ARTICLE_NUMBER: &str = "art. nr.";
const PROPERTY_EAN: &str = "ean";
const PROPERTY_ID: &str = "id";

const AVAILABILITY_IN_STOCK: &str = "InStock";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Some scrapers emit prices as JSON numbers; keep them as their text form
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

/// Plain decimal with an optional sign and either `.` or `,` as separator.
/// Exponents, `NaN` and infinities are rejected.
fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let digits = normalized.strip_prefix(['+', '-']).unwrap_or(&normalized);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    normalized.parse().ok().filter(|price: &f64| price.is_finite())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One scraped product, exactly as it appears on a line of the export.
///
/// Every field is optional; the derived accessors never fail on missing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<Offer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_property: Option<Vec<AdditionalProperty>>,
}

impl Product {
    fn first_offer(&self) -> Option<&Offer> {
        self.offers.as_deref().and_then(<[Offer]>::first)
    }

    fn breadcrumb_names(&self) -> impl Iterator<Item = &str> {
        self.breadcrumbs
            .iter()
            .flatten()
            .filter_map(|b| b.name.as_deref())
    }

    /// Whether the first offer is `InStock`; absent without an offer or availability
    pub fn is_in_stock(&self) -> Option<bool> {
        self.first_offer()
            .and_then(|offer| offer.availability.as_deref())
            .map(|availability| availability == AVAILABILITY_IN_STOCK)
    }

    /// Price of the first offer. Accepts both `12.50` and `12,50`.
    pub fn price(&self) -> Option<f64> {
        parse_decimal(self.first_offer()?.price.as_deref()?)
    }

    pub fn manufacturer(&self) -> String {
        self.property(PROPERTY_MANUFACTURER)
    }

    pub fn article_number(&self) -> String {
        self.property(PROPERTY_ARTICLE_NUMBER)
    }

    pub fn ean(&self) -> String {
        self.property(PROPERTY_EAN)
    }

    pub fn id(&self) -> String {
        self.property(PROPERTY_ID)
    }

    /// Breadcrumb names from broadest to most specific, joined by `/`
    pub fn category_path(&self) -> String {
        self.breadcrumb_names().collect::<Vec<_>>().join("/")
    }

    pub fn most_specific_category(&self) -> Option<&str> {
        self.breadcrumb_names().last()
    }

    /// Whether any breadcrumb is named `category`, ignoring case
    pub fn in_category(&self, category: &str) -> bool {
        let wanted = category.to_lowercase();
        self.breadcrumb_names().any(|name| name.to_lowercase() == wanted)
    }

    /// Lower-cased value of the first additional property named `name`
    /// (case-insensitive), or an empty string
    fn property(&self, name: &str) -> String {
        let wanted = name.to_lowercase();
        self.additional_property
            .iter()
            .flatten()
            .find(|prop| {
                prop.name
                    .as_deref()
                    .map(|n| n.to_lowercase() == wanted)
                    .unwrap_or(false)
            })
            .and_then(|prop| prop.value.as_deref())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }
}

/// Flattened product view for consumers that do not want the raw export shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSimplified {
    pub category_path: String,
    pub most_specific_category: String,
    pub brand: String,
    pub title: String,
    pub description: String,
    pub ean_number: String,
    pub article_number: String,
    pub price: Option<f64>,
    pub is_in_stock: Option<bool>,
    pub image: String,
}

impl From<&Product> for ProductSimplified {
    fn from(product: &Product) -> Self {
        Self {
            category_path: product.category_path(),
            most_specific_category: product
                .most_specific_category()
                .unwrap_or_default()
                .to_string(),
            brand: product.brand.clone().unwrap_or_default(),
            title: product.name.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            ean_number: product.ean(),
            article_number: product.article_number(),
            price: product.price(),
            is_in_stock: product.is_in_stock(),
            image: product.main_image.clone().unwrap_or_default(),
        }
    }
}
