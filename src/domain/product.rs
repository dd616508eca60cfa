use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cake,
    Candle,
    Mug,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cake => "cake",
            Category::Candle => "candle",
            Category::Mug => "mug",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cake" | "cakes" => Ok(Category::Cake),
            "candle" | "candles" => Ok(Category::Candle),
            "mug" | "mugs" => Ok(Category::Mug),
            "other" | "" => Ok(Category::Other),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

/// Boolean safety flags shown on mug and candle listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SafetyFlags {
    pub microwave_safe: bool,
    pub dishwasher_safe: bool,
    pub food_safe: bool,
}

/// A catalog item. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub safety: SafetyFlags,
    pub created_at: DateTime<Utc>,
}

/// Validated payload for creating a product.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: u32,
    pub category: Category,
    pub tags: Vec<String>,
    pub materials: Vec<String>,
    pub features: Vec<String>,
    pub image_url: Option<String>,
    pub safety: SafetyFlags,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<u32>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

/// Admin form input before validation. Price and stock arrive as text.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
    pub tags: Vec<String>,
    pub materials: Vec<String>,
    pub features: Vec<String>,
    pub safety: SafetyFlags,
}

impl ProductForm {
    /// Checks required fields and parses numbers.
    pub fn validate(self) -> Result<ProductCreate, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Product name is required".to_string());
        }
        let price: i64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| format!("Price must be a whole number, got {:?}", self.price))?;
        if price < 0 {
            return Err(format!("Price cannot be negative, got {}", price));
        }
        let stock: u32 = match self.stock.trim() {
            "" => 0,
            raw => raw
                .parse()
                .map_err(|_| format!("Stock must be a non-negative whole number, got {:?}", raw))?,
        };
        let category: Category = self.category.parse()?;

        Ok(ProductCreate {
            name,
            description: self.description.trim().to_string(),
            price,
            stock,
            category,
            tags: clean_list(self.tags),
            materials: clean_list(self.materials),
            features: clean_list(self.features),
            image_url: None,
            safety: self.safety,
        })
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
