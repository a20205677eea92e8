use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::geo::Position;

/// Service category a vendor advertises.
///
/// The first six are the tags customers filter by; the rest are the labels
/// the vendor dashboard offers. Both sets share one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Tailoring,
    Repairs,
    Services,
    Electronics,
    Clothing,
    Plumber,
    Electrician,
    Carpenter,
    Delivery,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Food,
        Category::Tailoring,
        Category::Repairs,
        Category::Services,
        Category::Electronics,
        Category::Clothing,
        Category::Plumber,
        Category::Electrician,
        Category::Carpenter,
        Category::Delivery,
        Category::Other,
    ];

    /// Canonical lowercase tag, as stored in vendor documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Tailoring => "tailoring",
            Category::Repairs => "repairs",
            Category::Services => "services",
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Plumber => "plumber",
            Category::Electrician => "electrician",
            Category::Carpenter => "carpenter",
            Category::Delivery => "delivery",
            Category::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Tailoring => "Tailoring",
            Category::Repairs => "Repairs",
            Category::Services => "Services",
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Plumber => "Plumber",
            Category::Electrician => "Electrician",
            Category::Carpenter => "Carpenter",
            Category::Delivery => "Delivery",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let tag = raw.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// The category selector of a discovery query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// `All` matches every vendor, including those without a category.
    #[must_use]
    pub fn matches(self, category: Option<Category>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => f.write_str(category.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Canonical vendor entity produced by [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    /// Document id owned by the external store.
    pub id: String,
    /// Display name; empty when the document carries none.
    pub name: String,
    pub category: Option<Category>,
    pub service_description: Option<String>,
    /// `None` keeps the vendor out of every spatial result.
    pub location: Option<Position>,
    pub online: bool,
    /// Epoch milliseconds; 0 when unknown, which sorts last.
    pub last_online_at: i64,
}
