/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a store or SKU row.
///
/// The backing tables are not consistent about id types, so the id keeps
/// whatever JSON form PostgREST returned. Integers order before strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Render the id as a PostgREST `in.(...)` list element
    pub fn to_filter_value(&self) -> String {
        match self {
            RecordId::Int(n) => n.to_string(),
            RecordId::Text(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// User object as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued by the identity provider; passed back to the caller verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Row of `store_inventory` restricted to the columns the insights need
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryRecord {
    pub store_id: RecordId,
    pub on_shelf_availability: Option<f64>,
}

/// Row of `sales` restricted to the columns the insights need
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalesRecord {
    pub sku_id: RecordId,
    pub units_sold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoreInfo {
    pub store_id: RecordId,
    pub store_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductInfo {
    pub sku_id: RecordId,
    pub sku_name: String,
}
