use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::openai::OpenAiError;
use crate::supabase::SupabaseError;
use crate::types::{AuthUser, InventoryRecord, ProductInfo, RecordId, SalesRecord, Session, StoreInfo};

/// Identity provider: credential storage and session issuance
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// `Ok(None)` when the provider accepted the call but created no user
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, SupabaseError>;

    /// `Ok(None)` when the provider answered without a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Session>, SupabaseError>;
}

/// Read access to the retail tables plus the raw SQL procedure
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn inventory_since(&self, since: NaiveDate) -> Result<Vec<InventoryRecord>, SupabaseError>;

    async fn sales_since(&self, since: NaiveDate) -> Result<Vec<SalesRecord>, SupabaseError>;

    async fn stores(&self, ids: &[RecordId]) -> Result<Vec<StoreInfo>, SupabaseError>;

    async fn products(&self, ids: &[RecordId]) -> Result<Vec<ProductInfo>, SupabaseError>;

    /// Invoke `function(sql)` and return whatever JSON it produced
    async fn run_sql(&self, function: &str, sql: &str) -> Result<Value, SupabaseError>;
}

/// Single-prompt text completion
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OpenAiError>;
}
