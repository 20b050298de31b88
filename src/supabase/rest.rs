//! PostgREST table reads and RPC calls.

use std::fmt::Display;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{SupabaseClient, SupabaseError};
use crate::services::traits::DataStore;
use crate::types::{InventoryRecord, ProductInfo, RecordId, SalesRecord, StoreInfo};

/// A `GET /rest/v1/<table>` request with column selection and filters.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.join(","),
            filters: Vec::new(),
        }
    }

    /// `column >= value`
    pub fn gte(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("gte.{}", value)));
        self
    }

    /// `column IN (ids...)`
    pub fn in_ids(mut self, column: &str, ids: &[RecordId]) -> Self {
        let list = ids
            .iter()
            .map(RecordId::to_filter_value)
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push((column.to_string(), format!("in.({})", list)));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn query_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        std::iter::once(("select", self.columns.as_str()))
            .chain(self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl SupabaseClient {
    /// Run a select and deserialize every returned row.
    #[instrument(skip(self, query), fields(table = %query.table()))]
    pub async fn select<T: DeserializeOwned>(&self, query: &SelectQuery) -> Result<Vec<T>, SupabaseError> {
        let mut url = self.endpoint(&format!("rest/v1/{}", query.table))?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());

        let response = self.http().get(url).send().await?;
        let body = Self::read_body(response).await?;

        let rows: Vec<T> = serde_json::from_str(&body)
            .map_err(|e| SupabaseError::Parse(format!("{}: {}", query.table, e)))?;
        info!(rows = rows.len(), "select completed");
        Ok(rows)
    }

    /// Call a Postgres function exposed through `/rest/v1/rpc/<function>`.
    #[instrument(skip(self, args))]
    pub async fn rpc(&self, function: &str, args: &Value) -> Result<Value, SupabaseError> {
        let mut url = self.endpoint("rest/v1/rpc/")?;
        let raw = url.to_string();
        url.path_segments_mut()
            .map_err(|_| SupabaseError::Url(raw))?
            .pop_if_empty()
            .push(function);

        let response = self.http().post(url).json(args).send().await?;
        let body = Self::read_body(response).await?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(format!("rpc {}: {}", function, e)))
    }
}

#[async_trait]
impl DataStore for SupabaseClient {
    async fn inventory_since(&self, since: NaiveDate) -> Result<Vec<InventoryRecord>, SupabaseError> {
        let query = SelectQuery::new("store_inventory", &["store_id", "on_shelf_availability"])
            .gte("inventory_date", since.format("%Y-%m-%d"));
        self.select(&query).await
    }

    async fn sales_since(&self, since: NaiveDate) -> Result<Vec<SalesRecord>, SupabaseError> {
        let query = SelectQuery::new("sales", &["sku_id", "units_sold"]).gte("date", since.format("%Y-%m-%d"));
        self.select(&query).await
    }

    async fn stores(&self, ids: &[RecordId]) -> Result<Vec<StoreInfo>, SupabaseError> {
        let query = SelectQuery::new("stores", &["store_id", "store_name"]).in_ids("store_id", ids);
        self.select(&query).await
    }

    async fn products(&self, ids: &[RecordId]) -> Result<Vec<ProductInfo>, SupabaseError> {
        let query = SelectQuery::new("products", &["sku_id", "sku_name"]).in_ids("sku_id", ids);
        self.select(&query).await
    }

    async fn run_sql(&self, function: &str, sql: &str) -> Result<Value, SupabaseError> {
        self.rpc(function, &json!({ "sql": sql })).await
    }
}
