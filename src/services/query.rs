use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::traits::DataStore;
use crate::supabase::SupabaseError;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The procedure answered with `null`
    #[error("No data returned")]
    NoData,

    /// The database refused the statement
    #[error("query failed: {0}")]
    Rejected(String),

    #[error("data store error: {0}")]
    Upstream(SupabaseError),
}

impl From<SupabaseError> for ExecutionError {
    fn from(err: SupabaseError) -> Self {
        if err.is_rejection() {
            ExecutionError::Rejected(err.to_string())
        } else {
            ExecutionError::Upstream(err)
        }
    }
}

/// Runs translated SQL through the raw-SQL procedure.
pub struct QueryExecutor<'a> {
    store: &'a dyn DataStore,
    function: &'a str,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a dyn DataStore, function: &'a str) -> Self {
        Self { store, function }
    }

    /// Execute `sql` and return its rows.
    ///
    /// An empty array is a valid zero-row result. A non-array value is
    /// returned as a single row.
    pub async fn execute(&self, sql: &str) -> Result<Vec<Value>, ExecutionError> {
        let rows = match self.store.run_sql(self.function, sql).await? {
            Value::Null => return Err(ExecutionError::NoData),
            Value::Array(rows) => rows,
            other => vec![other],
        };
        info!(rows = rows.len(), function = self.function, "raw SQL executed");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InventoryRecord, ProductInfo, RecordId, SalesRecord, StoreInfo};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;

    struct RpcOnly(fn() -> Result<Value, SupabaseError>);

    #[async_trait]
    impl DataStore for RpcOnly {
        async fn inventory_since(&self, _: NaiveDate) -> Result<Vec<InventoryRecord>, SupabaseError> {
            Ok(Vec::new())
        }
        async fn sales_since(&self, _: NaiveDate) -> Result<Vec<SalesRecord>, SupabaseError> {
            Ok(Vec::new())
        }
        async fn stores(&self, _: &[RecordId]) -> Result<Vec<StoreInfo>, SupabaseError> {
            Ok(Vec::new())
        }
        async fn products(&self, _: &[RecordId]) -> Result<Vec<ProductInfo>, SupabaseError> {
            Ok(Vec::new())
        }
        async fn run_sql(&self, _function: &str, _sql: &str) -> Result<Value, SupabaseError> {
            (self.0)()
        }
    }

    #[tokio::test]
    async fn rows_are_returned_verbatim() {
        let store = RpcOnly(|| Ok(json!([{"store_name": "Harbor"}, {"store_name": "Downtown"}])));
        let rows = QueryExecutor::new(&store, "run_raw_sql").execute("SELECT 1").await.unwrap();
        assert_eq!(rows, vec![json!({"store_name": "Harbor"}), json!({"store_name": "Downtown"})]);
    }

    #[tokio::test]
    async fn empty_array_is_zero_rows() {
        let store = RpcOnly(|| Ok(json!([])));
        let rows = QueryExecutor::new(&store, "run_raw_sql").execute("SELECT 1").await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn null_is_no_data() {
        let store = RpcOnly(|| Ok(Value::Null));
        let err = QueryExecutor::new(&store, "run_raw_sql").execute("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ExecutionError::NoData));
        assert_eq!(err.to_string(), "No data returned");
    }

    #[tokio::test]
    async fn client_errors_are_rejections() {
        let store = RpcOnly(|| {
            Err(SupabaseError::Api {
                status: 400,
                message: "column \"nope\" does not exist".to_string(),
            })
        });
        let err = QueryExecutor::new(&store, "run_raw_sql").execute("SELECT nope").await.unwrap_err();
        assert!(matches!(err, ExecutionError::Rejected(ref m) if m.contains("nope")));
    }

    #[tokio::test]
    async fn server_errors_stay_upstream() {
        let store = RpcOnly(|| {
            Err(SupabaseError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        });
        let err = QueryExecutor::new(&store, "run_raw_sql").execute("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ExecutionError::Upstream(_)));
    }
}
