pub mod auth;
pub mod insights;
pub mod nl_sql;
pub mod query;
pub mod sql_guard;
pub mod traits;

pub use auth::{AuthError, AuthGateway, LoginSession};
pub use insights::{InsightAggregator, InsightError, InsightSummary, RankedSku, RankedStore};
pub use nl_sql::{SqlTranslator, TranslateError};
pub use query::{ExecutionError, QueryExecutor};
pub use sql_guard::{ensure_read_only, GuardError};
pub use traits::{AuthProvider, DataStore, LanguageModel};
