#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use serde_json::Value;

use paraller_api::config::{AppConfig, Secrets};
use paraller_api::openai::OpenAiError;
use paraller_api::services::{AuthProvider, DataStore, LanguageModel};
use paraller_api::supabase::SupabaseError;
use paraller_api::types::{AuthUser, InventoryRecord, ProductInfo, RecordId, SalesRecord, Session, StoreInfo};
use paraller_api::AppState;

pub fn test_config(supabase_url: &str) -> AppConfig {
    AppConfig::development(Secrets {
        supabase_url: url::Url::parse(supabase_url).expect("valid url"),
        supabase_key: SecretString::from("anon-key".to_string()),
        openai_key: SecretString::from("sk-test".to_string()),
    })
}

/// Serve `router` on a free local port and return its base URL
pub async fn serve(router: axum::Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

/// Spawn the app with in-memory collaborators
pub async fn spawn_app(auth: Arc<FakeAuth>, store: Arc<FakeStore>, llm: Arc<FakeLlm>) -> Result<String> {
    let state = AppState::new(test_config("http://127.0.0.1:9"), auth, store, llm);
    serve(paraller_api::app(state)).await
}

pub async fn spawn_default_app() -> Result<String> {
    spawn_app(
        Arc::new(FakeAuth::default()),
        Arc::new(FakeStore::default()),
        Arc::new(FakeLlm::echo_sql()),
    )
    .await
}

/// Identity provider keeping accounts in memory
#[derive(Default)]
pub struct FakeAuth {
    users: Mutex<HashMap<String, String>>,
}

impl FakeAuth {
    pub fn with_user(email: &str, password: &str) -> Self {
        Self::with_users(&[(email, password)])
    }

    pub fn with_users(accounts: &[(&str, &str)]) -> Self {
        let auth = Self::default();
        {
            let mut users = auth.users.lock().expect("lock");
            for (email, password) in accounts {
                users.insert(email.to_string(), password.to_string());
            }
        }
        auth
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, SupabaseError> {
        let mut users = self.users.lock().expect("lock");
        if users.contains_key(email) {
            return Err(SupabaseError::Api {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        users.insert(email.to_string(), password.to_string());
        Ok(Some(AuthUser {
            id: format!("user-{}", users.len()),
            email: Some(email.to_string()),
        }))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<Session>, SupabaseError> {
        let users = self.users.lock().expect("lock");
        match users.get(email) {
            Some(stored) if stored == password => Ok(Some(Session {
                access_token: format!("token-for-{}", email),
                token_type: Some("bearer".to_string()),
                expires_in: Some(3600),
                refresh_token: Some("refresh".to_string()),
                user: AuthUser {
                    id: "user-1".to_string(),
                    email: Some(email.to_string()),
                },
            })),
            _ => Err(SupabaseError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }
}

/// Data store over fixed rows; records every `since` date and SQL string it sees
#[derive(Default)]
pub struct FakeStore {
    pub inventory: Vec<InventoryRecord>,
    pub sales: Vec<SalesRecord>,
    pub stores: Vec<StoreInfo>,
    pub products: Vec<ProductInfo>,
    pub sql_result: Option<Value>,
    pub since_seen: Mutex<Vec<NaiveDate>>,
    pub sql_seen: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_sql_result(result: Value) -> Self {
        Self {
            sql_result: Some(result),
            ..Self::default()
        }
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn inventory_since(&self, since: NaiveDate) -> Result<Vec<InventoryRecord>, SupabaseError> {
        self.since_seen.lock().expect("lock").push(since);
        Ok(self.inventory.clone())
    }

    async fn sales_since(&self, since: NaiveDate) -> Result<Vec<SalesRecord>, SupabaseError> {
        self.since_seen.lock().expect("lock").push(since);
        Ok(self.sales.clone())
    }

    async fn stores(&self, ids: &[RecordId]) -> Result<Vec<StoreInfo>, SupabaseError> {
        Ok(self.stores.iter().filter(|s| ids.contains(&s.store_id)).cloned().collect())
    }

    async fn products(&self, ids: &[RecordId]) -> Result<Vec<ProductInfo>, SupabaseError> {
        Ok(self.products.iter().filter(|p| ids.contains(&p.sku_id)).cloned().collect())
    }

    async fn run_sql(&self, _function: &str, sql: &str) -> Result<Value, SupabaseError> {
        self.sql_seen.lock().expect("lock").push(sql.to_string());
        match &self.sql_result {
            Some(result) => Ok(result.clone()),
            None => {
                // longer statements finish later so concurrent requests interleave
                tokio::time::sleep(Duration::from_millis(5 * sql.len() as u64 % 200)).await;
                Ok(serde_json::json!([{ "sql": sql }]))
            }
        }
    }
}

/// Language model with a canned reply function; records every prompt
pub struct FakeLlm {
    reply: fn(&str) -> String,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(reply: fn(&str) -> String) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers SQL prompts with a fenced statement selecting the user text
    pub fn echo_sql() -> Self {
        Self::new(|prompt| match user_query(prompt) {
            Some(text) => format!("```sql\nSELECT '{}' AS echo;\n```", text),
            None => "Summary unavailable".to_string(),
        })
    }
}

#[async_trait]
impl LanguageModel for FakeLlm {
    async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        Ok((self.reply)(prompt))
    }
}

/// Pull the quoted user text out of a translation prompt
pub fn user_query(prompt: &str) -> Option<&str> {
    prompt.split("User Query: \"").nth(1).and_then(|rest| rest.split('"').next())
}
