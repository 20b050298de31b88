//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::AppConfig;
use crate::openai::{OpenAiClient, OpenAiError};
use crate::services::{AuthProvider, DataStore, LanguageModel};
use crate::supabase::{SupabaseClient, SupabaseError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build Supabase client: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("failed to build OpenAI client: {0}")]
    OpenAi(#[from] OpenAiError),
}

/// Immutable per-process state: configuration plus collaborator handles.
///
/// Built once at startup; handlers receive it through axum `State`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DataStore>,
    llm: Arc<dyn LanguageModel>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DataStore>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                store,
                llm,
            }),
        }
    }

    /// Wire up the real Supabase and OpenAI clients.
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let timeout = config.server.upstream_timeout;
        let supabase = Arc::new(SupabaseClient::new(&config.supabase, timeout)?);
        let openai = Arc::new(OpenAiClient::new(&config.openai, timeout)?);

        Ok(Self::new(config, supabase.clone(), supabase, openai))
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.inner.auth.as_ref()
    }

    pub fn store(&self) -> &dyn DataStore {
        self.inner.store.as_ref()
    }

    pub fn llm(&self) -> &dyn LanguageModel {
        self.inner.llm.as_ref()
    }
}
