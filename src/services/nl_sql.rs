use thiserror::Error;
use tracing::info;

use super::traits::LanguageModel;
use crate::openai::OpenAiError;

/// Tables the language model is allowed to assume
pub const SCHEMA_DESCRIPTION: &str = "\
products(sku_id, sku_name, category)
household_visits(id, household_id, store_id, sku_id, visit_date)
store_inventory(id, store_id, sku_id, inventory_date, on_shelf_availability)
stores(store_id, store_name, region)
sales(id, store_id, sku_id, sales_date, units_sold)";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("language model error: {0}")]
    LanguageModel(#[from] OpenAiError),

    #[error("language model returned no SQL")]
    EmptySql,
}

pub fn build_prompt(user_query: &str) -> String {
    format!(
        "You are an expert SQL assistant. Convert the following English query into a SQL query for a PostgreSQL database.\n\
         Assume the following tables and their columns exist:\n\
         \n\
         {SCHEMA_DESCRIPTION}\n\
         \n\
         User Query: \"{user_query}\"\n\
         \n\
         Give ONLY the SQL query. Do not explain or return any text other than the SQL.\n"
    )
}

/// Recover a bare statement from a model reply.
///
/// Trims whitespace, removes a surrounding Markdown code fence (with or
/// without a language tag) and drops trailing semicolons.
pub fn clean_sql_reply(reply: &str) -> String {
    let mut sql = reply.trim();

    if let Some(rest) = sql.strip_prefix("```") {
        sql = match rest.split_once('\n') {
            Some((first, body)) if is_fence_tag(first.trim()) => body,
            Some(_) => rest,
            // single-line fence: ```sql SELECT 1```
            None => match rest.split_once(char::is_whitespace) {
                Some((first, body)) if is_fence_tag(first) => body,
                _ => rest,
            },
        };
    }
    if let Some(rest) = sql.trim_end().strip_suffix("```") {
        sql = rest;
    }

    sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace()).to_string()
}

/// A fence info string is one bare word such as `sql` or `postgresql`.
/// A leading SQL keyword is the statement itself, not a tag.
fn is_fence_tag(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'))
        && !["select", "with"].iter().any(|k| word.eq_ignore_ascii_case(k))
}

pub struct SqlTranslator<'a> {
    llm: &'a dyn LanguageModel,
}

impl<'a> SqlTranslator<'a> {
    pub fn new(llm: &'a dyn LanguageModel) -> Self {
        Self { llm }
    }

    pub async fn translate(&self, user_query: &str) -> Result<String, TranslateError> {
        let reply = self.llm.complete(&build_prompt(user_query)).await?;
        let sql = clean_sql_reply(&reply);
        if sql.is_empty() {
            return Err(TranslateError::EmptySql);
        }
        info!(%sql, "translated natural-language query");
        Ok(sql)
    }
}
