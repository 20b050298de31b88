//! Store availability and SKU sales insights.
//!
//! Fetches the trailing window of inventory and sales rows, ranks stores by
//! mean on-shelf availability (highest first) and SKUs by units sold (lowest
//! first), attaches display names, and asks the language model for a plain
//! English summary. Ties are broken by ascending id so the ranking does not
//! depend on upstream row order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::traits::{DataStore, LanguageModel};
use crate::config::InsightsConfig;
use crate::openai::OpenAiError;
use crate::supabase::SupabaseError;
use crate::types::{InventoryRecord, ProductInfo, RecordId, SalesRecord, StoreInfo};

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("data store error: {0}")]
    DataStore(#[from] SupabaseError),

    #[error("language model error: {0}")]
    LanguageModel(#[from] OpenAiError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStore {
    pub store_id: RecordId,
    pub store_name: String,
    pub on_shelf_availability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSku {
    pub sku_id: RecordId,
    pub sku_name: String,
    pub units_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightSummary {
    pub summary: String,
    pub stores: Vec<RankedStore>,
    pub skus: Vec<RankedSku>,
}

/// First day included in the window ending `today`.
///
/// Saturates at the earliest representable date.
pub fn window_start(today: NaiveDate, window_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// Mean availability per store, the `n` highest first.
///
/// Null availability readings are ignored; a store with only nulls is not
/// ranked.
pub fn top_stores_by_availability(records: &[InventoryRecord], n: usize) -> Vec<(RecordId, f64)> {
    let mut groups: BTreeMap<&RecordId, (f64, u32)> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.on_shelf_availability {
            let entry = groups.entry(&record.store_id).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let mut means: Vec<(RecordId, f64)> = groups
        .into_iter()
        .map(|(id, (sum, count))| (id.clone(), sum / f64::from(count)))
        .filter(|(_, mean)| !mean.is_nan())
        .collect();

    means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    means.truncate(n);
    means
}

/// Units sold per SKU, the `n` lowest first.
///
/// Only SKUs with at least one sales row in the window are ranked; null unit
/// counts add nothing.
pub fn bottom_skus_by_units(records: &[SalesRecord], n: usize) -> Vec<(RecordId, i64)> {
    let mut groups: BTreeMap<&RecordId, i64> = BTreeMap::new();
    for record in records {
        *groups.entry(&record.sku_id).or_insert(0) += record.units_sold.unwrap_or(0);
    }

    let mut totals: Vec<(RecordId, i64)> = groups.into_iter().map(|(id, total)| (id.clone(), total)).collect();
    totals.sort_by(|a, b| match a.1.cmp(&b.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    totals.truncate(n);
    totals
}

/// Attach store names, keeping rank order. Ids without a store row are dropped.
pub fn join_store_names(ranked: Vec<(RecordId, f64)>, stores: &[StoreInfo]) -> Vec<RankedStore> {
    let names: HashMap<&RecordId, &str> = stores.iter().map(|s| (&s.store_id, s.store_name.as_str())).collect();

    ranked
        .into_iter()
        .filter_map(|(store_id, mean)| match names.get(&store_id) {
            Some(name) => Some(RankedStore {
                store_name: name.to_string(),
                store_id,
                on_shelf_availability: mean,
            }),
            None => {
                warn!(%store_id, "ranked store has no row in stores; dropping");
                None
            }
        })
        .collect()
}

/// Attach SKU names, keeping rank order. Ids without a product row are dropped.
pub fn join_sku_names(ranked: Vec<(RecordId, i64)>, products: &[ProductInfo]) -> Vec<RankedSku> {
    let names: HashMap<&RecordId, &str> = products.iter().map(|p| (&p.sku_id, p.sku_name.as_str())).collect();

    ranked
        .into_iter()
        .filter_map(|(sku_id, units)| match names.get(&sku_id) {
            Some(name) => Some(RankedSku {
                sku_name: name.to_string(),
                sku_id,
                units_sold: units,
            }),
            None => {
                warn!(%sku_id, "ranked SKU has no row in products; dropping");
                None
            }
        })
        .collect()
}

pub fn render_store_lines(stores: &[RankedStore]) -> String {
    stores
        .iter()
        .map(|s| format!("{} ({:.2})", s.store_name, s.on_shelf_availability))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_sku_lines(skus: &[RankedSku]) -> String {
    skus.iter()
        .map(|s| format!("{} ({} sold)", s.sku_name, s.units_sold))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_summary_prompt(store_lines: &str, sku_lines: &str) -> String {
    format!(
        "Summarize this insight in plain English:\n\
         The five stores with the highest average on-shelf availability in the last two weeks are:\n\
         {store_lines}\n\n\
         The SKUs that sold the least in the last two weeks are:\n\
         {sku_lines}\n"
    )
}

pub struct InsightAggregator<'a> {
    store: &'a dyn DataStore,
    llm: &'a dyn LanguageModel,
    config: &'a InsightsConfig,
}

impl<'a> InsightAggregator<'a> {
    pub fn new(store: &'a dyn DataStore, llm: &'a dyn LanguageModel, config: &'a InsightsConfig) -> Self {
        Self { store, llm, config }
    }

    /// Build the insight summary for the window ending `today`
    pub async fn compute(&self, today: NaiveDate) -> Result<InsightSummary, InsightError> {
        let since = window_start(today, self.config.window_days);

        let inventory = self.store.inventory_since(since).await?;
        let top = top_stores_by_availability(&inventory, self.config.top_n);
        let store_ids: Vec<RecordId> = top.iter().map(|(id, _)| id.clone()).collect();
        let store_rows = if store_ids.is_empty() {
            Vec::new()
        } else {
            self.store.stores(&store_ids).await?
        };
        let stores = join_store_names(top, &store_rows);

        let sales = self.store.sales_since(since).await?;
        let bottom = bottom_skus_by_units(&sales, self.config.top_n);
        let sku_ids: Vec<RecordId> = bottom.iter().map(|(id, _)| id.clone()).collect();
        let product_rows = if sku_ids.is_empty() {
            Vec::new()
        } else {
            self.store.products(&sku_ids).await?
        };
        let skus = join_sku_names(bottom, &product_rows);

        info!(
            %since,
            inventory_rows = inventory.len(),
            sales_rows = sales.len(),
            stores = stores.len(),
            skus = skus.len(),
            "insight aggregation finished"
        );

        let prompt = build_summary_prompt(&render_store_lines(&stores), &render_sku_lines(&skus));
        let summary = self.llm.complete(&prompt).await?;

        Ok(InsightSummary { summary, stores, skus })
    }
}
