// data summary - the numbers the chat assistant leads with

use crate::Error;
use serde::Serialize;
use tracing::error;

use super::store::Store;

/// User-facing projection of the statements table. Recomputed on every
/// request, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_transactions: i64,
    pub total_credits: f64,
    pub total_debits: f64,
    pub earliest_date: Option<String>,
    pub latest_date: Option<String>,
}

/// Build a [`Summary`] from the store.
///
/// Two store calls: the aggregate counters, then a single statement in the
/// store's default order. That one record's date fills both `earliest_date`
/// and `latest_date`, matching the behavior callers already depend on
/// rather than a true min/max (see DESIGN.md).
///
/// Store failures are logged here and returned unchanged. No retry.
pub async fn data_summary(store: &Store) -> Result<Summary, Error> {
    let stats = store.statistics().await.inspect_err(|e| {
        error!("statement statistics fetch failed: {e}");
    })?;

    let sample = store.statements(1).await.inspect_err(|e| {
        error!("statement sample fetch failed: {e}");
    })?;

    let date = sample.first().map(|s| s.date.clone());

    Ok(Summary {
        total_transactions: stats.statements_count,
        total_credits: stats.total_credits,
        total_debits: stats.total_debits,
        earliest_date: date.clone(),
        latest_date: date,
    })
}
