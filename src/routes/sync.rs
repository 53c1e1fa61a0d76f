//! Admin-facing endpoints: external trail sync, sync history and
//! description enrichment.

use crate::constants::{DEFAULT_ENRICHMENT_BATCH, DEFAULT_IMPORT_LIMIT, DEFAULT_IMPORT_REGION};
use crate::services::enrichment::{self, EnrichmentSummary};
use crate::services::sync_history::SyncEntry;
use crate::services::trekking;
use crate::{AppState, Result};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct SyncRequest {
    pub region: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SyncResponse {
    /// `success`, `warning` or `error`, mirroring the history entry.
    pub status: String,
    pub imported_count: usize,
    pub timestamp: String,
}

/// POST /trails/update-from-api: fetch trails from the external API and
/// import them. Every outcome, including upstream failure, lands in the
/// sync history before the response goes out.
pub async fn update_from_api(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    let region = request
        .region
        .unwrap_or_else(|| DEFAULT_IMPORT_REGION.to_string());
    let limit = request.limit.unwrap_or(DEFAULT_IMPORT_LIMIT);

    let records = match state.trekking.fetch_trails(&region, limit).await {
        Ok(records) => records,
        Err(e) => {
            state
                .sync_history
                .record("error", format!("Trail sync for '{region}' failed: {e}"))?;
            return Err(e);
        }
    };

    if records.is_empty() {
        let entry = state.sync_history.record(
            "warning",
            format!("Trekking API returned no records for region '{region}'"),
        )?;
        return Ok(Json(SyncResponse {
            status: entry.status,
            imported_count: 0,
            timestamp: entry.timestamp,
        }));
    }

    let summary = trekking::import_trails(&state.pool, records).await?;
    let entry = state.sync_history.record(
        "success",
        format!(
            "Imported {} trails for region '{}' ({} skipped)",
            summary.imported, region, summary.skipped
        ),
    )?;

    Ok(Json(SyncResponse {
        status: entry.status,
        imported_count: summary.imported,
        timestamp: entry.timestamp,
    }))
}

/// GET /trails/external-sources: the upstream sources this deployment can
/// draw trail data from.
pub async fn external_sources() -> Json<Value> {
    Json(json!({
        "sources": [
            {
                "name": "Trekking API",
                "description": "Hiking trail database for the Italian Alps",
                "regions": [DEFAULT_IMPORT_REGION, "lombardia", "veneto"],
                "requires_api_key": true,
            }
        ]
    }))
}

/// GET /admin/sync-history
pub async fn sync_history(State(state): State<Arc<AppState>>) -> Json<Vec<SyncEntry>> {
    Json(state.sync_history.entries())
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrichRequest {
    pub limit: Option<usize>,
}

/// POST /admin/enrich-trails: run one enrichment batch.
pub async fn enrich_trails(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnrichRequest>,
) -> Result<Json<EnrichmentSummary>> {
    let limit = request.limit.unwrap_or(DEFAULT_ENRICHMENT_BATCH);
    let summary = enrichment::batch_enrich(&state.pool, state.trekking.http_client(), limit).await?;
    Ok(Json(summary))
}
