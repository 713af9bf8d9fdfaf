//! Aggregation handlers: health fan-out and the cached stats merge.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::fanout::{all_or_first_error, settle_all};
use crate::AppState;

/// Time cap per health probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Time cap per stats fan-out call.
pub const STATS_TIMEOUT: Duration = Duration::from_secs(5);

/// Merged project/task counters served by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsAggregate {
    pub projects: u64,
    pub tasks: u64,
    pub todo: u64,
    pub doing: u64,
    pub done: u64,
    /// Whether this payload came from the cache.
    pub cached: bool,
}

/// `GET /api/health` - probe all downstream services concurrently.
///
/// Never fails as a whole: each probe's outcome lands in its own boolean,
/// a timeout or refused connection flips only that flag.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let results = settle_all(vec![
        probe(&state, &state.upstreams.projects),
        probe(&state, &state.upstreams.tasks),
        probe(&state, &state.upstreams.notifications),
    ])
    .await;

    for (name, result) in ["projects", "tasks", "notifications"].iter().zip(&results) {
        if let Err(e) = result {
            debug!(service = %name, error = %e, "health probe failed");
        }
    }

    Json(json!({
        "ok": true,
        "gateway": true,
        "services": {
            "projects": results[0].is_ok(),
            "tasks": results[1].is_ok(),
            "notifications": results[2].is_ok(),
        },
    }))
}

/// `GET /api/stats` - serve the cached aggregate or fan out and merge.
///
/// All-or-nothing: if either downstream call fails, the request fails
/// with 502 and the cache is left untouched, so the next call re-fetches
/// instead of serving a stale entry.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsAggregate>, GatewayError> {
    if let Some(aggregate) = state.cache.get() {
        debug!("serving stats from cache");
        return Ok(Json(StatsAggregate {
            cached: true,
            ..aggregate
        }));
    }

    let results = all_or_first_error(vec![
        fetch_json(
            &state,
            format!("{}/projects/count", state.upstreams.projects),
            STATS_TIMEOUT,
        ),
        fetch_json(
            &state,
            format!("{}/stats", state.upstreams.tasks),
            STATS_TIMEOUT,
        ),
    ])
    .await
    .inspect_err(|e| warn!(error = %e, "stats fan-out failed"))?;

    let aggregate = merge(&results[0], &results[1])?;
    state.cache.put(aggregate.clone());
    Ok(Json(aggregate))
}

/// Combine the projects count and tasks counters into one payload.
fn merge(projects: &Value, tasks: &Value) -> Result<StatsAggregate, GatewayError> {
    let field = |value: &Value, name: &str| {
        value.get(name).and_then(Value::as_u64).ok_or_else(|| {
            GatewayError::Upstream(format!("missing field {name} in downstream payload"))
        })
    };

    Ok(StatsAggregate {
        projects: field(projects, "count")?,
        tasks: field(tasks, "tasks")?,
        todo: field(tasks, "todo")?,
        doing: field(tasks, "doing")?,
        done: field(tasks, "done")?,
        cached: false,
    })
}

/// Probe one service's health endpoint within [`HEALTH_TIMEOUT`].
async fn probe(state: &AppState, base: &str) -> Result<(), GatewayError> {
    let url = format!("{base}/health");
    let request = async {
        let response = state.http.get(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Upstream(format!(
                "{url} returned {}",
                response.status()
            )))
        }
    };
    tokio::time::timeout(HEALTH_TIMEOUT, request)
        .await
        .map_err(|_| GatewayError::Timeout(HEALTH_TIMEOUT))?
}

/// Fetch a JSON payload within a time cap.
async fn fetch_json(
    state: &AppState,
    url: String,
    cap: Duration,
) -> Result<Value, GatewayError> {
    let request = async {
        let response = state.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GatewayError::Upstream(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        Ok(response.json::<Value>().await?)
    };
    tokio::time::timeout(cap, request)
        .await
        .map_err(|_| GatewayError::Timeout(cap))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_combines_downstream_payloads() {
        let projects = json!({"count": 3});
        let tasks = json!({"tasks": 7, "todo": 2, "doing": 1, "done": 4, "scope": "all"});

        let aggregate = merge(&projects, &tasks).unwrap();
        assert_eq!(
            aggregate,
            StatsAggregate {
                projects: 3,
                tasks: 7,
                todo: 2,
                doing: 1,
                done: 4,
                cached: false,
            }
        );
    }

    #[test]
    fn test_merge_rejects_malformed_payload() {
        let projects = json!({"total": 3});
        let tasks = json!({"tasks": 7, "todo": 2, "doing": 1, "done": 4});
        assert!(matches!(
            merge(&projects, &tasks),
            Err(GatewayError::Upstream(_))
        ));
    }

    #[test]
    fn test_aggregate_serializes_cached_flag() {
        let aggregate = StatsAggregate {
            projects: 1,
            tasks: 2,
            todo: 1,
            doing: 1,
            done: 0,
            cached: true,
        };
        let json = serde_json::to_string(&aggregate).unwrap();
        assert!(json.contains("\"cached\":true"));
    }
}
