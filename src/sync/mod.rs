//! Reconciliation engine. One cycle resolves the configured person names
//! against the server's roster, merges the results of several overlapping
//! searches into the set of assets that belong in the album, diffs that set
//! against current membership, and adds only what is missing. [`run`] repeats
//! cycles on a fixed interval until cancelled; a failed cycle is logged and
//! never stops the next one.

pub mod error;
pub mod filter;
pub mod plan;

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::immich::ImmichApi;
use crate::systemd::SystemdNotifier;

use error::CycleError;
use filter::FilenameFilter;
use plan::plan_queries;

/// Narrowed application config handed to the sync engine, detached from CLI
/// parsing so tests can construct it directly.
#[derive(Debug)]
pub struct SyncConfig {
    pub(crate) album_id: String,
    pub(crate) person_names: Vec<String>,
    pub(crate) filter: FilenameFilter,
    pub(crate) interval: Duration,
    pub(crate) once: bool,
    pub(crate) dry_run: bool,
}

/// Counters from one completed cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Unique assets that belong in the album, after filters.
    pub desired: usize,
    /// Assets already in the album when the cycle started.
    pub in_album: usize,
    /// Assets newly added this cycle.
    pub added: usize,
    /// Add outcomes rejected as already present.
    pub duplicates: usize,
    /// Add outcomes rejected for any other reason.
    pub rejected: usize,
    /// Planned searches that failed and were skipped.
    pub failed_queries: usize,
}

/// Resolve configured person names to ids via the roster.
///
/// Names must match exactly, including case, and every configured name has
/// to resolve; a single miss aborts the cycle so a typo cannot quietly
/// shrink what the album receives. Returns ids deduplicated in input order.
async fn resolve_people(api: &dyn ImmichApi, names: &[String]) -> Result<Vec<String>, CycleError> {
    let roster = api.list_people().await.map_err(CycleError::Roster)?;

    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for person in &roster {
        if let Some(name) = person.name.as_deref() {
            if !name.is_empty() {
                by_name.insert(name, &person.id);
            }
        }
    }

    let mut ids: Vec<String> = Vec::with_capacity(names.len());
    let mut seen: HashSet<&str> = HashSet::new();
    for name in names {
        match by_name.get(name.as_str()) {
            Some(&id) => {
                debug!("Resolved '{}' to person {}", name, id);
                if seen.insert(id) {
                    ids.push(id.to_string());
                }
            }
            None => {
                let mut available: Vec<&str> = by_name.keys().copied().collect();
                available.sort_unstable();
                warn!("Known person names: {:?}", available);
                return Err(CycleError::PersonNotFound(name.clone()));
            }
        }
    }

    Ok(ids)
}

/// Outcome of the query phase: deduplicated, filename-filtered asset ids
/// plus the number of planned searches that failed.
struct DesiredSet {
    ids: HashSet<String>,
    failed_queries: usize,
}

/// Run every planned search and merge the results by asset id. Individual
/// search failures are logged and counted; the cycle aborts only when every
/// search fails. Filters apply after the merge.
async fn collect_desired_set(
    api: &dyn ImmichApi,
    person_ids: &[String],
    filter: &FilenameFilter,
) -> Result<DesiredSet, CycleError> {
    let queries = plan_queries(person_ids);
    let mut found: HashMap<String, String> = HashMap::new();
    let mut failed_queries = 0usize;

    for query in &queries {
        match api.search_assets(&query.person_ids, query.match_all).await {
            Ok(assets) => {
                let before = found.len();
                let returned = assets.len();
                for asset in assets {
                    found.insert(asset.id, asset.original_file_name);
                }
                debug!(
                    "Search for {} returned {} assets, {} new ({} total)",
                    query,
                    returned,
                    found.len() - before,
                    found.len()
                );
            }
            Err(e) => {
                failed_queries += 1;
                warn!("Search for {} failed: {}", query, e);
            }
        }
    }

    if !queries.is_empty() && failed_queries == queries.len() {
        return Err(CycleError::AllQueriesFailed(failed_queries));
    }

    let merged = found.len();
    let ids: HashSet<String> = found
        .into_iter()
        .filter(|(_, filename)| filter.matches(filename))
        .map(|(id, _)| id)
        .collect();

    if !filter.is_empty() {
        debug!("Filename filters kept {} of {} assets", ids.len(), merged);
    }

    Ok(DesiredSet { ids, failed_queries })
}

/// Run one reconciliation pass against the configured album.
pub async fn run_cycle(
    api: &dyn ImmichApi,
    config: &SyncConfig,
) -> Result<CycleReport, CycleError> {
    info!("Starting sync cycle");

    let person_ids = resolve_people(api, &config.person_names).await?;

    let desired = collect_desired_set(api, &person_ids, &config.filter).await?;
    let mut report = CycleReport {
        desired: desired.ids.len(),
        failed_queries: desired.failed_queries,
        ..CycleReport::default()
    };

    if desired.ids.is_empty() {
        info!("No assets match the configured people and filters");
        return Ok(report);
    }
    info!(
        "{} assets belong in album {} ({} people)",
        report.desired,
        config.album_id,
        person_ids.len()
    );

    let members = api
        .album_asset_ids(&config.album_id)
        .await
        .map_err(|source| CycleError::MembershipFetch {
            album_id: config.album_id.clone(),
            source,
        })?;
    report.in_album = members.len();

    let mut missing: Vec<String> = desired.ids.difference(&members).cloned().collect();
    missing.sort_unstable();

    if missing.is_empty() {
        info!("All desired assets are already in the album");
        return Ok(report);
    }

    if config.dry_run {
        for id in &missing {
            info!("[DRY RUN] Would add asset {}", id);
        }
        info!(
            "[DRY RUN] {} assets would be added to album {}",
            missing.len(),
            config.album_id
        );
        return Ok(report);
    }

    info!(
        "Adding {} missing assets to album {}",
        missing.len(),
        config.album_id
    );
    let outcomes = api
        .add_assets_to_album(&config.album_id, &missing)
        .await
        .map_err(|source| CycleError::Mutation {
            album_id: config.album_id.clone(),
            count: missing.len(),
            source,
        })?;

    for outcome in &outcomes {
        if outcome.success {
            report.added += 1;
        } else if outcome.is_duplicate() {
            report.duplicates += 1;
        } else {
            report.rejected += 1;
            warn!(
                "Album {} rejected asset {}: {}",
                config.album_id,
                outcome.id,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(report)
}

/// Scheduler loop: run cycles until the token is cancelled.
///
/// Cycle errors are logged, the loop keeps going. The exception is `once`
/// mode, where the single cycle's outcome becomes the process outcome.
/// Cancellation is observed between cycles and during the interval sleep;
/// an in-flight cycle always finishes.
pub async fn run(
    api: &dyn ImmichApi,
    config: &SyncConfig,
    notifier: &SystemdNotifier,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    notifier.notify_ready();

    loop {
        if shutdown.is_cancelled() {
            info!("Shutdown requested, exiting...");
            break;
        }

        let started = Instant::now();
        match run_cycle(api, config).await {
            Ok(report) => {
                info!("── Cycle Summary ──");
                info!(
                    "  {} desired, {} in album, {} added ({} duplicate, {} rejected)",
                    report.desired,
                    report.in_album,
                    report.added,
                    report.duplicates,
                    report.rejected
                );
                if report.failed_queries > 0 {
                    info!(
                        "  {} searches failed, the desired set may be incomplete",
                        report.failed_queries
                    );
                }
                info!("  elapsed: {}", format_duration(started.elapsed()));
                notifier.notify_status(&format!(
                    "Last cycle: {} added, {} desired",
                    report.added, report.desired
                ));
            }
            Err(e) => {
                let e = anyhow::Error::from(e);
                error!("Sync cycle aborted: {:#}", e);
                if config.once {
                    notifier.notify_stopping();
                    return Err(e);
                }
                notifier.notify_status("Last cycle failed");
            }
        }

        notifier.notify_watchdog();

        if config.once {
            break;
        }

        info!(
            "Waiting {} seconds until the next cycle...",
            config.interval.as_secs()
        );
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = shutdown.cancelled() => {
                info!("Shutdown during wait, exiting...");
                break;
            }
        }
    }

    notifier.notify_stopping();
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
