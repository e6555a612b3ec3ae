//! Runs the archive, delete and reorder passes over the configured lists.
//!
//! Passes run one after the other. Inside a pass every list gets its own
//! task and every card of a list gets its own task; a list completes once
//! all its card tasks are joined and a pass completes once all its list
//! tasks are joined. The first fatal error aborts everything still running.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::board::Board;
use crate::config::JanitorConfig;
use crate::error::{JanitorError, Result};
use crate::fetcher::fetch_list;
use crate::model::Card;
use crate::policy::MutationPolicy;
use crate::report::{CardOutcome, CardReport, GroupReport, ListReport, Pass, RunReport};
use crate::similarity::reorder_card;
use crate::staleness::{evaluate_staleness, StaleAction};

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A pass and the lists it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub pass: Pass,
    pub list_ids: Vec<String>,
}

/// The passes to run, in order, skipping those with no lists.
pub fn plan(config: &JanitorConfig) -> Vec<Group> {
    [
        (Pass::Archive, &config.archive_lists),
        (Pass::Delete, &config.delete_lists),
        (Pass::Reorder, &config.reorder_lists),
    ]
    .into_iter()
    .filter(|(_, ids)| !ids.is_empty())
    .map(|(pass, ids)| Group {
        pass,
        list_ids: ids.clone(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

struct Shared {
    board: Arc<dyn Board>,
    limiter: Option<Arc<Semaphore>>,
    threshold: TimeDelta,
    policy: MutationPolicy,
}

#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    /// `max_concurrency == 0` leaves card fan-out unbounded.
    pub fn new(
        board: Arc<dyn Board>,
        threshold: TimeDelta,
        policy: MutationPolicy,
        max_concurrency: usize,
    ) -> Self {
        let limiter = (max_concurrency > 0).then(|| Arc::new(Semaphore::new(max_concurrency)));
        Self {
            shared: Arc::new(Shared {
                board,
                limiter,
                threshold,
                policy,
            }),
        }
    }

    pub fn from_config(board: Arc<dyn Board>, config: &JanitorConfig) -> Self {
        Self::new(board, config.threshold, config.policy, config.max_concurrency)
    }

    /// Run every group in order against a single `now`.
    pub async fn run(&self, groups: &[Group], now: DateTime<Utc>) -> Result<RunReport> {
        let mut report = RunReport {
            dry_run: self.shared.policy.dry_run,
            groups: Vec::with_capacity(groups.len()),
        };
        for group in groups {
            report.groups.push(self.run_group(group, now).await?);
        }
        tracing::info!(
            mutations = report.mutation_count(),
            failures = report.failure_count(),
            "done"
        );
        Ok(report)
    }

    /// Process all lists of one group concurrently and join them.
    pub async fn run_group(&self, group: &Group, now: DateTime<Utc>) -> Result<GroupReport> {
        tracing::info!(pass = %group.pass, lists = group.list_ids.len(), "starting pass");

        let mut tasks = JoinSet::new();
        for (idx, list_id) in group.list_ids.iter().enumerate() {
            let shared = Arc::clone(&self.shared);
            let list_id = list_id.clone();
            let pass = group.pass;
            tasks.spawn(async move { (idx, process_list(shared, pass, list_id, now).await) });
        }

        let mut lists = Vec::with_capacity(group.list_ids.len());
        while let Some(joined) = tasks.join_next().await {
            let (idx, result) = joined.map_err(|e| JanitorError::Task(e.to_string()))?;
            // Returning here drops the JoinSet, which aborts the other lists.
            lists.push((idx, result?));
        }
        lists.sort_by_key(|(idx, _)| *idx);

        Ok(GroupReport {
            pass: group.pass,
            lists: lists.into_iter().map(|(_, l)| l).collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-list / per-card tasks
// ---------------------------------------------------------------------------

async fn process_list(
    shared: Arc<Shared>,
    pass: Pass,
    list_id: String,
    now: DateTime<Utc>,
) -> Result<ListReport> {
    let (list, cards) = fetch_list(shared.board.as_ref(), &list_id).await?;

    let mut tasks = JoinSet::new();
    let total = cards.len();
    for (idx, card) in cards.into_iter().enumerate() {
        let shared = Arc::clone(&shared);
        tasks.spawn(async move {
            let outcome = process_card(&shared, pass, &card, now).await;
            (idx, card, outcome)
        });
    }

    let mut reports = Vec::with_capacity(total);
    while let Some(joined) = tasks.join_next().await {
        let (idx, card, outcome) = joined.map_err(|e| JanitorError::Task(e.to_string()))?;
        reports.push((
            idx,
            CardReport {
                card_id: card.id,
                card_name: card.name,
                outcome: outcome?,
            },
        ));
    }
    reports.sort_by_key(|(idx, _)| *idx);

    tracing::info!(list = %list.name, %pass, cards = total, "list done");
    Ok(ListReport {
        list_id: list.id,
        list_name: list.name,
        cards: reports.into_iter().map(|(_, r)| r).collect(),
    })
}

async fn process_card(
    shared: &Shared,
    pass: Pass,
    card: &Card,
    now: DateTime<Utc>,
) -> Result<CardOutcome> {
    let _permit = match &shared.limiter {
        Some(sem) => Some(
            sem.acquire()
                .await
                .map_err(|e| JanitorError::Task(e.to_string()))?,
        ),
        None => None,
    };

    let board = shared.board.as_ref();
    match pass {
        Pass::Archive => {
            evaluate_staleness(
                board,
                card,
                StaleAction::Archive,
                now,
                shared.threshold,
                shared.policy,
            )
            .await
        }
        Pass::Delete => {
            evaluate_staleness(
                board,
                card,
                StaleAction::Delete,
                now,
                shared.threshold,
                shared.policy,
            )
            .await
        }
        Pass::Reorder => reorder_card(board, card, shared.policy).await,
    }
}
