use anyhow::{Context, Result};
use chrono::Utc;
use janitor_core::report::{CardOutcome, RunReport};
use janitor_core::{plan, JanitorConfig, Orchestrator, RawConfig};
use std::sync::Arc;
use trello_api::TrelloClient;

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(raw: RawConfig, json: bool) -> Result<()> {
    // Validate everything before the first request goes out.
    let config = JanitorConfig::from_raw(raw)?;
    let client = TrelloClient::new(
        config.api_url.as_str(),
        config.credentials.key.as_str(),
        config.credentials.token.as_str(),
    )
    .context("failed to create Trello client")?;

    let groups = plan(&config);
    tracing::info!(
        groups = groups.len(),
        threshold_hours = config.threshold.num_minutes() as f64 / 60.0,
        dry_run = config.policy.dry_run,
        strict = config.policy.strict,
        "starting trello janitor"
    );

    let orchestrator = Orchestrator::from_config(Arc::new(client), &config);
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(orchestrator.run(&groups, Utc::now()))?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn detail(outcome: &CardOutcome) -> String {
    match outcome {
        CardOutcome::Fresh { idle_hours }
        | CardOutcome::Archived { idle_hours }
        | CardOutcome::Deleted { idle_hours } => format!("idle {idle_hours:.1}h"),
        CardOutcome::Repositioned { from, to } => format!("{from} -> {to}"),
        CardOutcome::WouldMutate { pass, planned } => format!("would {pass}: {}", detail(planned)),
        CardOutcome::Failed { error } => error.clone(),
        CardOutcome::InPlace | CardOutcome::NoScore => String::new(),
    }
}

fn report_rows(report: &RunReport) -> Vec<Vec<String>> {
    report
        .groups
        .iter()
        .flat_map(|g| {
            g.lists.iter().flat_map(move |l| {
                l.cards.iter().map(move |c| {
                    vec![
                        g.pass.to_string(),
                        l.list_name.clone(),
                        c.card_name.clone(),
                        c.outcome.label().to_string(),
                        detail(&c.outcome),
                    ]
                })
            })
        })
        .collect()
}

fn print_report(report: &RunReport) {
    let rows = report_rows(report);
    if rows.is_empty() {
        println!("No cards processed.");
        return;
    }
    print_table(&["PASS", "LIST", "CARD", "OUTCOME", "DETAIL"], rows);
    println!();
    let planned = report
        .cards()
        .filter(|(_, c)| matches!(c.outcome, CardOutcome::WouldMutate { .. }))
        .count();
    if report.dry_run {
        println!("Dry run: {planned} change(s) planned.");
    } else {
        println!(
            "{} change(s) applied, {} failed.",
            report.mutation_count(),
            report.failure_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use janitor_core::report::{CardReport, GroupReport, ListReport};
    use janitor_core::Pass;

    #[test]
    fn rows_flatten_groups_lists_and_cards() {
        let report = RunReport {
            dry_run: false,
            groups: vec![GroupReport {
                pass: Pass::Archive,
                lists: vec![ListReport {
                    list_id: "l1".into(),
                    list_name: "Inbox".into(),
                    cards: vec![CardReport {
                        card_id: "c1".into(),
                        card_name: "Old idea".into(),
                        outcome: CardOutcome::Archived { idle_hours: 400.0 },
                    }],
                }],
            }],
        };
        let rows = report_rows(&report);
        assert_eq!(
            rows,
            vec![vec![
                "archive".to_string(),
                "Inbox".into(),
                "Old idea".into(),
                "archived".into(),
                "idle 400.0h".into(),
            ]]
        );
    }

    #[test]
    fn missing_token_fails_before_any_request() {
        let raw = RawConfig {
            key: Some("k".into()),
            archive_lists: Some("l1".into()),
            // Unroutable: a request would fail with a transport error instead.
            api_url: Some("http://127.0.0.1:9".into()),
            ..Default::default()
        };
        let err = run(raw, false).unwrap_err();
        assert!(err.to_string().contains("TRELLO_TOKEN"));
    }
}
