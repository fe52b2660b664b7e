//! Periodic SLA sweep over pending manuscripts.
//!
//! Two passes on each tick, running on a fixed interval until cancelled:
//!
//! 1. Auto-approve: pending manuscripts older than the SLA window transition
//!    to `auto_approved`. No counters move and `confirmed_at` stays NULL;
//!    auto-approval is distinct from a manual approval.
//! 2. Reminder: still-pending manuscripts older than the reminder window
//!    that have not been reminded get one reminder notification per group.
//!
//! The auto-approve pass runs first so a manuscript crossing both windows
//! in one tick is approved rather than pointlessly reminded about.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use inkflow_alimtalk::{MessageKind, OutboundMessage};
use inkflow_db::repositories::ManuscriptRepo;

use crate::handlers::manuscripts::notify_and_log;
use crate::state::AppState;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(state: AppState, cancel: CancellationToken) {
    tracing::info!(
        auto_approve_hours = state.config.auto_approve_hours,
        remind_hours = state.config.remind_hours,
        interval_secs = state.config.sweep_interval_secs,
        "Manuscript sweep started"
    );

    let mut interval =
        tokio::time::interval(Duration::from_secs(state.config.sweep_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Manuscript sweep stopping");
                break;
            }
            _ = interval.tick() => {
                auto_approve(&state).await;
                remind(&state).await;
            }
        }
    }
}

async fn auto_approve(state: &AppState) {
    let cutoff = Utc::now() - chrono::Duration::hours(state.config.auto_approve_hours);
    match ManuscriptRepo::auto_approve_older_than(&state.pool, cutoff).await {
        Ok(count) if count > 0 => {
            tracing::info!(count, "Sweep: auto-approved overdue manuscripts");
        }
        Ok(_) => {
            tracing::debug!("Sweep: nothing to auto-approve");
        }
        Err(e) => {
            tracing::error!(error = %e, "Sweep: auto-approve pass failed");
        }
    }
}

async fn remind(state: &AppState) {
    let cutoff = Utc::now() - chrono::Duration::hours(state.config.remind_hours);
    let remindable = match ManuscriptRepo::list_remindable(&state.pool, cutoff).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "Sweep: reminder pass failed");
            return;
        }
    };

    for row in remindable {
        let message = OutboundMessage {
            kind: MessageKind::Reminder,
            phone: row.contact.clone(),
            client_id: Some(row.client_id),
            manuscript_id: Some(row.id),
            client_name: row.client_name.clone(),
            confirm_url: state.config.confirm_url(&row.confirm_token),
            manuscript_title: Some(row.title.clone()),
        };
        notify_and_log(state, &message).await;

        // Mark the whole batch reminded even when delivery failed; one
        // reminder attempt per batch, retries are staff-initiated.
        if let Err(e) = ManuscriptRepo::mark_reminded(&state.pool, row.id).await {
            tracing::error!(manuscript_id = row.id, error = %e, "Sweep: failed to mark reminded");
        }
    }
}
