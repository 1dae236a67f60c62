//! Proposal reminder job.
//!
//! Polls for proposals still sitting in `Submitted` and nudges the owning
//! state admin, at most a bounded number of times per proposal. The
//! per-proposal count lives in the `system_state` table so restarts do not
//! reset the bound. Single-process by assumption; the database is the only
//! coordination point.

use crate::core::proposal::find_submitted;
use crate::entities::{District, State, SystemState, notification::Channel, system_state};
use crate::errors::{Error, Result};
use crate::notify::{outbox, templates};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use std::time::Duration;
use tracing::{debug, info, warn};

const REMINDER_KEY_PREFIX: &str = "proposal_reminders:";

/// Sends one reminder pass: every `Submitted` proposal whose counter has not
/// reached `max_per_proposal` gets a reminder enqueued and its counter bumped,
/// atomically. Returns how many reminders were enqueued.
pub async fn send_due_reminders_once(
    db: &DatabaseConnection,
    max_per_proposal: u32,
) -> Result<usize> {
    let submitted = find_submitted(db).await?;
    let mut enqueued = 0;

    for prop in submitted {
        let key = format!("{REMINDER_KEY_PREFIX}{}", prop.id);
        let count = get_reminder_count(db, &key).await?;
        if count >= max_per_proposal {
            debug!(proposal_id = prop.id, count, "reminder bound reached");
            continue;
        }

        let Some(district) = District::find_by_id(prop.district_id).one(db).await? else {
            warn!(proposal_id = prop.id, "proposal references missing district");
            continue;
        };
        let Some(state) = State::find_by_id(district.state_id).one(db).await? else {
            warn!(district_id = district.id, "district references missing state");
            continue;
        };

        let txn = db.begin().await?;
        outbox::enqueue(
            &txn,
            Channel::Whatsapp,
            &state.admin_phone,
            &templates::proposal_reminder(&prop.project_name, &district.name),
        )
        .await?;
        set_reminder_count(&txn, &key, count + 1).await?;
        txn.commit().await?;

        enqueued += 1;
    }

    Ok(enqueued)
}

/// Runs the reminder poller until the process exits.
pub async fn run_reminder_job(
    db: DatabaseConnection,
    poll_interval: Duration,
    max_per_proposal: u32,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        match send_due_reminders_once(&db, max_per_proposal).await {
            Ok(0) => {}
            Ok(count) => info!(count, "enqueued proposal reminders"),
            Err(e) => warn!(error = %e, "reminder pass failed"),
        }
    }
}

/// Reads a reminder counter, defaulting to zero when absent.
async fn get_reminder_count<C>(db: &C, key: &str) -> Result<u32>
where
    C: ConnectionTrait,
{
    let row = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    match row {
        Some(row) => row.value.parse::<u32>().map_err(|e| Error::Config {
            message: format!("corrupt reminder counter {key}: {e}"),
        }),
        None => Ok(0),
    }
}

/// Writes a reminder counter, inserting the key on first use.
async fn set_reminder_count<C>(db: &C, key: &str, count: u32) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active: system_state::ActiveModel = row.into();
        active.value = Set(count.to_string());
        active.updated_at = Set(now);
        active.update(db).await?;
    } else {
        system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(count.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
