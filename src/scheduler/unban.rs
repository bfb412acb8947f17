//! Unban scheduler.
//!
//! Every sweep lifts the temporary bans whose expiry has passed. The Discord unban is
//! attempted first and the stored expiry is cleared only when Discord confirms the
//! unban or reports the member was not banned at all. A transport failure keeps the
//! expiry so the next sweep retries that member. Cleared expiries are persisted once
//! at the end of the sweep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::data::member_store::SharedMemberStore;
use crate::error::{action::ActionError, store::StoreError, AppError};
use crate::service::actions::ModerationActions;

/// What one sweep did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Members unbanned on Discord and cleared locally.
    pub lifted: Vec<u64>,
    /// Members Discord did not have banned; cleared locally only.
    pub drifted: Vec<u64>,
    /// Members whose unban failed; their expiry is kept for the next sweep.
    pub failed: Vec<u64>,
    /// The sweep did not run because another one was still in progress.
    pub skipped: bool,
}

#[derive(Clone)]
pub struct UnbanScheduler {
    store: SharedMemberStore,
    actions: Arc<dyn ModerationActions>,
    /// Held for the duration of a sweep so sweeps never overlap.
    sweeping: Arc<Mutex<()>>,
    /// Set once the session's sweeps are shut down.
    stopped: Arc<AtomicBool>,
}

impl UnbanScheduler {
    pub fn new(store: SharedMemberStore, actions: Arc<dyn ModerationActions>) -> Self {
        Self {
            store,
            actions,
            sweeping: Arc::new(Mutex::new(())),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs one sweep at `now`.
    ///
    /// A failing unban is logged and the sweep carries on with the remaining members.
    /// The store lock is never held while waiting on Discord.
    ///
    /// # Arguments
    /// - `now` - Current UTC time; bans with an expiry before it are lifted
    ///
    /// # Returns
    /// - `Ok(SweepReport)` - What the sweep did
    /// - `Err(StoreError)` - Persisting the cleared expiries failed; they stay cleared
    ///   in memory and reach disk with the next write
    pub async fn sweep(&self, now: NaiveDateTime) -> Result<SweepReport, StoreError> {
        let Ok(_sweeping) = self.sweeping.try_lock() else {
            tracing::debug!("Previous unban sweep still running, skipping");
            return Ok(SweepReport {
                skipped: true,
                ..Default::default()
            });
        };
        if self.stopped.load(Ordering::SeqCst) {
            tracing::debug!("Unban sweeps stopped, skipping");
            return Ok(SweepReport {
                skipped: true,
                ..Default::default()
            });
        }

        let expired = self.store.lock().await.expired_bans(now);
        let mut report = SweepReport::default();

        if expired.is_empty() {
            tracing::debug!("No expired bans");
            return Ok(report);
        }

        for (member_id, display_name) in expired {
            let notice = match self.actions.unban(member_id).await {
                Ok(()) => {
                    tracing::info!("Lifted expired ban of {} ({})", display_name, member_id);
                    report.lifted.push(member_id);
                    format!("{} has been unbanned", display_name)
                }
                Err(ActionError::NotFound(msg)) => {
                    tracing::warn!(
                        "Expired ban of {} ({}) was already gone on Discord: {}",
                        display_name,
                        member_id,
                        msg
                    );
                    report.drifted.push(member_id);
                    format!(
                        "{}'s ban has expired. They were not banned on Discord anymore.",
                        display_name
                    )
                }
                Err(err) => {
                    tracing::error!(
                        "Failed to lift expired ban of {} ({}): {}",
                        display_name,
                        member_id,
                        err
                    );
                    report.failed.push(member_id);
                    continue;
                }
            };

            self.store.lock().await.lift_expired_ban(member_id, now);

            if let Err(err) = self.actions.notify_moderators(&notice).await {
                tracing::warn!("Failed to post unban notice for {}: {}", member_id, err);
            }
        }

        if !report.lifted.is_empty() || !report.drifted.is_empty() {
            self.store.lock().await.persist()?;
        }

        Ok(report)
    }

    /// Starts the recurring sweep with the given period.
    ///
    /// The first sweep runs right away so bans that expired while the bot was offline
    /// are lifted without waiting a full period.
    ///
    /// # Returns
    /// - `Ok(SweepHandle)` - Running sweeps; shut them down before reloading the store
    /// - `Err(AppError::SchedulerErr)` - The scheduler could not be created or started
    pub async fn start(self, period: Duration) -> Result<SweepHandle, AppError> {
        let scheduler = JobScheduler::new().await?;
        let sweeping = self.sweeping.clone();
        let stopped = self.stopped.clone();

        let initial_sweeper = self.clone();
        let initial = tokio::spawn(async move {
            initial_sweeper.run_sweep().await;
        });

        let job = Job::new_repeated_async(period, move |_uuid, _lock| {
            let sweeper = self.clone();

            Box::pin(async move {
                sweeper.run_sweep().await;
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        tracing::info!(
            "Unban scheduler started, sweeping every {}s",
            period.as_secs()
        );

        Ok(SweepHandle {
            scheduler,
            initial,
            sweeping,
            stopped,
        })
    }

    async fn run_sweep(&self) {
        let now = Utc::now().naive_utc();

        match self.sweep(now).await {
            Ok(report) if !report.skipped => tracing::debug!(
                "Unban sweep done: {} lifted, {} drifted, {} failed",
                report.lifted.len(),
                report.drifted.len(),
                report.failed.len()
            ),
            Ok(_) => {}
            Err(e) => tracing::error!("Error persisting unban sweep: {}", e),
        }
    }
}

/// Running sweeps of one bot session.
pub struct SweepHandle {
    scheduler: JobScheduler,
    initial: JoinHandle<()>,
    sweeping: Arc<Mutex<()>>,
    stopped: Arc<AtomicBool>,
}

impl SweepHandle {
    /// Stops all sweeping for this session.
    ///
    /// Stops the recurring job, aborts the startup sweep and waits for a scheduled
    /// sweep still in progress to finish. Once this returns no sweep of this session
    /// will persist the store again, so the next session can reload it safely. An
    /// aborted sweep leaves its expiries on disk and the next session retries them.
    ///
    /// # Returns
    /// - `Ok(())` - Sweeping stopped
    /// - `Err(AppError::SchedulerErr)` - The scheduler failed to shut down
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.scheduler.shutdown().await?;

        self.initial.abort();
        if let Err(e) = self.initial.await {
            if !e.is_cancelled() {
                tracing::error!("Startup unban sweep panicked: {}", e);
            }
        }

        let _sweep = self.sweeping.lock().await;
        self.stopped.store(true, Ordering::SeqCst);
        tracing::info!("Unban scheduler stopped");

        Ok(())
    }
}
