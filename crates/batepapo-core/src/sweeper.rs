//! Background presence sweeper.
//!
//! Runs [`PresenceService::sweep_stale`] on a fixed interval, independent of
//! request traffic, until cancelled. Each tick is awaited before the next one
//! is taken, so sweeps never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::repository::participant::ParticipantRepository;
use crate::service::presence::PresenceService;

/// Shortest period the sweeper runs at; shorter (including zero) intervals
/// are raised to this.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// How often to sweep and how long a participant may stay silent.
#[derive(Debug, Clone, Copy)]
pub struct SweepSchedule {
    pub interval: Duration,
    pub timeout: chrono::Duration,
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
            timeout: chrono::Duration::seconds(10),
        }
    }
}

/// Spawn the sweeper on the current tokio runtime.
///
/// The first sweep happens one full interval after start. Missed ticks are
/// skipped rather than replayed. Sweep failures are logged and the loop
/// carries on with the next tick.
pub fn spawn_sweeper<P, C>(
    presence: Arc<PresenceService<P, C>>,
    schedule: SweepSchedule,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    P: ParticipantRepository + 'static,
    C: Clock + 'static,
{
    let period = if schedule.interval < MIN_SWEEP_INTERVAL {
        warn!(
            requested_ms = schedule.interval.as_millis() as u64,
            "sweep interval too short, using {}ms",
            MIN_SWEEP_INTERVAL.as_millis()
        );
        MIN_SWEEP_INTERVAL
    } else {
        schedule.interval
    };

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // `interval` fires immediately once; consume that tick.
        ticker.tick().await;

        info!(
            interval_ms = period.as_millis() as u64,
            timeout_secs = schedule.timeout.num_seconds(),
            "presence sweeper started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("presence sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match presence.sweep_stale(schedule.timeout).await {
                        Ok(evicted) if !evicted.is_empty() => {
                            info!(count = evicted.len(), "sweep evicted inactive participants");
                        }
                        Ok(_) => debug!("sweep found no inactive participants"),
                        Err(e) => warn!(error = %e, "presence sweep failed"),
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::{InMemoryMessages, InMemoryParticipants, t0};

    fn presence() -> (
        Arc<PresenceService<InMemoryParticipants, ManualClock>>,
        InMemoryMessages,
        ManualClock,
    ) {
        let messages = InMemoryMessages::default();
        let clock = ManualClock::new(t0());
        let svc = PresenceService::new(InMemoryParticipants::with_log(messages.clone()), clock.clone());
        (Arc::new(svc), messages, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_after_interval() {
        let (svc, messages, clock) = presence();
        svc.join("alice").await.unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(svc.clone(), SweepSchedule::default(), cancel.clone());

        // Silent for 20s of virtual time before the first tick at 15s.
        clock.advance(chrono::Duration::seconds(20));
        tokio::time::sleep(Duration::from_secs(16)).await;

        assert!(svc.list_participants().await.unwrap().is_empty());
        let log = messages.snapshot();
        assert_eq!(log.last().unwrap().text, "left");

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_does_not_run_before_first_interval() {
        let (svc, _, clock) = presence();
        svc.join("alice").await.unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(svc.clone(), SweepSchedule::default(), cancel.clone());

        clock.advance(chrono::Duration::seconds(60));
        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(svc.list_participants().await.unwrap().len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_active_participants() {
        let (svc, messages, clock) = presence();
        svc.join("alice").await.unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(svc.clone(), SweepSchedule::default(), cancel.clone());

        // Heartbeat every 5s of virtual time across three sweeps.
        for _ in 0..10 {
            clock.advance(chrono::Duration::seconds(5));
            svc.heartbeat("alice").await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        }

        assert_eq!(svc.list_participants().await.unwrap().len(), 1);
        assert_eq!(messages.snapshot().len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_cancel() {
        let (svc, _, _) = presence();
        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(svc, SweepSchedule::default(), cancel.clone());

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_with_zero_interval_runs_at_minimum_period() {
        let (svc, _, clock) = presence();
        svc.join("alice").await.unwrap();

        let cancel = CancellationToken::new();
        let schedule = SweepSchedule {
            interval: Duration::ZERO,
            ..SweepSchedule::default()
        };
        let handle = spawn_sweeper(svc.clone(), schedule, cancel.clone());

        clock.advance(chrono::Duration::seconds(20));
        tokio::time::sleep(MIN_SWEEP_INTERVAL * 2).await;
        assert!(svc.list_participants().await.unwrap().is_empty());

        cancel.cancel();
        handle.await.unwrap();
    }
}
