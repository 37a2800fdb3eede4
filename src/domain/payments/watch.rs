//! Dual-channel payment status watch.
//!
//! Push delivery is lower-latency but not guaranteed to arrive, so a
//! fixed-interval poll runs alongside it the whole time. Neither channel
//! is assumed to win; the first terminal observation from either one is
//! authoritative and everything after it is ignored.

use std::{fmt, sync::Arc, time::Duration};

use crate::{
    api::{ApiError, EventStream, SseEvent},
    domain::{
        orders::models::OrderId,
        payments::{
            models::{PaymentOutcome, PaymentStatus, WatchChannel},
            records::StatusRecord,
            service::PaymentsService,
        },
    },
};

/// Watches one order until its payment reaches a terminal state.
///
/// Dropping the returned future at any point closes the push stream and
/// stops the poll timer; there is no detached work to leak.
pub struct PaymentWatch {
    payments: Arc<dyn PaymentsService>,
    order: OrderId,
    poll_interval: Duration,
}

impl fmt::Debug for PaymentWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentWatch")
            .field("payments", &"<PaymentsService>")
            .field("order", &self.order)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl PaymentWatch {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    #[must_use]
    pub fn new(payments: Arc<dyn PaymentsService>, order: OrderId) -> Self {
        Self {
            payments,
            order,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Runs both channels until the first terminal observation.
    ///
    /// A push channel that cannot be opened, fails mid-stream, or ends
    /// degrades the watch to poll-only; it is not reconnected. Poll
    /// failures are logged and the next tick tries again. The watch
    /// itself never gives up; callers bound it by dropping the future.
    pub async fn run(self) -> PaymentOutcome {
        let mut state = WatchState::default();

        let mut push = match self.payments.status_events(self.order).await {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::debug!(order = %self.order, error = %err, "push channel unavailable, polling only");
                None
            }
        };

        // Matches the push-less cadence: the first poll fires one full
        // interval after the watch starts, not immediately.
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.poll_interval,
            self.poll_interval,
        );
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = next_push(&mut push) => match event {
                    Some(Ok(event)) => {
                        // Payloads that do not parse are dropped; the
                        // poll still covers the order.
                        if let Ok(record) = serde_json::from_str::<StatusRecord>(&event.data) {
                            let status = PaymentStatus::parse(&record.status);

                            if let Some(outcome) = state.observe(WatchChannel::Push, status) {
                                return outcome;
                            }
                        }
                    }
                    Some(Err(err)) => {
                        tracing::debug!(order = %self.order, error = %err, "push channel failed, polling continues");
                        push = None;
                    }
                    None => {
                        tracing::debug!(order = %self.order, "push channel closed");
                        push = None;
                    }
                },
                _ = ticker.tick() => match self.payments.status(self.order).await {
                    Ok(status) => {
                        if let Some(outcome) = state.observe(WatchChannel::Poll, status) {
                            return outcome;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(order = %self.order, error = %err, "status poll failed");
                    }
                },
            }
        }
    }
}

async fn next_push(push: &mut Option<EventStream>) -> Option<Result<SseEvent, ApiError>> {
    match push {
        Some(stream) => stream.next_event().await,
        None => std::future::pending().await,
    }
}

/// The watch state machine.
///
/// The push channel only acts on PAID; the poll accepts both settled
/// spellings and the two expiry states. Once a terminal outcome has been
/// produced every later signal is swallowed, whichever channel it came
/// from.
#[derive(Debug, Default)]
struct WatchState {
    terminal: bool,
}

impl WatchState {
    fn observe(&mut self, channel: WatchChannel, status: PaymentStatus) -> Option<PaymentOutcome> {
        if self.terminal {
            return None;
        }

        let outcome = match channel {
            WatchChannel::Push => matches!(status, PaymentStatus::Paid).then_some(
                PaymentOutcome::Paid {
                    via: WatchChannel::Push,
                },
            ),
            WatchChannel::Poll => {
                if status.is_settled() {
                    Some(PaymentOutcome::Paid {
                        via: WatchChannel::Poll,
                    })
                } else if status.is_expired() {
                    Some(PaymentOutcome::Expired { status })
                } else {
                    None
                }
            }
        };

        if outcome.is_some() {
            self.terminal = true;
        }

        outcome
    }
}
