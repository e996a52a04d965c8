//! Frame-polled timers with cooperative cancellation.
//!
//! The UI runs on a single event loop, so timers never spawn anything: the
//! owner polls them with the current [`Time`](crate::Time) every frame.
//! Each timer holds a `CancellationToken`, normally a child of its owner's
//! token, so disposing the owner cancels every timer it created and no
//! pending value is ever delivered after disposal.
//!
//! - [`Delay`]: one-shot, fires once after a fixed duration.
//! - [`Debounce`]: restartable one-shot; every `schedule` replaces the pending
//!   value and pushes the deadline back, so only the latest value commits.

use chrono::{DateTime, Duration, Utc};
use tokio_util::sync::CancellationToken;

/// One-shot timer.
#[derive(Debug, Clone)]
pub struct Delay {
    deadline: Option<DateTime<Utc>>,
    cancel_token: CancellationToken,
}

impl Delay {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel_token,
        }
    }

    /// Arm (or re-arm) the timer to fire `after` from `now`.
    pub fn start(&mut self, now: DateTime<Utc>, after: Duration) {
        if self.cancel_token.is_cancelled() {
            log::debug!("Delay::start ignored: timer already cancelled");
            return;
        }
        self.deadline = Some(now + after);
    }

    /// Returns `true` exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        if self.cancel_token.is_cancelled() {
            self.deadline = None;
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some() && !self.cancel_token.is_cancelled()
    }

    /// Time left until the deadline, `None` when not armed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_pending() {
            return None;
        }
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// Disarm without cancelling the token; the timer can be started again.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    /// Cancel permanently.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Restartable single-shot timer carrying the latest scheduled value.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, DateTime<Utc>)>,
    cancel_token: CancellationToken,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration, cancel_token: CancellationToken) -> Self {
        Self {
            delay,
            pending: None,
            cancel_token,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the countdown.
    pub fn schedule(&mut self, value: T, now: DateTime<Utc>) {
        if self.cancel_token.is_cancelled() {
            return;
        }
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        if self.cancel_token.is_cancelled() {
            self.pending = None;
            return None;
        }
        let ready = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        if self.cancel_token.is_cancelled() {
            self.pending = None;
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some() && !self.cancel_token.is_cancelled()
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_pending() {
            return None;
        }
        self.pending
            .as_ref()
            .map(|(_, deadline)| (*deadline - now).max(Duration::zero()))
    }

    /// Drop the pending value; the timer stays usable.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Cancel permanently.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[test]
    fn delay_fires_once_after_deadline() {
        let mut delay = Delay::new(CancellationToken::new());
        delay.start(t0(), Duration::milliseconds(4300));

        assert!(!delay.poll(t0() + Duration::milliseconds(4299)));
        assert!(delay.poll(t0() + Duration::milliseconds(4300)));
        assert!(!delay.poll(t0() + Duration::seconds(10)));
        assert!(!delay.is_pending());
    }

    #[test]
    fn delay_reports_remaining() {
        let mut delay = Delay::new(CancellationToken::new());
        assert_eq!(delay.remaining(t0()), None);

        delay.start(t0(), Duration::seconds(2));
        assert_eq!(
            delay.remaining(t0() + Duration::milliseconds(500)),
            Some(Duration::milliseconds(1500))
        );
        assert_eq!(
            delay.remaining(t0() + Duration::seconds(5)),
            Some(Duration::zero())
        );
    }

    #[test]
    fn cancelling_parent_token_stops_delay() {
        let parent = CancellationToken::new();
        let mut delay = Delay::new(parent.child_token());
        delay.start(t0(), Duration::seconds(1));

        parent.cancel();

        assert!(!delay.poll(t0() + Duration::seconds(2)));
        assert!(delay.is_cancelled());

        delay.start(t0(), Duration::seconds(1));
        assert!(!delay.is_pending());
    }

    #[test]
    fn debounce_latest_value_wins() {
        let mut debounce = Debounce::new(Duration::milliseconds(500), CancellationToken::new());

        debounce.schedule("j", t0());
        debounce.schedule("jo", t0() + Duration::milliseconds(300));

        // First deadline has passed but it was rescheduled
        assert_eq!(debounce.poll(t0() + Duration::milliseconds(600)), None);
        assert_eq!(debounce.pending(), Some(&"jo"));

        assert_eq!(
            debounce.poll(t0() + Duration::milliseconds(800)),
            Some("jo")
        );
        assert_eq!(debounce.poll(t0() + Duration::seconds(5)), None);
    }

    #[test]
    fn debounce_flush_commits_immediately() {
        let mut debounce = Debounce::new(Duration::milliseconds(500), CancellationToken::new());
        debounce.schedule(42, t0());

        assert_eq!(debounce.flush(), Some(42));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn debounce_disposed_owner_never_commits() {
        let owner = CancellationToken::new();
        let mut debounce = Debounce::new(Duration::milliseconds(500), owner.child_token());
        debounce.schedule(String::from("pending"), t0());

        owner.cancel();

        assert_eq!(debounce.poll(t0() + Duration::seconds(1)), None);
        assert_eq!(debounce.flush(), None);
        debounce.schedule(String::from("late"), t0());
        assert!(!debounce.is_pending());
    }
}
