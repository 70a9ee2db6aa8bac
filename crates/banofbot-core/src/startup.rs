use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

/// Default warm-up window during which backlog traffic is discarded.
pub const DEFAULT_STARTUP_GRACE: Duration = Duration::from_millis(5000);

/// Monotonic time source for the startup gate.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Suppresses message handling until `grace` has elapsed since construction.
///
/// Telegram hands us everything queued while the bot was down as soon as
/// polling starts; replaying those commands after a restart is never wanted.
/// The gate opens once and stays open.
pub struct StartupGate {
    clock: Arc<dyn Clock>,
    opens_at: Instant,
    open: AtomicBool,
}

impl StartupGate {
    pub fn new(grace: Duration) -> Self {
        Self::with_clock(grace, Arc::new(SystemClock))
    }

    pub fn with_clock(grace: Duration, clock: Arc<dyn Clock>) -> Self {
        let opens_at = clock.now() + grace;
        Self {
            clock,
            opens_at,
            open: AtomicBool::new(grace.is_zero()),
        }
    }

    /// Gate that is open from the start.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn is_open(&self) -> bool {
        if self.open.load(Ordering::Acquire) {
            return true;
        }
        if self.clock.now() < self.opens_at {
            return false;
        }
        if !self.open.swap(true, Ordering::AcqRel) {
            tracing::info!("startup grace elapsed, handling messages");
        }
        true
    }
}

impl Default for StartupGate {
    fn default() -> Self {
        Self::new(DEFAULT_STARTUP_GRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_until_grace_elapses() {
        let clock = Arc::new(ManualClock::new());
        let gate = StartupGate::with_clock(Duration::from_millis(5000), clock.clone());

        assert!(!gate.is_open());
        clock.advance(Duration::from_millis(4999));
        assert!(!gate.is_open());
        clock.advance(Duration::from_millis(1));
        assert!(gate.is_open());
    }

    #[test]
    fn stays_open_once_opened() {
        let clock = Arc::new(ManualClock::new());
        let gate = StartupGate::with_clock(Duration::from_secs(1), clock.clone());
        clock.advance(Duration::from_secs(2));
        assert!(gate.is_open());
        assert!(gate.is_open());
    }

    #[test]
    fn zero_grace_is_open_immediately() {
        assert!(StartupGate::disabled().is_open());
    }
}
