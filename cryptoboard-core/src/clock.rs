//! Wall-clock abstraction used for cache timestamps.

use chrono::Utc;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

/// Source of the current time.
///
/// Cache expiry is computed against this so tests can move time forward
/// without sleeping.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        Utc::now().timestamp_millis()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}
