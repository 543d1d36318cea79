//! Cryptoboard Core - Pipeline Types
//!
//! Pure data structures shared by every other crate: fetch requests and
//! outcomes, tab identifiers, error taxonomy, the clock abstraction, the
//! CoinGecko payload models and the endpoint catalogue.

pub mod clock;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod market;
pub mod request;
pub mod search;
pub mod tab;
pub mod widget;

pub use clock::{Clock, Millis, SystemClock};
pub use endpoints::{Endpoint, DEFAULT_API_BASE_URL};
pub use error::{FetchError, StorageError};
pub use request::{FetchOutcome, FetchRequest, TargetId};
pub use tab::{TabId, TabStatus};
pub use widget::{ThemeMode, WidgetConfig, WidgetHost, WidgetKind};

/// Default time-to-live for cached payloads, in milliseconds (five minutes).
pub const DEFAULT_CACHE_TTL_MS: Millis = 300_000;
