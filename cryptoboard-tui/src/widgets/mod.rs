//! Reusable widget components.

pub mod detail;
pub mod embed;
pub mod progress;
pub mod sparkline;
pub mod status;

pub use detail::DetailPanel;
pub use embed::EmbedPanel;
pub use progress::HitRateGauge;
pub use sparkline::sparkline;
pub use status::{RegionStatus, StatusIndicator};
