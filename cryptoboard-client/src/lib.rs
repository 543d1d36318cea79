//! Cryptoboard Client
//!
//! The fetch-cache-render pipeline: a [`Transport`] issues requests, the
//! [`Fetcher`] consults the expiring cache first, the [`RenderDispatcher`]
//! drives loading and error indicators around page render routines, and the
//! [`TabController`] loads tabs lazily inside a [`PageSession`].

pub mod dispatch;
pub mod fetcher;
pub mod session;
pub mod tabs;
pub mod transport;

pub use dispatch::{
    DispatchStatus, RegionBoard, RegionState, RegionSurface, RenderDispatcher, RenderError,
};
pub use fetcher::Fetcher;
pub use session::{home_tab_specs, home_tabs, Page, PageLoad, PageSession};
pub use tabs::TabController;
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};
