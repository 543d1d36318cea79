//! Turning fetch outcomes into UI updates.
//!
//! A [`RegionSurface`] is anything that can toggle loading and error
//! indicators for named regions. The [`RenderDispatcher`] drives those
//! toggles around a page-specific render routine.

use std::collections::{BTreeMap, BTreeSet};

use cryptoboard_core::{FetchOutcome, TargetId};
use serde_json::Value;

/// Loading/error indicator control for named regions.
///
/// Every method returns `false` when the region does not exist. Callers treat
/// that as a no-op; a result may arrive for a region that is already gone.
pub trait RegionSurface {
    fn show_loading(&mut self, id: &TargetId) -> bool;
    fn hide_loading(&mut self, id: &TargetId) -> bool;
    fn show_error(&mut self, id: &TargetId) -> bool;
    fn hide_error(&mut self, id: &TargetId) -> bool;
}

/// Errors a render routine may report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("unexpected payload shape: {0}")]
    Shape(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Shape(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// The render routine ran and accepted the payload.
    Rendered,
    /// The fetch failed, or the payload could not be rendered.
    Failed,
}

impl DispatchStatus {
    pub fn is_rendered(&self) -> bool {
        matches!(self, DispatchStatus::Rendered)
    }
}

/// Drives indicator state for one fetch and hands the payload to its render
/// routine.
pub struct RenderDispatcher<'a, S: ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: RegionSurface + ?Sized> RenderDispatcher<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self { surface }
    }

    /// Called when a fetch is issued: clear stale errors, show loading.
    pub fn prepare(&mut self, targets: &BTreeSet<TargetId>) {
        for id in targets {
            let present = self.surface.hide_error(id);
            self.surface.show_loading(id);
            if !present {
                tracing::debug!(target_id = %id, "prepare skipped missing region");
            }
        }
    }

    /// Apply an outcome.
    ///
    /// On success, loading indicators are hidden for every target and then
    /// `render` is called exactly once. On failure, `render` is never
    /// called; every target shows its error indicator instead and the reason
    /// goes to the log. A render routine that rejects the payload shape is
    /// handled like a failed fetch.
    pub fn dispatch<F>(
        &mut self,
        outcome: FetchOutcome,
        targets: &BTreeSet<TargetId>,
        render: F,
    ) -> DispatchStatus
    where
        F: FnOnce(Value) -> Result<(), RenderError>,
    {
        match outcome {
            FetchOutcome::Success(data) => {
                self.hide_loading(targets);
                match render(data) {
                    Ok(()) => DispatchStatus::Rendered,
                    Err(e) => {
                        tracing::warn!(targets = %join(targets), error = %e, "render rejected payload");
                        self.show_errors(targets);
                        DispatchStatus::Failed
                    }
                }
            }
            FetchOutcome::Failure(reason) => {
                self.hide_loading(targets);
                self.show_errors(targets);
                tracing::warn!(targets = %join(targets), reason = %reason, "fetch failed, showing error state");
                DispatchStatus::Failed
            }
        }
    }

    fn hide_loading(&mut self, targets: &BTreeSet<TargetId>) {
        for id in targets {
            if !self.surface.hide_loading(id) {
                tracing::debug!(target_id = %id, "result for missing region ignored");
            }
        }
    }

    fn show_errors(&mut self, targets: &BTreeSet<TargetId>) {
        for id in targets {
            self.surface.show_error(id);
        }
    }
}

fn join(targets: &BTreeSet<TargetId>) -> String {
    targets
        .iter()
        .map(TargetId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Indicator state of one region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionState {
    pub loading: bool,
    pub error: bool,
}

/// Set of registered regions and their indicator state.
///
/// Only registered regions exist; toggles on anything else report `false`.
#[derive(Debug, Clone, Default)]
pub struct RegionBoard {
    regions: BTreeMap<TargetId, RegionState>,
}

impl RegionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TargetId>,
    {
        let mut board = Self::new();
        for id in ids {
            board.register(id);
        }
        board
    }

    pub fn register(&mut self, id: impl Into<TargetId>) {
        self.regions.entry(id.into()).or_default();
    }

    pub fn state(&self, id: &TargetId) -> Option<RegionState> {
        self.regions.get(id).copied()
    }

    pub fn is_loading(&self, id: &str) -> bool {
        self.state(&TargetId::new(id)).is_some_and(|s| s.loading)
    }

    pub fn has_error(&self, id: &str) -> bool {
        self.state(&TargetId::new(id)).is_some_and(|s| s.error)
    }

    pub fn any_loading(&self) -> bool {
        self.regions.values().any(|s| s.loading)
    }

    fn update(&mut self, id: &TargetId, f: impl FnOnce(&mut RegionState)) -> bool {
        match self.regions.get_mut(id) {
            Some(state) => {
                f(state);
                true
            }
            None => false,
        }
    }
}

impl RegionSurface for RegionBoard {
    fn show_loading(&mut self, id: &TargetId) -> bool {
        self.update(id, |s| s.loading = true)
    }

    fn hide_loading(&mut self, id: &TargetId) -> bool {
        self.update(id, |s| s.loading = false)
    }

    fn show_error(&mut self, id: &TargetId) -> bool {
        self.update(id, |s| s.error = true)
    }

    fn hide_error(&mut self, id: &TargetId) -> bool {
        self.update(id, |s| s.error = false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn targets(ids: &[&str]) -> BTreeSet<TargetId> {
        ids.iter().map(|id| TargetId::new(*id)).collect()
    }

    #[test]
    fn test_prepare_clears_error_and_shows_loading() {
        let mut board = RegionBoard::with_regions(["asset-list"]);
        board.show_error(&TargetId::new("asset-list"));

        RenderDispatcher::new(&mut board).prepare(&targets(&["asset-list"]));

        assert!(board.is_loading("asset-list"));
        assert!(!board.has_error("asset-list"));
    }

    #[test]
    fn test_success_renders_once_and_hides_loading() {
        let ids = targets(&["coins-list", "nfts-list"]);
        let mut board = RegionBoard::with_regions(["coins-list", "nfts-list"]);
        let mut calls = 0;

        let mut dispatcher = RenderDispatcher::new(&mut board);
        dispatcher.prepare(&ids);
        let status = dispatcher.dispatch(FetchOutcome::Success(json!({"coins": []})), &ids, |data| {
            calls += 1;
            assert_eq!(data, json!({"coins": []}));
            Ok(())
        });

        assert_eq!(status, DispatchStatus::Rendered);
        assert_eq!(calls, 1);
        assert!(!board.any_loading());
    }

    #[test]
    fn test_failure_never_renders() {
        let ids = targets(&["exchange-list"]);
        let mut board = RegionBoard::with_regions(["exchange-list"]);
        let mut rendered = false;

        let mut dispatcher = RenderDispatcher::new(&mut board);
        dispatcher.prepare(&ids);
        let status = dispatcher.dispatch(FetchOutcome::Failure("API limit reached".into()), &ids, |_| {
            rendered = true;
            Ok(())
        });

        assert_eq!(status, DispatchStatus::Failed);
        assert!(!rendered);
        assert!(!board.is_loading("exchange-list"));
        assert!(board.has_error("exchange-list"));
    }

    #[test]
    fn test_shape_error_shows_error_state() {
        let ids = targets(&["category-list"]);
        let mut board = RegionBoard::with_regions(["category-list"]);

        let status = RenderDispatcher::new(&mut board).dispatch(
            FetchOutcome::Success(json!("not a list")),
            &ids,
            |data| serde_json::from_value::<Vec<Value>>(data).map(|_| ()).map_err(Into::into),
        );

        assert_eq!(status, DispatchStatus::Failed);
        assert!(board.has_error("category-list"));
    }

    #[test]
    fn test_missing_region_is_a_no_op() {
        let mut board = RegionBoard::new();
        let ids = targets(&["gone"]);
        let mut dispatcher = RenderDispatcher::new(&mut board);
        dispatcher.prepare(&ids);
        let status = dispatcher.dispatch(FetchOutcome::Failure("x".into()), &ids, |_| Ok(()));
        assert_eq!(status, DispatchStatus::Failed);
        assert!(board.state(&TargetId::new("gone")).is_none());
    }
}
