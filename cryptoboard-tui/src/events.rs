//! Event types for the TUI event loop.

use cryptoboard_core::{FetchOutcome, FetchRequest};
use crossterm::event::KeyEvent;

/// A finished fetch, tagged with the page generation it was issued under.
#[derive(Debug, Clone)]
pub struct FetchCompletion {
    pub generation: u64,
    pub request: FetchRequest,
    pub outcome: FetchOutcome,
}

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    Fetched(Box<FetchCompletion>),
}
