//! Loading and error placeholders for page regions.

use cryptoboard_client::RegionBoard;
use cryptoboard_core::TargetId;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme::Palette;

/// What a region should display right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStatus {
    Loading,
    Failed,
    Ready,
}

impl RegionStatus {
    /// Error wins over loading; an unknown region is treated as ready.
    pub fn of(board: &RegionBoard, id: &str) -> Self {
        match board.state(&TargetId::new(id)) {
            Some(state) if state.error => RegionStatus::Failed,
            Some(state) if state.loading => RegionStatus::Loading,
            _ => RegionStatus::Ready,
        }
    }

    /// Placeholder for a region that is not ready, if any.
    pub fn indicator(&self, title: &str, palette: &Palette) -> Option<StatusIndicator> {
        match self {
            RegionStatus::Loading => Some(StatusIndicator {
                title: title.to_string(),
                status: "Loading...".to_string(),
                style: Style::default().fg(palette.loading),
            }),
            RegionStatus::Failed => Some(StatusIndicator {
                title: title.to_string(),
                status: "Failed to load data. The API limit may have been reached; try again shortly."
                    .to_string(),
                style: Style::default().fg(palette.error),
            }),
            RegionStatus::Ready => None,
        }
    }
}

pub struct StatusIndicator {
    pub title: String,
    pub status: String,
    pub style: Style,
}

impl StatusIndicator {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(self.status.clone())
            .style(self.style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(self.title.as_str())
                    .borders(Borders::ALL),
            );
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoboard_client::{RegionSurface, RenderDispatcher};
    use std::collections::BTreeSet;

    #[test]
    fn test_region_status_follows_board() {
        let mut board = RegionBoard::with_regions(["asset-list"]);
        let targets = BTreeSet::from([TargetId::new("asset-list")]);
        assert_eq!(RegionStatus::of(&board, "asset-list"), RegionStatus::Ready);

        RenderDispatcher::new(&mut board).prepare(&targets);
        assert_eq!(RegionStatus::of(&board, "asset-list"), RegionStatus::Loading);

        board.hide_loading(&TargetId::new("asset-list"));
        board.show_error(&TargetId::new("asset-list"));
        assert_eq!(RegionStatus::of(&board, "asset-list"), RegionStatus::Failed);
        assert_eq!(RegionStatus::of(&board, "missing"), RegionStatus::Ready);
    }
}
