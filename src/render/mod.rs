// Terminal presentation surfaces

mod surfaces;
mod viewport;


pub use surfaces::{
    render_concurrency, render_controls, render_header, render_help, render_log, render_metrics,
    render_stats, render_store, render_tooltip, store_block, ControlsView,
};
pub use viewport::SceneViewport;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub store: Rect,
    pub controls: Rect,
    pub stats: Rect,
    pub concurrency: Rect,
    pub log: Rect,
    pub metrics: Rect,
    pub help: Rect,
}

/// Split the terminal into the viewer's panels
pub fn split_screen(area: Rect) -> ScreenAreas {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(10),   // main content
            Constraint::Length(2), // metrics bar
            Constraint::Length(1), // help
        ])
        .split(area);

    // Main content: store (left) | panels (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(outer[1]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // controls
            Constraint::Length(6), // stats
            Constraint::Length(4), // concurrency
            Constraint::Min(4),    // log
        ])
        .split(main_chunks[1]);

    ScreenAreas {
        header: outer[0],
        store: main_chunks[0],
        controls: right_chunks[0],
        stats: right_chunks[1],
        concurrency: right_chunks[2],
        log: right_chunks[3],
        metrics: outer[2],
        help: outer[3],
    }
}
