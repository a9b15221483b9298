use crate::app::{Notice, NoticeLevel};
use crate::interaction::Hovered;
use crate::layout::{Point, StoreLayout};
use crate::render::viewport::SceneViewport;
use crate::snapshot::Snapshot;
use crate::state::{MetricsSnapshot, SceneProxies};
use crate::transport::ConnectionState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span, Text},
    widgets::{
        canvas::{Canvas, Rectangle},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

fn label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn waiting(title: &str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        "Waiting for simulation data",
        Style::default().fg(Color::DarkGray),
    ))
    .block(panel(title))
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

pub fn render_header(f: &mut Frame, area: Rect, connection: ConnectionState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(20)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("◫ ", Style::default().fg(Color::Magenta)),
        Span::styled(
            "Store",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" Viewer", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Color::DarkGray));

    let color = match connection {
        ConnectionState::Open => Color::Green,
        ConnectionState::Connecting => Color::Yellow,
        ConnectionState::Closed => Color::Red,
    };
    let status = Paragraph::new(Line::from(Span::styled(
        format!("● {}", connection.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Right)
    .block(Block::default().borders(Borders::BOTTOM).border_style(Color::DarkGray));

    f.render_widget(title, chunks[0]);
    f.render_widget(status, chunks[1]);
}

/// Border of the store panel; its inner area is the scene canvas
pub fn store_block(customers: usize) -> Block<'static> {
    Block::default()
        .title(format!(" Store ({} customers) ", customers))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
}

/// Spatial surface: department backdrop, exit marker, one marker per proxy
pub fn render_store(
    f: &mut Frame,
    area: Rect,
    layout: &StoreLayout,
    proxies: &SceneProxies,
    viewport: &SceneViewport,
) {
    let canvas = Canvas::default()
        .block(store_block(proxies.len()))
        .marker(Marker::Braille)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            for zone in &layout.zones {
                let (x, top) = viewport.to_canvas(Point::new(zone.x, zone.y));
                ctx.draw(&Rectangle {
                    x,
                    y: top - zone.height,
                    width: zone.width,
                    height: zone.height,
                    color: Color::Gray,
                });
                ctx.print(
                    x,
                    top + 10.0,
                    Span::styled(zone.name.clone(), Style::default().fg(Color::White)),
                );
            }

            let (exit_x, exit_y) = viewport.to_canvas(layout.fallback());
            ctx.print(
                exit_x - 10.0,
                exit_y,
                Span::styled(
                    "⇲ EXIT",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            );

            // Customers on top of the backdrop
            ctx.layer();
            for (_, position) in proxies.iter() {
                let (x, y) = viewport.to_canvas(position);
                ctx.print(x, y, Span::styled("●", Style::default().fg(Color::Cyan)));
            }
        });

    f.render_widget(canvas, area);
}

/// Aggregate stats: purchases, load, active customers, per-category counts
pub fn render_stats(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    let Some(snapshot) = snapshot else {
        f.render_widget(waiting("Stats"), area);
        return;
    };

    let value = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Avg purchases: ", label_style()),
            Span::styled(format!("{:.2}", snapshot.average_purchase_count), value),
        ]),
        Line::from(vec![
            Span::styled("Store load: ", label_style()),
            Span::styled(format!("{:.2}", snapshot.store_load), value),
        ]),
        Line::from(vec![
            Span::styled("Active customers: ", label_style()),
            Span::styled(snapshot.customer_count().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("By category: ", label_style()),
            Span::styled(snapshot.category_summary(), Style::default().fg(Color::Yellow)),
        ]),
    ];

    let stats = Paragraph::new(lines)
        .block(panel("Stats"))
        .wrap(Wrap { trim: false });
    f.render_widget(stats, area);
}

/// Concurrency metrics reported by the server
pub fn render_concurrency(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    let Some(snapshot) = snapshot else {
        f.render_widget(waiting("Concurrency"), area);
        return;
    };

    let value = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Goroutines: ", label_style()),
            Span::styled(snapshot.goroutine_count.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Channels: ", label_style()),
            Span::styled(snapshot.channel_count.to_string(), value),
        ]),
    ];

    f.render_widget(Paragraph::new(lines).block(panel("Concurrency")), area);
}

/// Most recent `tail` technical log lines, oldest first
pub fn render_log(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, tail: usize) {
    let title = format!("Log (last {})", tail);
    let Some(snapshot) = snapshot else {
        f.render_widget(waiting(&title), area);
        return;
    };

    let entries = snapshot.log_tail(tail);
    let text = if entries.is_empty() {
        Text::from(Span::styled("No log entries", Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(
            entries
                .iter()
                .map(|entry| Line::from(Span::styled(entry.clone(), Style::default().fg(Color::White))))
                .collect::<Vec<_>>(),
        )
    };

    let log = Paragraph::new(text)
        .block(panel(&title))
        .wrap(Wrap { trim: false });
    f.render_widget(log, area);
}

/// What the controls panel shows
pub struct ControlsView<'a> {
    pub count_input: &'a str,
    pub accident_label: &'a str,
    pub accident_pending: bool,
    pub notice: Option<&'a Notice>,
}

pub fn render_controls(f: &mut Frame, area: Rect, view: &ControlsView<'_>) {
    let accident_style = if view.accident_pending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Customers: ", label_style()),
            Span::styled(
                format!("[{}▏]", view.count_input),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" start", label_style()),
        ]),
        Line::from(vec![
            Span::styled("a", Style::default().fg(Color::Yellow)),
            Span::styled(" ", label_style()),
            Span::styled(view.accident_label.to_string(), accident_style),
        ]),
    ];

    if let Some(notice) = view.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        lines.push(Line::from(Span::styled(
            notice.text.clone(),
            Style::default().fg(color),
        )));
    }

    let controls = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Controls ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(controls, area);
}

/// Viewer-side counters
pub fn render_metrics(f: &mut Frame, area: Rect, metrics: &MetricsSnapshot, tracked: usize) {
    let line = Line::from(vec![
        Span::styled(" ⚡ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{:.1}", metrics.snapshot_rate),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" snap/s", label_style()),
        Span::styled("  │  ", label_style()),
        Span::styled("◈ ", Style::default().fg(Color::Magenta)),
        Span::styled(
            tracked.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" tracked", label_style()),
        Span::styled("  │  ", label_style()),
        Span::styled("∑ ", Style::default().fg(Color::White)),
        Span::styled(metrics.snapshots_applied.to_string(), Style::default().fg(Color::White)),
        Span::styled(" snapshots", label_style()),
        Span::styled("  │  ", label_style()),
        Span::styled("✗ ", Style::default().fg(Color::Red)),
        Span::styled(
            (metrics.decode_failures + metrics.records_skipped).to_string(),
            Style::default().fg(Color::Red),
        ),
        Span::styled(" dropped", label_style()),
    ]);

    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(bar, area);
}

/// Tooltip popup next to the pointer, kept inside `bounds`
pub fn render_tooltip(f: &mut Frame, bounds: Rect, hovered: &Hovered) {
    let bounds = bounds.intersection(f.area());
    if bounds.is_empty() {
        return;
    }

    let width = (hovered.tooltip.width() + 2).min(bounds.width);
    let height = 4u16.min(bounds.height);

    // Right of and below the pointer, flipped above it near the bottom edge.
    // The pointer cell may be stale after a resize.
    let mut y = hovered.row.saturating_add(1);
    if y.saturating_add(height) > bounds.bottom() {
        y = hovered.row.saturating_sub(height);
    }
    let x = hovered
        .column
        .saturating_add(1)
        .min(bounds.right() - width)
        .max(bounds.x);
    let y = y.min(bounds.bottom() - height).max(bounds.y);
    let popup = Rect::new(x, y, width, height);

    let lines: Vec<Line> = hovered
        .tooltip
        .lines()
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::White))))
        .collect();

    let tooltip = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(tooltip, popup);
}

pub fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(vec![
        Span::styled(" 0-9", Style::default().fg(Color::Yellow)),
        Span::styled(" customers  ", label_style()),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" start  ", label_style()),
        Span::styled("a", Style::default().fg(Color::Yellow)),
        Span::styled(" accidents  ", label_style()),
        Span::styled("mouse", Style::default().fg(Color::Yellow)),
        Span::styled(" inspect  ", label_style()),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(" quit", label_style()),
    ]));
    f.render_widget(help, area);
}
