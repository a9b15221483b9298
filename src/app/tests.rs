use super::*;
use crate::layout::Point;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::json;

fn app() -> App {
    App::new(&ViewerConfig::default(), 10)
}

fn connected_app() -> App {
    let mut app = app();
    app.on_transport_event(TransportEvent::Connected);
    app
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn move_to(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Moved,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn state_message() -> TransportEvent {
    TransportEvent::Message(
        json!({
            "customers": [
                {"id": 1, "current_position": {"x": 250, "y": 200}, "desired_product": {"category": "Молочный"}},
                {"id": 2, "current_position": {"x": 600, "y": 500}, "desired_product": {"category": "мяса"}}
            ],
            "customer_categories": {"Молочный": 1, "мяса": 1},
            "average_purchase_count": 2.5,
            "store_load": 0.75,
            "goroutine_count": 12,
            "channel_count": 3,
            "technical_logs": ["first entry", "second entry"]
        })
        .to_string(),
    )
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

fn draw(app: &mut App) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();
    terminal
}

#[test]
fn test_digits_and_backspace_edit_count() {
    let mut app = app();
    assert_eq!(app.count_input(), "10");

    app.on_key(key(KeyCode::Backspace));
    app.on_key(key(KeyCode::Backspace));
    app.on_key(key(KeyCode::Char('2')));
    app.on_key(key(KeyCode::Char('5')));

    assert_eq!(app.count_input(), "25");
}

#[test]
fn test_start_rejected_when_not_connected() {
    let mut app = app();

    assert_eq!(app.on_key(key(KeyCode::Enter)), None);

    let notice = app.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("not established"));
}

#[test]
fn test_start_rejected_for_invalid_count() {
    let mut app = connected_app();
    app.on_key(key(KeyCode::Backspace));
    app.on_key(key(KeyCode::Backspace));
    app.on_key(key(KeyCode::Char('0')));

    assert_eq!(app.on_key(key(KeyCode::Enter)), None);
    assert!(app.notice().unwrap().text.contains("between 1 and 10000"));

    app.on_key(key(KeyCode::Backspace));
    assert_eq!(app.on_key(key(KeyCode::Enter)), None);
    assert!(app.notice().unwrap().text.contains("valid customer count"));
}

#[test]
fn test_start_with_valid_count() {
    let mut app = connected_app();

    assert_eq!(
        app.on_key(key(KeyCode::Enter)),
        Some(AppAction::Start(StartRequest { customer_count: 10 }))
    );
}

#[test]
fn test_start_sent_resets_previous_run() {
    let mut app = connected_app();
    app.on_transport_event(state_message());
    assert_eq!(app.engine().tracked_count(), 2);

    app.on_start_sent(&StartRequest { customer_count: 5 });

    assert_eq!(app.engine().tracked_count(), 0);
    assert!(app.engine().latest().is_none());
    assert!(app.engine().proxies().is_empty());
    assert_eq!(app.notice().unwrap().level, NoticeLevel::Info);
}

#[test]
fn test_start_failure_shows_notice() {
    let mut app = connected_app();
    app.on_transport_event(state_message());

    app.on_start_failed(TransportError::ChannelClosed);

    // Nothing was sent, so the current run stays on screen
    assert_eq!(app.engine().tracked_count(), 2);
    assert_eq!(app.notice().unwrap().level, NoticeLevel::Error);
}

#[test]
fn test_quit_keys() {
    for event in [
        key(KeyCode::Char('q')),
        key(KeyCode::Esc),
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
    ] {
        let mut app = app();
        app.on_key(event);
        assert!(app.should_quit());
    }
}

#[test]
fn test_accident_toggle_round_trip() {
    let mut app = app();

    assert_eq!(
        app.on_key(key(KeyCode::Char('a'))),
        Some(AppAction::ToggleAccident(AccidentAction::Start))
    );
    // Ignored while the request is in flight
    assert_eq!(app.on_key(key(KeyCode::Char('a'))), None);

    app.on_accident_result(AccidentAction::Start, Ok("Аварии запущены".to_string()));
    assert_eq!(app.accidents().label(), "Stop accidents");
    assert_eq!(app.notice().unwrap().text, "Аварии запущены");

    assert_eq!(
        app.on_key(key(KeyCode::Char('a'))),
        Some(AppAction::ToggleAccident(AccidentAction::Stop))
    );
    app.on_accident_result(
        AccidentAction::Stop,
        Err(AccidentError::Request("connection refused".to_string())),
    );
    assert_eq!(app.accidents().label(), "Stop accidents");
    assert_eq!(app.notice().unwrap().level, NoticeLevel::Error);
}

#[test]
fn test_connection_state_follows_transport() {
    let mut app = app();
    assert_eq!(app.connection(), ConnectionState::Connecting);

    app.on_transport_event(TransportEvent::Connected);
    assert_eq!(app.connection(), ConnectionState::Open);

    app.on_transport_event(TransportEvent::Disconnected("reset by peer".to_string()));
    assert_eq!(app.connection(), ConnectionState::Closed);
    assert_eq!(app.notice().unwrap().text, "Disconnected: reset by peer");
}

#[test]
fn test_bad_message_does_not_disturb_app() {
    let mut app = connected_app();
    app.on_transport_event(state_message());

    app.on_transport_event(TransportEvent::Message("garbage".to_string()));
    app.on_transport_event(TransportEvent::Message(r#"{"customers": null}"#.to_string()));

    assert_eq!(app.engine().tracked_count(), 2);
    assert_eq!(app.engine().metrics.get_snapshot().decode_failures, 1);
}

#[test]
fn test_draw_shows_surfaces() {
    let mut app = connected_app();
    app.on_transport_event(state_message());

    let terminal = draw(&mut app);
    let text = buffer_text(&terminal);

    assert!(text.contains("LIVE"));
    assert!(text.contains("Store (2 customers)"));
    assert!(text.contains("Молочный отдел"));
    assert!(text.contains("Avg purchases: 2.50"));
    assert!(text.contains("Store load: 0.75"));
    assert!(text.contains("Active customers: 2"));
    assert!(text.contains("Goroutines: 12"));
    assert!(text.contains("Channels: 3"));
    assert!(text.contains("second entry"));
    assert!(text.contains("Start accidents"));
}

#[test]
fn test_draw_before_first_snapshot() {
    let mut app = app();

    let text = buffer_text(&draw(&mut app));

    assert!(text.contains("CONNECTING"));
    assert!(text.contains("Waiting for simulation data"));
}

#[test]
fn test_mouse_ignored_before_first_draw() {
    let mut app = connected_app();
    app.on_transport_event(state_message());

    app.on_mouse(move_to(10, 10));
    assert!(!app.hover().is_visible());
}

#[test]
fn test_hover_shows_and_hides_tooltip() {
    let mut app = connected_app();
    app.on_transport_event(state_message());
    let _ = draw(&mut app);

    let viewport = app.viewport.unwrap();
    let (column, row) = viewport.to_cell(Point::new(250.0, 200.0)).unwrap();

    app.on_mouse(move_to(column, row));
    let hovered = app.hover().current().unwrap();
    assert_eq!(hovered.tooltip.customer_id, 1);

    let text = buffer_text(&draw(&mut app));
    assert!(text.contains("ID: 1"));
    assert!(text.contains("Dept: Молочный"));

    // Off the canvas (the right-hand panels)
    app.on_mouse(move_to(110, 10));
    assert!(!app.hover().is_visible());

    app.on_mouse(move_to(column, row));
    assert!(app.hover().is_visible());

    // Empty floor near the top-left corner
    let inner = viewport.inner();
    app.on_mouse(move_to(inner.x, inner.y));
    assert!(!app.hover().is_visible());
}

#[test]
fn test_tooltip_survives_terminal_shrink() {
    let mut app = connected_app();
    app.on_transport_event(state_message());
    let _ = draw(&mut app);

    let (column, row) = app
        .viewport
        .unwrap()
        .to_cell(Point::new(600.0, 500.0))
        .unwrap();
    app.on_mouse(move_to(column, row));
    assert_eq!(app.hover().current().unwrap().tooltip.customer_id, 2);

    // Smaller frame before any resize event arrives: pointer cell is stale
    let mut small = Terminal::new(TestBackend::new(60, 16)).unwrap();
    small.draw(|f| app.draw(f)).unwrap();
    assert!(buffer_text(&small).contains("ID: 2"));
}

#[test]
fn test_resize_hides_tooltip() {
    let mut app = connected_app();
    app.on_transport_event(state_message());
    let _ = draw(&mut app);

    let (column, row) = app
        .viewport
        .unwrap()
        .to_cell(Point::new(250.0, 200.0))
        .unwrap();
    app.on_mouse(move_to(column, row));
    assert!(app.hover().is_visible());

    app.on_resize();
    assert!(!app.hover().is_visible());
    assert!(app.viewport.is_none());

    let mut small = Terminal::new(TestBackend::new(60, 16)).unwrap();
    small.draw(|f| app.draw(f)).unwrap();
    assert!(!buffer_text(&small).contains("ID: 1"));
}
