// Viewer application: event handling and frame composition

mod input;
mod runner;

#[cfg(test)]
mod tests;

pub use input::{CountInput, StartRequest, StartRequestError};
pub use runner::run;

use crate::config::ViewerConfig;
use crate::control::{AccidentAction, AccidentError, AccidentToggle};
use crate::interaction::HoverState;
use crate::render::{self, ControlsView, SceneViewport};
use crate::state::{MessageOutcome, ViewerEngine};
use crate::transport::{ConnectionState, TransportError, TransportEvent};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use tracing::{info, warn};

/// Message shown in the controls panel
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: NoticeLevel::Error,
        }
    }
}

/// Work the event loop performs on behalf of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Send the start command over the transport
    Start(StartRequest),
    /// Call the accident endpoint
    ToggleAccident(AccidentAction),
}

/// Viewer application state
pub struct App {
    engine: ViewerEngine,
    count: CountInput,
    accidents: AccidentToggle,
    hover: HoverState,
    notice: Option<Notice>,
    connection: ConnectionState,

    /// Store canvas placement from the last draw, for pointer mapping
    viewport: Option<SceneViewport>,

    max_customers: u32,
    log_tail: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: &ViewerConfig, initial_count: u32) -> Self {
        Self {
            engine: ViewerEngine::new(config),
            count: CountInput::new(initial_count),
            accidents: AccidentToggle::new(),
            hover: HoverState::new(),
            notice: None,
            connection: ConnectionState::Connecting,
            viewport: None,
            max_customers: config.simulation.max_customers,
            log_tail: config.presentation.log_tail,
            should_quit: false,
        }
    }

    pub fn engine(&self) -> &ViewerEngine {
        &self.engine
    }

    pub fn count_input(&self) -> &str {
        self.count.value()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub fn accidents(&self) -> &AccidentToggle {
        &self.accidents
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle one event from the transport task
    pub fn on_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                self.connection = ConnectionState::Open;
                self.notice = Some(Notice::info("Connected to simulation server"));
            }
            TransportEvent::Disconnected(reason) => {
                if self.connection == ConnectionState::Open {
                    warn!(reason = %reason, "Lost connection to simulation server");
                    self.notice = Some(Notice::error(format!("Disconnected: {}", reason)));
                }
                self.connection = ConnectionState::Closed;
            }
            TransportEvent::Message(text) => {
                if let MessageOutcome::Applied(report) = self.engine.handle_message(&text) {
                    if report.skipped > 0 {
                        warn!(skipped = report.skipped, "Snapshot contained invalid customer records");
                    }
                }
            }
        }
    }

    /// One animation frame
    pub fn on_frame(&mut self) -> usize {
        self.engine.frame()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.count.push(c);
                None
            }
            KeyCode::Backspace => {
                self.count.pop();
                None
            }
            KeyCode::Enter => self.submit_start(),
            KeyCode::Char('a') => match self.accidents.begin() {
                Some(action) => {
                    info!(action = %action, "Toggling accidents");
                    Some(AppAction::ToggleAccident(action))
                }
                None => None,
            },
            _ => None,
        }
    }

    /// Validate the count field and check the connection before sending
    fn submit_start(&mut self) -> Option<AppAction> {
        let request = match StartRequest::parse(self.count.value(), self.max_customers) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Start request rejected");
                self.notice = Some(Notice::error(e.to_string()));
                return None;
            }
        };

        if self.connection != ConnectionState::Open {
            let err = TransportError::NotConnected(self.connection);
            warn!(error = %err, "Start request rejected");
            self.notice = Some(Notice::error(
                "Connection to the server is not established. Wait until it is LIVE.",
            ));
            return None;
        }

        Some(AppAction::Start(request))
    }

    /// Start command handed to the transport: tear down the previous run
    pub fn on_start_sent(&mut self, request: &StartRequest) {
        info!(customer_count = request.customer_count, "Start command sent");
        self.engine.reset();
        self.hover.hide();
        self.notice = Some(Notice::info(format!(
            "Simulation started with {} customers",
            request.customer_count
        )));
    }

    pub fn on_start_failed(&mut self, error: TransportError) {
        warn!(error = %error, "Failed to send start command");
        self.notice = Some(Notice::error(error.to_string()));
    }

    pub fn on_accident_result(&mut self, action: AccidentAction, result: Result<String, AccidentError>) {
        self.accidents.finish(action, &result);
        self.notice = Some(match result {
            Ok(message) => Notice::info(message),
            Err(e) => {
                warn!(action = %action, error = %e, "Accident toggle failed");
                Notice::error(e.to_string())
            }
        });
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let pointer = self
                    .viewport
                    .and_then(|viewport| viewport.to_scene(mouse.column, mouse.row));

                match pointer {
                    Some(pointer) => {
                        let hit = self.engine.hover(pointer);
                        self.hover.pointer_moved(hit, mouse.column, mouse.row);
                    }
                    None => self.hover.hide(),
                }
            }
            _ => {}
        }
    }

    /// Terminal resized: the pointer cell and canvas placement are stale
    pub fn on_resize(&mut self) {
        self.hover.hide();
        self.viewport = None;
    }

    /// Compose one frame
    pub fn draw(&mut self, f: &mut Frame) {
        let areas = render::split_screen(f.area());

        let proxies = self.engine.proxies();
        let viewport = SceneViewport::new(
            render::store_block(proxies.len()).inner(areas.store),
            self.engine.layout(),
        );
        self.viewport = Some(viewport);

        let latest = self.engine.latest();

        render::render_header(f, areas.header, self.connection);
        render::render_store(f, areas.store, self.engine.layout(), proxies, &viewport);
        render::render_controls(
            f,
            areas.controls,
            &ControlsView {
                count_input: self.count.value(),
                accident_label: self.accidents.label(),
                accident_pending: self.accidents.in_flight().is_some(),
                notice: self.notice.as_ref(),
            },
        );
        render::render_stats(f, areas.stats, latest);
        render::render_concurrency(f, areas.concurrency, latest);
        render::render_log(f, areas.log, latest, self.log_tail);
        render::render_metrics(
            f,
            areas.metrics,
            &self.engine.metrics.get_snapshot(),
            self.engine.tracked_count(),
        );
        render::render_help(f, areas.help);

        if let Some(hovered) = self.hover.current() {
            render::render_tooltip(f, areas.store, hovered);
        }
    }
}
