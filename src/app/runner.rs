use crate::app::{App, AppAction};
use crate::config::ViewerConfig;
use crate::control::{AccidentAction, AccidentClient, AccidentError};
use crate::transport;
use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

type AccidentResult = (AccidentAction, Result<String, AccidentError>);

/// Run the viewer until the user quits.
///
/// Transport events, frame ticks, terminal input and accident results are
/// handled one at a time on this task, each to completion.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &ViewerConfig,
    initial_count: u32,
) -> Result<()> {
    let (transport, mut transport_rx) = transport::spawn(
        config.server.ws_url.clone(),
        Duration::from_millis(config.server.reconnect_delay_ms),
    );
    let accident_client = AccidentClient::new(&config.server.api_url);
    let (accident_tx, mut accident_rx) = mpsc::unbounded_channel::<AccidentResult>();

    let mut app = App::new(config, initial_count);

    let mut frames =
        tokio::time::interval(Duration::from_millis(config.animation.frame_interval_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut input = EventStream::new();

    info!(ws_url = %config.server.ws_url, "Viewer started");

    loop {
        tokio::select! {
            // Inbound transport events
            Some(event) = transport_rx.recv() => {
                app.on_transport_event(event);
            }

            // Animation frame: step, then draw
            _ = frames.tick() => {
                app.on_frame();
                terminal
                    .draw(|f| app.draw(f))
                    .context("Failed to draw frame")?;
            }

            // Terminal input
            maybe_event = input.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        match app.on_key(key) {
                            Some(AppAction::Start(request)) => {
                                match transport.send(request.command()) {
                                    Ok(()) => app.on_start_sent(&request),
                                    Err(e) => app.on_start_failed(e),
                                }
                            }
                            Some(AppAction::ToggleAccident(action)) => {
                                let client = accident_client.clone();
                                let tx = accident_tx.clone();
                                tokio::spawn(async move {
                                    let result = client.send(action).await;
                                    let _ = tx.send((action, result));
                                });
                            }
                            None => {}
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => app.on_mouse(mouse),
                    Some(Ok(Event::Resize(_, _))) => app.on_resize(),
                    Some(Ok(_)) => {
                        // Focus and paste events
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Terminal input error");
                        transport.shutdown();
                        return Err(e).context("Failed to read terminal input");
                    }
                    None => break,
                }
            }

            // Accident request outcomes
            Some((action, result)) = accident_rx.recv() => {
                app.on_accident_result(action, result);
            }
        }

        if app.should_quit() {
            break;
        }
    }

    info!("Viewer shutting down");
    transport.shutdown();
    Ok(())
}
