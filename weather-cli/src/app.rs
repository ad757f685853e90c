use std::{thread, time::Duration};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use weather_core::{Action, Controller, ControllerSettings, Services, WeatherView};

use crate::{tui::Screen, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// State of the full-screen view: the search box and the last snapshot from the controller.
pub struct App {
    pub input: String,
    pub view: WeatherView,
    running: bool,
}

impl App {
    pub fn new(view: WeatherView) -> Self {
        Self { input: String::new(), view, running: true }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply a terminal event to the local state; returns the action to forward, if any.
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.running = false;
                None
            }
            KeyCode::Char('c') if ctrl => {
                self.running = false;
                None
            }
            KeyCode::Char('g') if ctrl => Some(Action::Geolocate),
            KeyCode::F(2) => Some(Action::Geolocate),
            KeyCode::Tab => Some(Action::ToggleUnits),
            KeyCode::Enter => Some(Action::Search(self.input.clone())),
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }
}

/// Drive the controller and the terminal until the user quits.
pub async fn run(services: Services, settings: ControllerSettings) -> Result<()> {
    let controller = Controller::new(services, settings);
    let mut view_rx = controller.subscribe();
    let (action_tx, action_rx) = mpsc::channel(16);
    let controller_task = tokio::spawn(controller.run(action_rx));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_thread = thread::spawn(move || read_events(event_tx));

    let mut terminal = Screen::enter()?;
    let mut app = App::new(view_rx.borrow().clone());
    terminal.draw(|frame| ui::render(frame, &app))?;

    while app.is_running() {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                if let Some(action) = app.handle_event(event) {
                    debug!(?action, "user action");
                    if action_tx.send(action).await.is_err() {
                        warn!("controller stopped");
                        break;
                    }
                }
            }
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                app.view = view_rx.borrow_and_update().clone();
            }
        }
        terminal.draw(|frame| ui::render(frame, &app))?;
    }

    drop(action_tx);
    drop(event_rx);
    if let Err(err) = controller_task.await {
        warn!(error = %err, "controller task failed");
    }
    if input_thread.join().is_err() {
        warn!("input thread panicked");
    }

    Ok(())
}

fn read_events(tx: mpsc::UnboundedSender<Event>) {
    while !tx.is_closed() {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Press => {}
                Ok(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to read terminal event");
                    return;
                }
            },
            Ok(false) => {}
            Err(err) => {
                warn!(error = %err, "failed to poll terminal events");
                return;
            }
        }
    }
}
