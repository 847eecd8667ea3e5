//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over input, animation ticks, debounced
//!   resizes, item refreshes and the polling timer.
//! - Route input to `MainView` and execute the returned `Effect`s.
//! - Render only when `App` marks itself dirty.
//!
//! Ticking strategy: a fast interval (100 ms) only while something animates
//! (floating label, loading indicator); a long interval (5 s) when idle.
use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use navtree_engine::{RefreshCoordinator, RemoteItemSource, Sidebar};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, Instant as TokioInstant, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg};
use crate::ui::main_component::MainView;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
///
/// Mouse moves are dropped: nothing in the sidebar reacts to hover.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    std::thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(16)) {
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved) {
                            continue;
                        }
                        if let Err(e) = sender.blocking_send(event) {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                },
                Err(e) => {
                    warn!("Failed to poll for events: {}", e);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    let animated = app.sidebar.config().animations;
    app.search.sync_label(animated);
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn polling_interval(app: &App) -> Option<Interval> {
    let (endpoint, period) = app.sidebar.config().polling()?;
    info!(endpoint = %endpoint, ?period, "sidebar polling started");
    let mut interval = time::interval_at(TokioInstant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(interval)
}

/// Execute effects. Returns `true` when the app should exit.
fn process_effects(
    app: &mut App,
    effects: Vec<Effect>,
    refresh: &mut RefreshCoordinator,
    polling: &mut Option<Interval>,
) -> bool {
    let mut quit = false;
    let mut queue = VecDeque::from(effects);
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::FetchItems { url, origin } => match RemoteItemSource::new(url) {
                Ok(source) => {
                    debug!(url = %source.url(), ?origin, "fetching sidebar items");
                    refresh.start(origin, async move { source.fetch().await });
                }
                // Surfaces as a data-error like any other failed fetch.
                Err(error) => queue.extend(app.apply_refresh(origin, Err(error))),
            },
            Effect::RestartPolling => {
                if polling.take().is_some() {
                    info!("sidebar polling stopped");
                }
                *polling = polling_interval(app);
            }
            Effect::Quit => quit = true,
        }
    }
    quit
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the input
/// thread, runs the event loop and performs cleanup on exit.
pub async fn run_app(sidebar: Sidebar) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let (mut refresh, mut refresh_outcomes) = RefreshCoordinator::new();
    let mut polling: Option<Interval> = None;

    let mut app = App::new(sidebar);
    let viewport = crossterm::terminal::size().ok().map(|(columns, _)| columns);
    let effects = app.attach(viewport);

    let mut terminal = setup_terminal()?;
    let mut should_quit = process_effects(&mut app, effects, &mut refresh, &mut polling);

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    while !should_quit {
        let target_interval = if app.is_animating() { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let resize_deadline = app.resize_deadline();

        let effects = tokio::select! {
            maybe_event = input_receiver.recv() => {
                match maybe_event {
                    Some(Event::Key(key)) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    Some(event) => handle_input_event(&mut app, &mut main_view, event),
                    // Input channel closed; shut down cleanly.
                    None => break,
                }
            }
            _ = ticker.tick() => main_view.handle_message(&mut app, Msg::Tick),
            _ = time::sleep_until(resize_deadline.map(TokioInstant::from_std).unwrap_or_else(TokioInstant::now)), if resize_deadline.is_some() => {
                main_view.handle_message(&mut app, Msg::ResizeSettled)
            }
            Some(outcome) = refresh_outcomes.recv() => {
                match refresh.accept(outcome) {
                    Some((origin, result)) => app.apply_refresh(origin, result),
                    None => Vec::new(),
                }
            }
            _ = async {
                match polling.as_mut() {
                    Some(interval) => { interval.tick().await; }
                    None => std::future::pending::<()>().await,
                }
            }, if polling.is_some() => main_view.handle_message(&mut app, Msg::Poll),
            _ = signal::ctrl_c() => break,
        };

        should_quit = process_effects(&mut app, effects, &mut refresh, &mut polling);
        if app.take_dirty() {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    refresh.cancel();
    app.detach();
    cleanup_terminal(&mut terminal)?;
    Ok(())
}
