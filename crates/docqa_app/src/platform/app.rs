use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use docqa_core::{update, AppState, Msg};
use docqa_logging::{docqa_info, docqa_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{InputAction, LineInput};
use super::ui;

/// Everything the UI loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Core(Msg),
    Help,
    Quit,
}

pub fn run_app() -> Result<()> {
    let config = AppConfig::load()?;
    docqa_logging::initialize(config.log_destination.clone(), config.log_level);
    docqa_info!("starting against {}", config.backend.base_url());

    let (tx, rx) = mpsc::channel::<AppEvent>();
    let runner =
        EffectRunner::new(config.backend, tx.clone()).context("failed to start the engine")?;

    spawn_input_reader(tx.clone())?;

    // Background tick to coalesce rendering of bursts of progress updates.
    let tick_tx = tx;
    thread::spawn(move || {
        let interval = Duration::from_millis(100);
        while tick_tx.send(AppEvent::Core(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut out = io::stdout();
    let mut state = dispatch(AppState::new(), Msg::Started, &runner);
    print_lines(&mut out, &first_frame(&mut state))?;

    while let Ok(event) = rx.recv() {
        match event {
            AppEvent::Core(Msg::Tick) => {
                if state.consume_dirty() {
                    print_lines(&mut out, &ui::render::render(&state.view()))?;
                }
            }
            AppEvent::Core(msg) => state = dispatch(state, msg, &runner),
            AppEvent::Help => print_lines(&mut out, &ui::render::help())?,
            AppEvent::Quit => break,
        }
    }

    docqa_info!("shutting down");
    Ok(())
}

/// Renders the current view unconditionally and marks it as shown.
fn first_frame(state: &mut AppState) -> Vec<String> {
    state.consume_dirty();
    ui::render::render(&state.view())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("docqa-input".to_string())
        .spawn(move || {
            let mut input = LineInput::new();
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        docqa_warn!("stdin read failed: {}", err);
                        break;
                    }
                };
                let events = match input.parse(&line) {
                    InputAction::Msgs(msgs) => msgs.into_iter().map(AppEvent::Core).collect(),
                    InputAction::Help => vec![AppEvent::Help],
                    InputAction::Quit => vec![AppEvent::Quit],
                };
                for event in events {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(AppEvent::Quit);
        })?;
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
