use std::io::{self, Stdout};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use client_logging::{client_error, client_info};
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::Terminal;
use skiptrace_core::Msg;

use super::dispatch::Dispatcher;
use super::effects::EffectRunner;
use super::ui::keys::{self, KeyAction};
use super::ui::{render, UiState};
use crate::config::AppConfig;

const INPUT_POLL: Duration = Duration::from_millis(50);

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn run_tui(config: &AppConfig, initial_file: Option<&Path>) -> anyhow::Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(config.client_config(), msg_tx)
        .context("failed to start the job client")?;
    let mut dispatcher = Dispatcher::new(runner, msg_rx);

    if let Some(path) = initial_file {
        dispatcher.dispatch(Msg::PathInputChanged(path.display().to_string()));
        dispatcher.dispatch(Msg::PathSubmitted);
    }

    let mut guard = TerminalGuard::enter()?;
    client_info!("Interactive session started");
    let result = event_loop(&mut guard.terminal, &mut dispatcher);
    if let Err(err) = &result {
        client_error!("Interactive session failed: {:#}", err);
    }
    result
}

fn event_loop(terminal: &mut Tui, dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    let mut ui = UiState::default();
    let mut redraw = true;

    loop {
        dispatcher.drain_pending();
        if dispatcher.take_dirty() || redraw {
            let view = dispatcher.view();
            ui.clamp(view.rows.len());
            terminal.draw(|frame| render::draw(frame, &view, &mut ui))?;
            redraw = false;
        }

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let view = dispatcher.view();
                match keys::map_key(key, &view) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Dispatch(msg) => dispatcher.dispatch(msg),
                    KeyAction::Scroll(delta) => {
                        ui.scroll(delta, view.rows.len());
                        redraw = true;
                    }
                    KeyAction::Ignore => {}
                }
            }
            Event::Paste(text) => {
                if let Some(msg) = keys::map_paste(text, &dispatcher.view()) {
                    dispatcher.dispatch(msg);
                }
            }
            Event::Resize(_, _) => redraw = true,
            _ => {}
        }
    }
}

/// Raw mode and the alternate screen for as long as the guard lives.
struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter the alternate screen");
        }

        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous_hook(info);
        }));

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal();
                Err(err).context("failed to set up the terminal")
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
}
