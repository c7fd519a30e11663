//! Terminal ownership: raw mode and the alternate screen for as long as
//! the board runs, restored on exit, drop, or panic.

use std::io::{self, Stdout, Write};

use color_eyre::eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    /// Take over the terminal.
    pub fn start() -> Result<Self> {
        let mut tui = Self {
            terminal: Terminal::new(CrosstermBackend::new(io::stdout()))?,
            active: false,
        };
        terminal::enable_raw_mode()?;
        tui.active = true;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide, SetTitle("rollcall"))?;
        tui.terminal.clear()?;
        Ok(tui)
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn stop(&mut self) {
        if std::mem::take(&mut self.active) {
            restore();
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Best effort: every step runs even if an earlier one fails.
fn restore() {
    let mut out = io::stdout();
    let _ = execute!(out, LeaveAlternateScreen, cursor::Show);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Route panics and eyre reports through color-eyre, restoring the
/// terminal first so the report is readable.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));
    Ok(())
}
