use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::model::Settings;

mod app;
mod event_loop;
mod render;
mod watch;

pub use app::App;

#[derive(Clone, Debug)]
pub struct WatchOptions {
    pub files: Vec<PathBuf>,
    pub settings: Settings,
}

/// Runs the full-screen status strip until the user quits.
pub fn run_watch(opts: WatchOptions, runtime: tokio::runtime::Handle) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("watch requires an interactive terminal (TTY)");
    }

    let interval = Duration::from_millis(opts.settings.refresh_interval_ms);
    let mut app = App::load(&opts.files, &opts.settings, interval, runtime)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    app.shutdown();
    res
}
