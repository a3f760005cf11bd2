use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::App;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut dirty = true;
    loop {
        app.apply_file_events();
        dirty |= app.take_repaints();

        if dirty {
            terminal
                .draw(|f| super::render::draw(f, app))
                .context("draw")?;
            dirty = false;
        }
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                Event::Resize(_, _) => {}
                _ => continue,
            }
            dirty = true;
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.diff.is_some() {
        handle_diff_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Enter => app.open_diff(),
        KeyCode::Char('r') => app.reload_selected(),
        _ => {}
    }
}

fn handle_diff_key(app: &mut App, key: KeyEvent) {
    let Some(diff) = app.diff.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.diff = None,
        KeyCode::Up | KeyCode::Char('k') => diff.scroll = diff.scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => diff.scroll = diff.scroll.saturating_add(1),
        KeyCode::PageUp => diff.scroll = diff.scroll.saturating_sub(20),
        KeyCode::PageDown => diff.scroll = diff.scroll.saturating_add(20),
        _ => {}
    }
}
