use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::App;
use super::app::DiffView;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("diffbar", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(
            format!("{} file(s)", app.files.len()),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.diff {
        Some(diff) => draw_diff(frame, chunks[1], diff),
        None => draw_strip(frame, chunks[1], app),
    }

    let hint = if app.diff.is_some() {
        "esc close  up/down scroll"
    } else {
        "enter diff  r reload  up/down select  q quit"
    };
    let mut footer = Vec::new();
    let detail = app
        .note
        .clone()
        .or_else(|| {
            app.selected_file()
                .and_then(|f| app.segment(f))
                .map(|s| s.tooltip)
        })
        .unwrap_or_default();
    footer.push(Line::from(Span::raw(detail)));
    footer.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

fn draw_strip(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &App) {
    let mut lines = Vec::new();
    for (i, f) in app.files.iter().enumerate() {
        let selected = i == app.selected;
        let name_style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(f.display.clone(), name_style)];
        if let Some(segment) = app.segment(f) {
            spans.push(Span::raw(" "));
            spans.extend(app.palette.spans(&segment));
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_diff(frame: &mut ratatui::Frame, area: ratatui::layout::Rect, diff: &DiffView) {
    let lines: Vec<Line> = diff
        .lines
        .iter()
        .map(|l| {
            let style = if l.starts_with("+++") || l.starts_with("---") {
                Style::default().add_modifier(Modifier::BOLD)
            } else if l.starts_with('+') {
                Style::default().fg(Color::Green)
            } else if l.starts_with('-') {
                Style::default().fg(Color::Red)
            } else if l.starts_with("@@") {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Line::from(Span::styled(l.as_str(), style))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((diff.scroll, 0))
            .block(Block::default().borders(Borders::TOP).title(diff.title.as_str())),
        area,
    );
}
