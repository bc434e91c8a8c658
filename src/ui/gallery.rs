use super::truncate_str;
use crate::app::{App, LoadStatus, Overlay};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const CARD_HEIGHT: u16 = 4;

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Game Ideas",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} ideas]", app.ideas.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray))
            .title_top(
                Line::from(" n: Submit an Idea ")
                    .style(Style::default().fg(Color::Yellow))
                    .alignment(Alignment::Right),
            ),
    );
    frame.render_widget(header, chunks[0]);

    // ── Grid ──
    if app.ideas.is_empty() {
        let (text, style) = match &app.gallery_status {
            LoadStatus::Loading => (
                "Loading ideas...".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
            LoadStatus::Failed(message) => (
                format!("Could not load ideas. {message}"),
                Style::default().fg(Color::Red),
            ),
            LoadStatus::Loaded => (
                "No ideas submitted yet.".to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        let empty = Paragraph::new(text).style(style).alignment(Alignment::Center);
        let middle = Rect {
            y: chunks[1].y + chunks[1].height / 2,
            height: 1,
            ..chunks[1]
        };
        frame.render_widget(empty, middle);
    } else {
        render_grid(app, frame, chunks[1]);
    }

    // ── Status bar ──
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let status_style = if matches!(app.gallery_status, LoadStatus::Failed(_)) {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key),
        Span::raw(" Navigate  "),
        Span::styled("Enter", key),
        Span::raw(" Details  "),
        Span::styled("n", key),
        Span::raw(" New  "),
        Span::styled("r", key),
        Span::raw(" Reload  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, status_style),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[2]);
}

fn render_grid(app: &App, frame: &mut Frame, area: Rect) {
    let columns = app.columns.max(1);
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);
    let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];

    for (slot, row_area) in row_areas.iter().enumerate() {
        let row = first_row + slot;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints.clone())
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * columns + col;
            let Some(idea) = app.ideas.get(index) else {
                return;
            };
            let is_selected = index == app.selected && app.overlay == Overlay::None;
            let border = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let inner_width = usize::from(cell.width.saturating_sub(4));
            let title = if idea.title.trim().is_empty() {
                "(untitled)"
            } else {
                idea.title.as_str()
            };
            let card = Paragraph::new(vec![
                Line::from(Span::styled(
                    truncate_str(title, inner_width),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Enter to view details",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" #{} ", idea.id)),
            );
            let padded = Rect {
                x: cell.x + 1,
                width: cell.width.saturating_sub(2),
                ..*cell
            };
            frame.render_widget(card, padded);
        }
    }
}
