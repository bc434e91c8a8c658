use super::centered_rect;
use crate::app::{App, DetailState};
use crate::idea::{FIELDS, FieldKey, Idea, NONE_PROVIDED};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(app: &App, frame: &mut Frame) {
    if app.detail == DetailState::Idle {
        return;
    }

    let area = centered_rect(80, 85, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(match app.detail.id() {
            Some(id) => format!(" Idea #{id} "),
            None => " Idea ".to_string(),
        })
        .title_bottom(
            Line::from(" ↑↓/PgUp/PgDn Scroll  Esc Close ")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.detail {
        DetailState::Idle => {}
        DetailState::Loading { .. } => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(loading, middle_row(inner, 1));
        }
        DetailState::Error { message, .. } => {
            let error = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Error: Could not load idea.",
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    message.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(error, middle_row(inner, 2));
        }
        DetailState::Loaded(idea) => {
            let content = Paragraph::new(detail_lines(idea))
                .wrap(Wrap { trim: false })
                .scroll((app.detail_scroll, 0));
            frame.render_widget(content, inner);
        }
    }
}

fn detail_lines(idea: &Idea) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", idea.title),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(" ID: ", Style::default().fg(Color::DarkGray)),
            Span::styled(idea.id.to_string(), Style::default().fg(Color::White)),
            Span::raw("   "),
            Span::styled("Submitted: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                idea.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];

    for spec in FIELDS.iter().filter(|s| s.key != FieldKey::Title) {
        lines.push(Line::from(Span::styled(
            format!(" {}", spec.label),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        match idea.display_value(spec.key) {
            Some(value) => {
                for text in value.lines() {
                    lines.push(Line::from(format!("   {text}")));
                }
            }
            None => lines.push(Line::from(Span::styled(
                format!("   {NONE_PROVIDED}"),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))),
        }
        lines.push(Line::from(""));
    }
    lines
}

fn middle_row(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}
