use super::{centered_rect, tail_to_width};
use crate::app::App;
use crate::idea::FIELDS;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const VALUE_INDENT: &str = "  ";

pub fn render(app: &App, frame: &mut Frame) {
    let area = centered_rect(80, 90, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Submit Your Game Idea ")
        .title_bottom(
            Line::from(" Tab/↑↓ Field  Ctrl+S Submit  Esc Cancel ")
                .style(Style::default().fg(Color::DarkGray)),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let form = &app.form;
    let focused = form.focused().key;
    let value_width = usize::from(chunks[0].width).saturating_sub(VALUE_INDENT.len() + 1);

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor = (0usize, 0usize);

    for spec in &FIELDS {
        let is_focused = spec.key == focused;

        let label_style = if is_focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };
        let mut label = vec![
            Span::styled(if is_focused { "▸ " } else { "  " }, label_style),
            Span::styled(spec.label, label_style),
        ];
        if spec.required {
            label.push(Span::styled(" *", Style::default().fg(Color::Red)));
        }
        if spec.multiline {
            label.push(Span::styled(
                "  (Enter for new line)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(label));

        let value = form.draft().get(spec.key);
        if value.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("{VALUE_INDENT}{}", spec.placeholder()),
                Style::default().fg(Color::DarkGray),
            )));
            if is_focused {
                cursor = (lines.len() - 1, 0);
            }
        } else {
            let value_style = if is_focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            // `split('\n')` keeps the empty line after a trailing newline for the cursor.
            for text in value.split('\n') {
                let shown = if is_focused {
                    tail_to_width(text, value_width)
                } else {
                    text
                };
                lines.push(Line::from(Span::styled(
                    format!("{VALUE_INDENT}{shown}"),
                    value_style,
                )));
                if is_focused {
                    cursor = (lines.len() - 1, shown.width());
                }
            }
        }
        lines.push(Line::from(""));
    }

    // Scroll just far enough to keep the cursor line on screen.
    let height = usize::from(chunks[0].height);
    let scroll = (cursor.0 + 1).saturating_sub(height);

    let fields = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(fields, chunks[0]);

    if !form.submitting {
        let x = chunks[0].x + (VALUE_INDENT.len() + cursor.1) as u16;
        let y = chunks[0].y + cursor.0.saturating_sub(scroll) as u16;
        if y < chunks[0].y + chunks[0].height && x < chunks[0].x + chunks[0].width {
            frame.set_cursor_position((x, y));
        }
    }

    // ── Footer ──
    let footer = if form.submitting {
        Paragraph::new("Submitting...").style(Style::default().fg(Color::Yellow))
    } else if let Some(error) = &form.error {
        Paragraph::new(error.as_str()).style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Paragraph::new("Ctrl+S to submit").style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(footer.alignment(Alignment::Center), chunks[1]);
}
