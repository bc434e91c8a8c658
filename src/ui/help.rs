use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("Ctrl+C", "Quit from anywhere"),
        ],
    ),
    (
        "Gallery",
        &[
            ("←↑↓→/hjkl", "Move between cards"),
            ("Enter", "Open idea details"),
            ("n", "Submit a new idea"),
            ("r", "Reload ideas"),
            ("q", "Quit"),
        ],
    ),
    (
        "Submission Form",
        &[
            ("Tab/↓", "Next field"),
            ("Shift+Tab/↑", "Previous field"),
            ("Enter", "New line (Mechanics, Story, Notes) or next field"),
            ("Ctrl+S", "Submit idea"),
            ("Esc", "Cancel and discard input"),
        ],
    ),
    (
        "Detail",
        &[
            ("↑/↓ j/k", "Scroll"),
            ("PgUp/PgDn", "Scroll page up/down"),
            ("Esc/q", "Close"),
        ],
    ),
];

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![Line::from("")];
    for (section, bindings) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            format!("  {section}"),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for (keys, action) in *bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("    {keys:<14}"), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help - Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
