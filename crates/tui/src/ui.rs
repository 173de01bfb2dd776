use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style, Modifier},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use wander_core::platform::hotkey::TOGGLE_HOTKEY;
use wander_core::types::MacroState;
use crate::App;

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(4), Constraint::Min(0)])
        .split(f.area());

    let state = app.handle.state();
    let banner_bg = match state {
        MacroState::Running => Color::Green,
        MacroState::Stopped => Color::Red,
    };
    let banner = Paragraph::new(Line::from(Span::styled(
        state.status().to_uppercase(),
        Style::default().fg(Color::Black).bg(banner_bg).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .style(Style::default().bg(banner_bg));
    f.render_widget(banner, rows[0]);

    let mut help = vec![
        Span::styled(" s", Style::default().fg(Color::Yellow)),
        Span::raw("/"),
        Span::styled("space", Style::default().fg(Color::Yellow)),
        Span::raw(" toggle, "),
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" logs, "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ];
    if let Some(chord) = TOGGLE_HOTKEY {
        help.push(Span::raw(", global "));
        help.push(Span::styled(chord, Style::default().fg(Color::Yellow)));
    }
    let info = Paragraph::new(vec![
        Line::from(help),
        Line::from(Span::styled(
            format!(" cycles completed: {}", app.handle.cycles()),
            Style::default().fg(Color::Cyan),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(info, rows[1]);

    if !app.log_visible {
        return;
    }
    let area = rows[2];
    let visible_height = area.height.saturating_sub(2) as usize;
    let total = app.log_messages.len();
    let scroll = app.log_scroll.min(total.saturating_sub(visible_height));
    let start = total.saturating_sub(visible_height + scroll);
    let end = total.saturating_sub(scroll);
    let log_lines: Vec<Line> = app.log_messages[start..end]
        .iter()
        .map(|m| parse_log_line(m))
        .collect();

    let log_panel = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Logs ")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(log_panel, area);
}

/// Parse a structured log record (level\x1fprefix\x1fcolor\x1ftimestamp\x1fmessage)
/// into a colored Line.
fn parse_log_line(raw: &str) -> Line<'_> {
    let parts: Vec<&str> = raw.splitn(5, '\x1f').collect();
    let [level, prefix, color_idx, timestamp, message] = parts[..] else {
        return Line::from(raw);
    };

    let color = match color_idx.parse::<u8>().unwrap_or(0) {
        1 => Color::DarkGray,   // COLOR_GRAY
        2 => Color::LightBlue,  // COLOR_BLUE
        3 => Color::LightGreen, // COLOR_GREEN
        _ => Color::White,
    };

    let mut spans = vec![
        Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ];

    match level {
        "ERROR" => spans.push(Span::styled("error ", Style::default().fg(Color::Red))),
        "WARN" => spans.push(Span::styled("warn ", Style::default().fg(Color::Yellow))),
        _ => {}
    }

    if !prefix.is_empty() {
        spans.push(Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(message, Style::default().fg(color)));

    Line::from(spans)
}
