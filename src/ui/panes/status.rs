//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    current_step: usize,
    total_steps: usize,
    error_count: usize,
    is_playing: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Left side: step info, error count and status message
    let step_text = format!(" Step {}/{} ", current_step + 1, total_steps.max(1));
    let (errors_text, errors_bg) = match error_count {
        0 => (" OK ".to_string(), DEFAULT_THEME.success),
        1 => (" 1 error ".to_string(), DEFAULT_THEME.error),
        n => (format!(" {} errors ", n), DEFAULT_THEME.error),
    };

    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            errors_text,
            Style::default()
                .bg(errors_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in [
        (" ←/→ ", " step "),
        (" e ", " next error "),
        (" ⎵ ", " play "),
        (" ↵ / ⌫ ", " end/start "),
        (" ⇥ ", " focus "),
        ("q", " quit "),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let is_at_start = current_step == 0;
    let is_at_end = current_step + 1 >= total_steps;

    let indicator = if is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if is_at_end {
        Some((" END ", DEFAULT_THEME.error))
    } else if is_at_start {
        Some((" START ", DEFAULT_THEME.success))
    } else {
        None
    };

    if let Some((label, bg)) = indicator {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
