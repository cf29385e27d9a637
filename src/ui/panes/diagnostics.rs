//! Diagnostics pane rendering

use crate::parser::parse::SyntaxError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the syntax error list; errors on `current_line` are emphasised.
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[SyntaxError],
    current_line: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Diagnostics ({}) ", diagnostics.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("(no syntax errors)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if diagnostics.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(diagnostics.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = diagnostics
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|diagnostic| {
            let style = if diagnostic.line == current_line {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.error)
            };
            ListItem::new(diagnostic.to_string()).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
