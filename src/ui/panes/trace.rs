//! Rule trace pane rendering

use crate::parser::trace::TraceEntry;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Scroll state for the trace pane
#[derive(Debug)]
pub struct TraceScrollState {
    pub offset: usize,
    /// Keep the selected entry on screen. Cleared when the user scrolls by hand.
    pub follow: bool,
}

impl Default for TraceScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

/// Render the rule trace pane with `position` highlighted
pub fn render_trace_pane(
    frame: &mut Frame,
    area: Rect,
    trace: &[TraceEntry],
    position: usize,
    is_focused: bool,
    scroll: &mut TraceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Rule Trace ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if trace.is_empty() {
        let paragraph = Paragraph::new("(no trace)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    let total_items = trace.len();

    if scroll.follow {
        if position < scroll.offset {
            scroll.offset = position;
        } else if position >= scroll.offset + visible_height {
            scroll.offset = position + 1 - visible_height;
        }
    }

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        scroll.offset = scroll.offset.min(total_items - visible_height);
    } else {
        scroll.offset = 0;
    }

    let visible_items: Vec<ListItem> = trace
        .iter()
        .enumerate()
        .skip(scroll.offset)
        .take(visible_height)
        .map(|(idx, entry)| {
            let mut style = match entry {
                TraceEntry::Production { .. } => Style::default().fg(DEFAULT_THEME.rule),
                TraceEntry::Terminal(_) => Style::default().fg(DEFAULT_THEME.fg),
                TraceEntry::Skipped(_) => Style::default().fg(DEFAULT_THEME.error),
            };
            let prefix = if idx == position {
                style = style
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
                "▶ "
            } else {
                "  "
            };
            ListItem::new(format!("{}{}", prefix, entry)).style(style)
        })
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
