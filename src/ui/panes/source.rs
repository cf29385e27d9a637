//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the Rat25S
//! program being checked with basic syntax highlighting and trace indicators.
//!
//! # Features
//!
//! - Highlighting for keywords, qualifiers, literals and `[* ... *]` comments
//!   (comments may span lines)
//! - Current line highlighting for the selected trace entry
//! - A gutter marker on every line that has a syntax error
//! - Scroll state that keeps the current line at a fixed row while stepping

use crate::parser::lexer::is_keyword;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rustc_hash::FxHashMap;

/// Highlight one source line. `in_comment` carries an open comment from the
/// previous line and is updated for the next one.
fn highlight_source_line(line: &str, in_comment: &mut bool) -> Line<'static> {
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);
    let mut spans = Vec::new();
    let mut word = String::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        if *in_comment {
            flush_word(&mut spans, &mut word);
            match line[i..].find("*]") {
                Some(end) => {
                    let stop = i + end + 2;
                    spans.push(Span::styled(line[i..stop].to_string(), comment_style));
                    *in_comment = false;
                    while chars.next_if(|(j, _)| *j < stop).is_some() {}
                }
                None => {
                    spans.push(Span::styled(line[i..].to_string(), comment_style));
                    break;
                }
            }
            continue;
        }

        if line[i..].starts_with("[*") {
            flush_word(&mut spans, &mut word);
            spans.push(Span::styled("[*", comment_style));
            chars.next();
            chars.next();
            *in_comment = true;
            continue;
        }

        if c.is_ascii_alphanumeric() || c == '_' || (c == '.' && !word.is_empty()) {
            word.push(c);
            chars.next();
            continue;
        }

        flush_word(&mut spans, &mut word);
        let style = match c {
            '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
            '$' => Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        chars.next();
    }

    flush_word(&mut spans, &mut word);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String) {
    if word.is_empty() {
        return;
    }
    let style = get_word_style(word);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn get_word_style(word: &str) -> Style {
    if word.starts_with(|c: char| c.is_ascii_digit()) {
        return Style::default().fg(DEFAULT_THEME.number);
    }
    if !is_keyword(word) {
        return Style::default().fg(DEFAULT_THEME.fg);
    }
    match word.to_ascii_lowercase().as_str() {
        "integer" | "real" | "boolean" => Style::default().fg(DEFAULT_THEME.type_name),
        "true" | "false" => Style::default().fg(DEFAULT_THEME.number),
        _ => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    diagnostic_lines: &FxHashMap<usize, usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);

        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let mut in_comment = false;
    let visible_lines: Vec<Line> = lines
        .iter()
        .map(|line| highlight_source_line(line, &mut in_comment))
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, mut content_line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let has_error = diagnostic_lines.contains_key(&line_num);

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            let marker = if has_error {
                Span::styled("● ", Style::default().fg(DEFAULT_THEME.error))
            } else {
                Span::raw("  ")
            };

            if is_current {
                let current_bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current_bg);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style), marker];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
