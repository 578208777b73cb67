//! Console pane rendering: command transcript plus the input line

use crate::ui::app::{ConsoleLine, LineKind, PROMPT};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

pub struct ConsoleRenderData<'a> {
    pub lines: &'a [ConsoleLine],
    pub input: &'a str,
    /// Cursor position in `input`, in chars
    pub cursor: usize,
}

/// Render the console pane
pub fn render_console_pane(
    frame: &mut Frame,
    area: Rect,
    data: &ConsoleRenderData<'_>,
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
        .title(" Console ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let total_items = data.lines.len();
    let visible_height = (rows[0].height as usize).max(1);

    // usize::MAX means "follow the bottom"
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = data
        .lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(console_item)
        .collect();
    frame.render_widget(List::new(items), rows[0]);

    let input_line = Line::from(vec![
        Span::styled(
            PROMPT,
            Style::default()
                .fg(DEFAULT_THEME.prompt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(data.input, Style::default().fg(DEFAULT_THEME.fg)),
    ]);
    frame.render_widget(Paragraph::new(input_line), rows[1]);

    if is_focused {
        let x = rows[1].x + (PROMPT.chars().count() + data.cursor) as u16;
        frame.set_cursor_position((x.min(rows[1].right().saturating_sub(1)), rows[1].y));
    }
}

fn console_item(line: &ConsoleLine) -> ListItem<'_> {
    match line.kind {
        LineKind::Command => ListItem::new(Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(line.text.as_str(), Style::default().fg(DEFAULT_THEME.comment)),
        ])),
        LineKind::Output => {
            ListItem::new(line.text.as_str()).style(Style::default().fg(DEFAULT_THEME.fg))
        }
        LineKind::Error => {
            ListItem::new(line.text.as_str()).style(Style::default().fg(DEFAULT_THEME.error))
        }
    }
}
