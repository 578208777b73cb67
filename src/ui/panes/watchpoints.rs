//! Watchpoint list pane

use crate::monitor::commands::format_value;
use crate::ui::theme::DEFAULT_THEME;
use crate::watchpoint::Watchpoint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the active watchpoints, one per row, changed values highlighted
pub fn render_watchpoints_pane(
    frame: &mut Frame,
    area: Rect,
    watchpoints: &[&Watchpoint],
    capacity: usize,
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
        .title(format!(" Watchpoints {}/{} ", watchpoints.len(), capacity))
        .borders(Borders::ALL)
        .border_style(border_style);

    if watchpoints.is_empty() {
        let paragraph = Paragraph::new("(none; add one with 'w EXPR')")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    // each watchpoint takes two rows
    let visible_height = (area.height.saturating_sub(2) as usize / 2).max(1);
    *scroll_offset = (*scroll_offset).min(watchpoints.len().saturating_sub(visible_height));

    let items: Vec<ListItem> = watchpoints
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|wp| watchpoint_item(wp))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn watchpoint_item<'a>(wp: &'a Watchpoint) -> ListItem<'a> {
    let changed = wp.new_value() != wp.old_value();
    let value_style = if changed {
        Style::default()
            .fg(DEFAULT_THEME.changed)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.number)
    };

    let mut value_spans = vec![
        Span::raw("    "),
        Span::styled(format_value(wp.new_value()), value_style),
    ];
    if changed {
        value_spans.push(Span::styled(
            format!("  was {}", format_value(wp.old_value())),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("#{:<3}", wp.id()),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(wp.expression(), Style::default().fg(DEFAULT_THEME.fg)),
        ]),
        Line::from(value_spans),
    ])
}
