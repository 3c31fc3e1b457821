//! Chat area
//!
//! Displays the message log, newest at the bottom.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use roomline_app::{App, LogLine};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Chat ");

    let items: Vec<ListItem> = if app.log().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.log().iter().map(line_item).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn line_item(line: &LogLine) -> ListItem<'static> {
    let Some(sender) = &line.sender else {
        return ListItem::new(Line::from(Span::raw(line.body.clone())));
    };

    if line.notice {
        let muted = Style::default().fg(Color::DarkGray);
        return ListItem::new(Line::from(Span::styled(format!("{sender} {}", line.body), muted)));
    }

    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{sender}:"),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::raw(line.body.clone()),
    ]))
}
