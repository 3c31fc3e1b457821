//! Member sidebar
//!
//! Lists room members in join order under the roster label.

use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, List, ListItem},
};
use roomline_app::App;

/// Render the member sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> =
        app.members().iter().map(|id| ListItem::new(Line::from(id.to_string()))).collect();

    let block = Block::default().borders(Borders::ALL).title(format!(" {} ", app.members_label()));
    frame.render_widget(List::new(items).block(block), area);
}
