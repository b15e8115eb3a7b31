use catch_targets::target::{Target, TargetState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Widget},
};

const BULLSEYE: &str = "◎";
const BURST: &str = "✦";

/// Draws the targets inside `area`, clipping any that overhang it.
pub fn render_targets(targets: &[Target], area: Rect, buf: &mut Buffer) {
    for target in targets {
        let rect = Rect::new(
            area.x.saturating_add(target.pos.x),
            area.y.saturating_add(target.pos.y),
            target.width,
            target.height,
        )
        .intersection(area);
        if rect.is_empty() {
            continue;
        }

        let (style, center) = match target.state {
            TargetState::Live(_) => (
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                BULLSEYE,
            ),
            TargetState::Popping(_) => (
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                BURST,
            ),
            TargetState::Fading(_) => (
                Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
                BULLSEYE,
            ),
        };

        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style)
            .render(rect, buf);

        let cx = rect.x + rect.width / 2;
        let cy = rect.y + rect.height / 2;
        if let Some(cell) = buf.cell_mut((cx, cy)) {
            cell.set_symbol(center);
            cell.set_style(style);
        }
    }
}
