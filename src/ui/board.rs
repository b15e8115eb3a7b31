use catch_targets::leaderboard::{BoardView, EMPTY_BOARD_MESSAGE, LOADING_MESSAGE};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

const RANK_WIDTH: usize = 3;
const SCORE_WIDTH: usize = 5;

/// Lines for the high score panel, names clipped to fit `width` columns
pub fn board_lines(view: &BoardView, width: u16) -> Vec<Line<'static>> {
    let muted = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC);

    match view {
        BoardView::Loading => vec![Line::from(Span::styled(LOADING_MESSAGE, muted))],
        BoardView::Empty => vec![Line::from(Span::styled(EMPTY_BOARD_MESSAGE, muted))],
        BoardView::Entries(entries) => {
            let name_width = (width as usize).saturating_sub(RANK_WIDTH + SCORE_WIDTH + 2);
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let rank_style = match i {
                        0 => Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                        1 | 2 => Style::default().fg(Color::Cyan),
                        _ => Style::default().add_modifier(Modifier::DIM),
                    };
                    Line::from(vec![
                        Span::styled(format!("{:>w$}", i + 1, w = RANK_WIDTH), rank_style),
                        Span::raw(" "),
                        Span::raw(fit(&entry.name, name_width)),
                        Span::raw(" "),
                        Span::styled(
                            format!("{:>w$}", entry.score, w = SCORE_WIDTH),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ])
                })
                .collect()
        }
    }
}

/// Pads or clips `text` to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use catch_targets::leaderboard::ScoreEntry;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn placeholder_lines() {
        assert_eq!(text(&board_lines(&BoardView::Loading, 30)[0]), LOADING_MESSAGE);
        assert_eq!(text(&board_lines(&BoardView::Empty, 30)[0]), EMPTY_BOARD_MESSAGE);
    }

    #[test]
    fn entries_show_rank_name_score() {
        let view = BoardView::Entries(vec![ScoreEntry::new("ada", 12), ScoreEntry::new("bob", 7)]);
        let lines = board_lines(&view, 20);
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), "  1 ada           12");
        assert_eq!(text(&lines[1]), "  2 bob            7");
    }

    #[test]
    fn long_and_wide_names_are_clipped() {
        assert_eq!(fit("abcdefgh", 4), "abcd");
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("漢字漢", 5), "漢字 ");
    }
}
