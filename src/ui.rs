pub mod arena;
pub mod board;

use catch_targets::game::GameController;
use catch_targets::leaderboard::DEFAULT_PLAYER_NAME;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;
const BOARD_WIDTH: u16 = 30;
const BUTTON_WIDTH: u16 = 28;
const TRIGGER_WIDTH: u16 = 26;

/// Screen regions of the open game, shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    pub modal: Rect,
    pub status: Rect,
    /// Inside of the play field border; target positions are relative to this
    pub arena: Rect,
    pub arena_frame: Rect,
    pub board: Rect,
    pub button: Rect,
    pub legend: Rect,
}

impl GameLayout {
    pub fn new(area: Rect) -> Self {
        let modal = area.inner(Margin {
            horizontal: HORIZONTAL_MARGIN,
            vertical: VERTICAL_MARGIN,
        });
        let inner = bordered().inner(modal);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // score and time
                Constraint::Min(5),    // play field and board
                Constraint::Length(3), // start button
                Constraint::Length(1), // legend
            ])
            .split(inner);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(BOARD_WIDTH)])
            .split(rows[1]);

        let [button] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH)])
            .flex(Flex::Center)
            .areas(rows[2]);

        Self {
            modal,
            status: rows[0],
            arena: bordered().inner(middle[0]),
            arena_frame: middle[0],
            board: middle[1],
            button,
            legend: rows[3],
        }
    }
}

/// Screen regions of the closed game (the landing view)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleLayout {
    pub banner: Rect,
    pub trigger: Rect,
    pub board: Rect,
    pub legend: Rect,
}

impl TitleLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let [trigger] = Layout::horizontal([Constraint::Length(TRIGGER_WIDTH)])
            .flex(Flex::Center)
            .areas(rows[1]);
        let [board] = Layout::horizontal([Constraint::Length(BOARD_WIDTH + 10)])
            .flex(Flex::Center)
            .areas(rows[2]);

        Self {
            banner: rows[0],
            trigger,
            board,
            legend: rows[3],
        }
    }
}

fn bordered() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.game.is_open() {
            render_game(&self.game, area, buf);
        } else {
            render_title(&self.game, area, buf);
        }
    }
}

fn render_title(game: &GameController, area: Rect, buf: &mut Buffer) {
    let layout = TitleLayout::new(area);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    Paragraph::new(vec![
        Line::from(Span::styled("catch the targets", bold_style.fg(Color::Magenta))),
        Line::from(Span::styled(
            format!(
                "click as many targets as you can in {} seconds",
                game.settings().duration_secs
            ),
            italic_style,
        )),
    ])
    .alignment(Alignment::Center)
    .render(layout.banner, buf);

    Paragraph::new(Span::styled("◎  play", bold_style.fg(Color::Red)))
        .alignment(Alignment::Center)
        .block(bordered())
        .render(layout.trigger, buf);

    render_board(game, layout.board, buf);

    Paragraph::new(Span::styled(
        "(g) play / (r) refresh scores / (q)uit",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(layout.legend, buf);
}

fn render_game(game: &GameController, area: Rect, buf: &mut Buffer) {
    let layout = GameLayout::new(area);
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    // dim the backdrop so the modal stands out
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim_style);
            }
        }
    }
    Clear.render(layout.modal, buf);
    bordered()
        .title(" catch the targets ")
        .render(layout.modal, buf);

    let session = game.session();
    let timer_style = if session.running && session.time_remaining <= 5 {
        bold_style.fg(Color::Red)
    } else {
        bold_style
    };
    Paragraph::new(Line::from(vec![
        Span::raw("Score: "),
        Span::styled(session.score.to_string(), bold_style.fg(Color::Green)),
        Span::raw("    Time: "),
        Span::styled(format!("{}s", session.time_remaining), timer_style),
    ]))
    .alignment(Alignment::Center)
    .render(layout.status, buf);

    bordered().render(layout.arena_frame, buf);
    arena::render_targets(game.targets(), layout.arena, buf);

    render_board(game, layout.board, buf);

    let control = game.start_control();
    let button_style = if control.enabled {
        bold_style.fg(Color::Black).bg(Color::Green)
    } else {
        dim_style
    };
    Paragraph::new(Span::styled(control.label.to_string(), button_style))
        .alignment(Alignment::Center)
        .block(bordered())
        .render(layout.button, buf);

    Paragraph::new(Span::styled(
        "(enter) start / click the targets / (esc) close",
        italic_style,
    ))
    .alignment(Alignment::Center)
    .render(layout.legend, buf);

    if game.name_prompt().is_some() {
        render_name_prompt(game, layout.modal, buf);
    }
}

fn render_board(game: &GameController, area: Rect, buf: &mut Buffer) {
    let block = bordered().title(" High scores ");
    let width = block.inner(area).width;
    Paragraph::new(board::board_lines(game.board(), width))
        .block(block)
        .render(area, buf);
}

fn render_name_prompt(game: &GameController, area: Rect, buf: &mut Buffer) {
    let Some(prompt) = game.name_prompt() else {
        return;
    };
    let [row] = Layout::vertical([Constraint::Length(6)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(48)])
        .flex(Flex::Center)
        .areas(row);

    let input = if prompt.input.is_empty() {
        Span::styled(
            DEFAULT_PLAYER_NAME,
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        Span::styled(
            prompt.input.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };

    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(format!(
            "High score of {}! Enter your name (or leave blank):",
            prompt.score
        )),
        Line::from(vec![Span::raw("> "), input, Span::raw("▏")]),
        Line::from(Span::styled(
            "(enter) save / (esc) skip",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        bordered()
            .title(" New high score ")
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .render(popup, buf);
}
