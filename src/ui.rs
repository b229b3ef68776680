//! Layout and drawing: playfield, sidebar, next preview, pause and game
//! over overlays, line-clear flash.

use crate::app::Screen;
use crate::game::Game;
use crate::pieces::PIECE_SIZE;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer};

/// Each board cell is two terminal columns wide so cells look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;

/// Playfield size in terminal cells (grid + border) for the given board.
fn playfield_pixel_size(game: &Game) -> (u16, u16) {
    let w = game.matrix().num_cols() as u16 * CELL_WIDTH + 2;
    let h = game.matrix().num_rows() as u16 + 2;
    (w, h)
}

/// Playfield inner rect (board only, no border); matches the draw_game
/// layout so effects can target the same cells.
fn playfield_board_rect(area: Rect, game: &Game) -> Rect {
    let (pw, ph) = playfield_pixel_size(game);
    let total_w = pw + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(ph) / 2;
    Rect {
        x: x + 1,
        y: y + 1,
        width: (game.matrix().num_cols() as u16 * CELL_WIDTH).min(area.width.saturating_sub(2)),
        height: (game.matrix().num_rows() as u16).min(area.height.saturating_sub(2)),
    }
}

/// Draw the current screen, with pause overlay and line-clear flash.
pub fn draw(
    frame: &mut Frame,
    game: &Game,
    theme: &Theme,
    screen: Screen,
    paused: bool,
    area: Rect,
    line_clear_effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    draw_game(frame, game, theme, area);
    if let Some(effect) = line_clear_effect {
        let board_rect = playfield_board_rect(area, game);
        let delta = effect_time
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(std::time::Duration::ZERO);
        *effect_time = Some(now);
        let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
    if paused && screen == Screen::Playing {
        draw_pause_overlay(frame, theme, area);
    }
    if screen == Screen::GameOver {
        draw_game_over(frame, game, theme, area);
    }
}

fn draw_game(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let (pw, ph) = playfield_pixel_size(game);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let active = vert[1];

    let (playfield_area, sidebar_area) = {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active);
        (inner[0], inner[1])
    };

    draw_playfield(frame, game, theme, playfield_area);
    draw_sidebar(frame, game, theme, sidebar_area);
}

fn draw_playfield(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" tetratui ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let matrix = game.matrix();
    let buf = frame.buffer_mut();
    for row in 0..matrix.num_rows() {
        for col in 0..matrix.num_cols() {
            let rx = inner.x + col as u16 * CELL_WIDTH;
            let ry = inner.y + row as u16;
            if rx + CELL_WIDTH > inner.x + inner.width || ry >= inner.y + inner.height {
                continue;
            }
            let style = match matrix.block(row, col) {
                Some(b) => Style::default()
                    .fg(theme.block_color(b.color_index()))
                    .bg(theme.bg),
                None => Style::default().fg(theme.bg).bg(theme.bg),
            };
            buf.set_string(rx, ry, "██", style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PIECE_SIZE as u16 + 3), // Next (border + title + preview)
            Constraint::Length(1),                     // gap
            Constraint::Length(4),                     // Stats (border + level + lines)
            Constraint::Length(1),                     // gap
            Constraint::Length(9),                     // Keys
            Constraint::Fill(1),
        ])
        .split(area);

    // --- Next (own border) ---
    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let next_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(PIECE_SIZE as u16)])
        .split(next_inner);
    Paragraph::new(Line::from(Span::styled("Next", title_style)))
        .render(next_layout[0], frame.buffer_mut());
    draw_next_preview(frame, game, theme, next_layout[1]);

    // --- Stats (own border) ---
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Level: ", title_style),
            Span::styled(game.level().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Lines: ", title_style),
            Span::styled(game.total_rows_cleared().to_string(), fg_style),
        ]),
    ];
    Paragraph::new(ratatui::text::Text::from(stats_lines))
        .render(stats_inner, frame.buffer_mut());

    // --- Keys (own border) ---
    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let keys_inner = keys_block.inner(chunks[4]);
    keys_block.render(chunks[4], frame.buffer_mut());
    let key_lines = vec![
        Line::from(Span::styled("←/→  move", fg_style)),
        Line::from(Span::styled("↑/spc rotate", fg_style)),
        Line::from(Span::styled("↓    soft drop", fg_style)),
        Line::from(Span::styled("p    pause", fg_style)),
        Line::from(Span::styled("r    restart", fg_style)),
        Line::from(Span::styled("+/-  level", fg_style)),
        Line::from(Span::styled("q    quit", fg_style)),
    ];
    Paragraph::new(ratatui::text::Text::from(key_lines)).render(keys_inner, frame.buffer_mut());
}

/// Next piece in its 4×4 bounding box, two columns per cell.
fn draw_next_preview(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let piece = game.next_piece();
    let buf = frame.buffer_mut();
    for row in 0..PIECE_SIZE {
        for col in 0..PIECE_SIZE {
            let Some(block) = piece.block(row, col) else {
                continue;
            };
            let rx = area.x + col as u16 * CELL_WIDTH;
            let ry = area.y + row as u16;
            if rx + CELL_WIDTH > area.x + area.width || ry >= area.y + area.height {
                continue;
            }
            let color = theme.block_color(block.color_index());
            buf.set_string(rx, ry, "██", Style::default().fg(color).bg(theme.bg));
        }
    }
}

/// Centered bordered popup over the playfield.
fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn clear_overlay_bg(frame: &mut Frame, theme: &Theme, rect: Rect) {
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            frame.buffer_mut()[(x, y)]
                .set_symbol(" ")
                .set_style(Style::default().bg(theme.bg));
        }
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let rect = overlay_rect(area, 24, 5);
    clear_overlay_bg(frame, theme, rect);
    let lines = vec![
        Line::from(Span::styled("Paused", Style::default().fg(theme.title).bold())),
        Line::from(Span::styled("p to resume", Style::default().fg(theme.main_fg))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.title)),
    );
    p.render(rect, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, game: &Game, theme: &Theme, area: Rect) {
    let rect = overlay_rect(area, 30, 7);
    clear_overlay_bg(frame, theme, rect);
    let lines = vec![
        Line::from(Span::styled(
            "Game over",
            Style::default().fg(theme.title).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Level {}   Lines {}",
                game.level(),
                game.total_rows_cleared()
            ),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            "r restart   q quit",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.title)),
    );
    p.render(rect, frame.buffer_mut());
}
