use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::game::GameLoop;
use crate::geometry::Rect as GameRect;
use crate::rng::RandomSource;
use crate::surface::{self, Font, RenderSurface, Sprite};

const BLOCK: &str = "█";
/// Sprite pixels more transparent than this are left undrawn
const ALPHA_CUTOFF: u8 = 128;

fn palette(color: surface::Color) -> Color {
    match color {
        surface::Color::Player => Color::Green,
        surface::Color::PlayerBullet => Color::Red,
        surface::Color::Enemy => Color::Blue,
        surface::Color::EnemyBullet => Color::Magenta,
        surface::Color::Text => Color::White,
        surface::Color::Flavor => Color::Yellow,
        surface::Color::Banner => Color::White,
    }
}

/// Paints playfield units onto a ratatui buffer, scaled to fit `area`
pub struct TerminalSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    playfield: (i32, i32),
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, playfield: (i32, i32)) -> Self {
        // Never write outside the buffer
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            playfield,
        }
    }

    fn scale(&self) -> Option<(f64, f64)> {
        let (width, height) = self.playfield;
        if width <= 0 || height <= 0 || self.area.is_empty() {
            return None;
        }
        Some((
            self.area.width as f64 / width as f64,
            self.area.height as f64 / height as f64,
        ))
    }

    /// Cells covered by a playfield rectangle, clipped to the area.
    /// Anything with a non-zero size covers at least one cell.
    fn to_cells(&self, rect: GameRect) -> Option<Rect> {
        let (sx, sy) = self.scale()?;
        let x0 = (rect.x as f64 * sx).floor().max(0.0);
        let x1 = (rect.right() as f64 * sx).ceil().min(self.area.width as f64);
        let y0 = (rect.y as f64 * sy).floor().max(0.0);
        let y1 = (rect.bottom() as f64 * sy).ceil().min(self.area.height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Rect {
            x: self.area.x + x0 as u16,
            y: self.area.y + y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }

    fn to_cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let (sx, sy) = self.scale()?;
        let col = (x as f64 * sx).floor();
        let row = (y as f64 * sy).floor();
        if col < 0.0 || row < 0.0 || col >= self.area.width as f64 || row >= self.area.height as f64
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }
}

impl RenderSurface for TerminalSurface<'_> {
    fn size(&self) -> (i32, i32) {
        self.playfield
    }

    fn draw_rect(&mut self, rect: GameRect, color: surface::Color) {
        let Some(cells) = self.to_cells(rect) else {
            return;
        };
        let style = Style::default().fg(palette(color));
        for y in cells.top()..cells.bottom() {
            for x in cells.left()..cells.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_symbol(BLOCK).set_style(style);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: Font, color: surface::Color) {
        let Some((col, row)) = self.to_cell(x, y) else {
            return;
        };
        let mut style = Style::default().fg(palette(color));
        if font == Font::Banner {
            style = style.add_modifier(Modifier::BOLD);
        }
        let max_width = self.area.right().saturating_sub(col) as usize;
        self.buf.set_stringn(col, row, text, max_width, style);
    }

    fn draw_sprite(&mut self, sprite: &Sprite, rect: GameRect) {
        let Some(cells) = self.to_cells(rect) else {
            return;
        };
        for y in cells.top()..cells.bottom() {
            for x in cells.left()..cells.right() {
                let u = (x - cells.x) as f32 / cells.width as f32 + 0.5 / cells.width as f32;
                let v = (y - cells.y) as f32 / cells.height as f32 + 0.5 / cells.height as f32;
                let [r, g, b, a] = sprite.sample(u, v);
                if a < ALPHA_CUTOFF {
                    continue;
                }
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.set_symbol(BLOCK).set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }

    fn dim(&mut self) {
        self.buf.set_style(
            self.area,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        );
    }
}

/// Driver-side details the game itself does not track
pub struct RenderView {
    pub paused: bool,
    pub fps: u32,
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Frames the playfield, lets the game paint itself, then adds the
    /// controls hint and any overlay boxes.
    pub fn render<R: RandomSource>(&self, frame: &mut Frame, game: &GameLoop<R>, view: &RenderView) {
        let area = frame.area();
        let field_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(" SPACE INVADERS ").centered().bold())
            .title(Line::from(format!(" {} fps ", view.fps)).right_aligned());
        let inner = block.inner(field_area);
        frame.render_widget(block, field_area);

        let playfield = (game.config().playfield_width, game.config().playfield_height);
        let mut surface = TerminalSurface::new(frame.buffer_mut(), inner, playfield);
        game.render(&mut surface);

        if game.is_game_over() {
            self.render_restart_hint(frame, inner);
        } else if view.paused {
            self.render_paused(frame, inner);
        }

        // Controls hint at bottom
        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [P: Pause] [R: Restart] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);

        let controls_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1u16.min(area.height),
        };

        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn render_paused(&self, frame: &mut Frame, area: Rect) {
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let pause_area = Rect {
            x: area.x + (area.width / 2).saturating_sub(15),
            y: area.y + (area.height / 2).saturating_sub(3),
            width: 30u16.min(area.width),
            height: 6u16.min(area.height),
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    fn render_restart_hint(&self, frame: &mut Frame, area: Rect) {
        let hint = vec![
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];

        let hint_area = Rect {
            x: area.x,
            y: area.y + (area.height * 3 / 4).min(area.height.saturating_sub(2)),
            width: area.width,
            height: 2u16.min(area.height),
        };

        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), hint_area);
    }
}
