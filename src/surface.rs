//! Drawing contract between the simulation and whatever displays it.

use crate::geometry::Rect;

/// Logical palette; each surface maps these to what it can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Player,
    PlayerBullet,
    Enemy,
    EnemyBullet,
    Text,
    Flavor,
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Score, lives and level readout
    Hud,
    /// Large centered overlay text
    Banner,
}

/// Decoded RGBA image used in place of the plain enemy rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8
    pub pixels: Vec<[u8; 4]>,
}

impl Sprite {
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Nearest-neighbour lookup with `u`, `v` in `[0, 1)`
    /// Out-of-range lookups on a hand-built sprite come back transparent
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width.saturating_sub(1));
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height.saturating_sub(1));
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or([0; 4])
    }
}

/// Anything the game can paint itself onto. Coordinates are playfield units.
pub trait RenderSurface {
    /// Playfield size the surface was set up for
    fn size(&self) -> (i32, i32);

    fn draw_rect(&mut self, rect: Rect, color: Color);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: Font, color: Color);

    fn draw_sprite(&mut self, sprite: &Sprite, rect: Rect);

    /// Darkens everything drawn so far, used under the game-over banner
    fn dim(&mut self);
}
