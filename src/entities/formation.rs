use super::enemy::{ENEMY_HEIGHT, ENEMY_WIDTH, Enemy};

/// Horizontal gap between neighbouring enemies
const COLUMN_GAP: i32 = 10;
/// Vertical gap between rows
const ROW_GAP: i32 = 10;
/// Top-left corner of the first enemy in a fresh grid
const GRID_LEFT: i32 = 30;
const GRID_TOP: i32 = 60;
/// How far the whole formation drops on each wall bounce
pub const DROP_DISTANCE: i32 = 10;

/// Grid shape of a freshly spawned formation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormationLayout {
    pub rows: u32,
    pub cols: u32,
}

impl FormationLayout {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Adds one row per level past the first, up to `max_rows`
    pub fn for_level(level: u32, base_rows: u32, max_rows: u32, cols: u32) -> Self {
        let rows = base_rows
            .saturating_add(level.saturating_sub(1))
            .min(max_rows.max(base_rows));
        Self { rows, cols }
    }
}

/// The marching block of enemies. All members share one direction and speed.
#[derive(Debug, Clone)]
pub struct Formation {
    /// Live enemies in spawn order (row-major), which is also the hit-test order
    pub enemies: Vec<Enemy>,
    /// Movement direction (-1 left, 1 right)
    pub direction: i32,
    /// Horizontal displacement per enemy tick
    pub speed: i32,
    pub drop_distance: i32,
}

impl Formation {
    pub fn new(enemies: Vec<Enemy>, speed: i32) -> Self {
        Self {
            enemies,
            direction: 1, // Start moving right
            speed,
            drop_distance: DROP_DISTANCE,
        }
    }

    /// Builds a rows x cols grid anchored near the top-left of the playfield
    pub fn grid(layout: FormationLayout, speed: i32) -> Self {
        let mut enemies = Vec::with_capacity((layout.rows * layout.cols) as usize);
        for row in 0..layout.rows as i32 {
            for col in 0..layout.cols as i32 {
                enemies.push(Enemy::new(
                    col * (ENEMY_WIDTH + COLUMN_GAP) + GRID_LEFT,
                    row * (ENEMY_HEIGHT + ROW_GAP) + GRID_TOP,
                ));
            }
        }
        Self::new(enemies, speed)
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Whether the leading edge has reached the wall it is heading towards
    pub fn at_boundary(&self, max_x: i32) -> bool {
        let Some(min_x) = self.enemies.iter().map(|e| e.x).min() else {
            return false;
        };
        let max_right = self
            .enemies
            .iter()
            .map(|e| e.x + ENEMY_WIDTH)
            .max()
            .unwrap_or(min_x);

        (self.direction < 0 && min_x <= 0) || (self.direction > 0 && max_right >= max_x)
    }

    /// Moves the formation one step. On a wall hit the direction flips and the
    /// whole formation drops before moving. Returns whether that happened.
    pub fn advance(&mut self, max_x: i32) -> bool {
        if self.enemies.is_empty() {
            return false;
        }

        let bounced = self.at_boundary(max_x);
        if bounced {
            self.direction = -self.direction;
            for enemy in &mut self.enemies {
                enemy.y += self.drop_distance;
            }
        }

        let dx = self.speed * self.direction;
        for enemy in &mut self.enemies {
            enemy.x += dx;
        }

        bounced
    }

    /// Bottom edge of the lowest enemy, if any remain
    pub fn lowest_edge(&self) -> Option<i32> {
        self.enemies.iter().map(|e| e.y + ENEMY_HEIGHT).max()
    }

    pub fn remove(&mut self, index: usize) -> Enemy {
        self.enemies.remove(index)
    }
}
