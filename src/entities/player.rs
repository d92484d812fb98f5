use std::time::Duration;

use super::projectile::{BULLET_HEIGHT, BULLET_WIDTH, Projectile, ProjectileOwner};
use crate::geometry::Rect;

pub const PLAYER_WIDTH: i32 = 30;
pub const PLAYER_HEIGHT: i32 = 10;
/// Horizontal distance covered by one move input
pub const PLAYER_STEP: i32 = 15;

#[derive(Debug, Clone)]
pub struct Player {
    pub x: i32,
    /// Fixed for the whole game, the ship only moves sideways
    pub y: i32,
    pub lives: u32,
    /// Time left before the next shot is allowed
    pub fire_cooldown: Duration,
}

impl Player {
    pub fn new(x: i32, y: i32, lives: u32) -> Self {
        Self {
            x,
            y,
            lives,
            fire_cooldown: Duration::ZERO,
        }
    }

    pub fn move_left(&mut self, min_x: i32) {
        self.x = (self.x - PLAYER_STEP).max(min_x);
    }

    pub fn move_right(&mut self, max_x: i32) {
        self.x = (self.x + PLAYER_STEP).min(max_x);
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown.is_zero()
    }

    pub fn reset_cooldown(&mut self, cooldown: Duration) {
        self.fire_cooldown = cooldown;
    }

    pub fn update_cooldown(&mut self, elapsed: Duration) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(elapsed);
    }

    /// Removes one life, never going below zero
    pub fn take_hit(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Attempts to fire a bullet from the ship's nose.
    /// With no cooldown configured every call fires.
    pub fn try_fire(&mut self, cooldown: Option<Duration>) -> Option<Projectile> {
        if !self.can_fire() {
            return None;
        }
        if let Some(cooldown) = cooldown {
            self.reset_cooldown(cooldown);
        }

        let fire_x = self.x + (PLAYER_WIDTH - BULLET_WIDTH) / 2;
        let fire_y = self.y - BULLET_HEIGHT;
        Some(Projectile::new(fire_x, fire_y, ProjectileOwner::Player))
    }
}
