use super::projectile::{BULLET_WIDTH, Projectile, ProjectileOwner};
use crate::geometry::Rect;

pub const ENEMY_WIDTH: i32 = 30;
pub const ENEMY_HEIGHT: i32 = 15;
/// Score awarded for every enemy shot down
pub const ENEMY_POINTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

impl Enemy {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    /// Drops a bullet from the center of the enemy's bottom edge
    pub fn fire(&self) -> Projectile {
        let fire_x = self.x + (ENEMY_WIDTH - BULLET_WIDTH) / 2;
        let fire_y = self.y + ENEMY_HEIGHT;
        Projectile::new(fire_x, fire_y, ProjectileOwner::Enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_bounds() {
        let enemy = Enemy::new(30, 60);
        assert_eq!(enemy.bounds(), Rect::new(30, 60, 30, 15));
    }

    #[test]
    fn test_enemy_fires_from_center_bottom() {
        let enemy = Enemy::new(30, 60);
        let bullet = enemy.fire();
        assert_eq!(bullet.owner, ProjectileOwner::Enemy);
        assert_eq!(bullet.x, 42);
        assert_eq!(bullet.y, 75);
    }
}
