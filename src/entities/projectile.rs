use crate::geometry::Rect;

pub const BULLET_WIDTH: i32 = 5;
pub const BULLET_HEIGHT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    pub owner: ProjectileOwner,
}

impl Projectile {
    pub fn new(x: i32, y: i32, owner: ProjectileOwner) -> Self {
        Self { x, y, owner }
    }

    /// Player shots travel up, enemy shots travel down
    pub fn update(&mut self, speed: i32) {
        match self.owner {
            ProjectileOwner::Player => self.y -= speed,
            ProjectileOwner::Enemy => self.y += speed,
        }
    }

    pub fn is_out_of_bounds(&self, max_y: i32) -> bool {
        match self.owner {
            ProjectileOwner::Player => self.y < 0,
            ProjectileOwner::Enemy => self.y >= max_y,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, BULLET_WIDTH, BULLET_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new() {
        let projectile = Projectile::new(10, 10, ProjectileOwner::Player);
        assert_eq!(projectile.x, 10);
        assert_eq!(projectile.y, 10);
        assert_eq!(projectile.owner, ProjectileOwner::Player);
        assert_eq!(projectile.bounds(), Rect::new(10, 10, 5, 10));
    }

    #[test]
    fn test_player_projectile_moves_up() {
        let mut projectile = Projectile::new(10, 100, ProjectileOwner::Player);
        projectile.update(4);
        assert_eq!(projectile.y, 96);
    }

    #[test]
    fn test_enemy_projectile_moves_down() {
        let mut projectile = Projectile::new(10, 100, ProjectileOwner::Enemy);
        projectile.update(10);
        assert_eq!(projectile.y, 110);
    }

    #[test]
    fn test_projectile_out_of_bounds() {
        // Player shots leave through the top only once y is negative
        let projectile = Projectile::new(10, 0, ProjectileOwner::Player);
        assert!(!projectile.is_out_of_bounds(400));
        let projectile = Projectile::new(10, -1, ProjectileOwner::Player);
        assert!(projectile.is_out_of_bounds(400));

        let projectile = Projectile::new(10, 399, ProjectileOwner::Enemy);
        assert!(!projectile.is_out_of_bounds(400));
        let projectile = Projectile::new(10, 400, ProjectileOwner::Enemy);
        assert!(projectile.is_out_of_bounds(400));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_moves_in_correct_direction(
                initial_x in 0i32..600,
                initial_y in 0i32..400,
                speed in 1i32..20,
                owner in prop::sample::select(vec![ProjectileOwner::Player, ProjectileOwner::Enemy])
            ) {
                let mut projectile = Projectile::new(initial_x, initial_y, owner);
                projectile.update(speed);

                prop_assert_eq!(projectile.x, initial_x);
                match owner {
                    ProjectileOwner::Player => prop_assert_eq!(projectile.y, initial_y - speed),
                    ProjectileOwner::Enemy => prop_assert_eq!(projectile.y, initial_y + speed),
                }
            }
        }
    }
}
