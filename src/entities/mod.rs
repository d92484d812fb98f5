mod enemy;
mod formation;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::{ENEMY_HEIGHT, ENEMY_POINTS, ENEMY_WIDTH, Enemy};
pub use formation::{Formation, FormationLayout};
pub use player::{PLAYER_HEIGHT, PLAYER_STEP, PLAYER_WIDTH, Player};
pub use projectile::{BULLET_HEIGHT, BULLET_WIDTH, Projectile, ProjectileOwner};
