// Library exports for testing
pub use config::{ClearPolicy, GameConfig};
pub use entities::{Enemy, Formation, FormationLayout, Player, Projectile, ProjectileOwner};
pub use game::{GameEvent, GameLoop, GamePhase, Outcome};
pub use geometry::Rect;
pub use rng::RandomSource;
pub use surface::{Color, Font, RenderSurface, Sprite};

pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod entities;
pub mod game;
pub mod geometry;
pub mod input;
pub mod renderer;
pub mod rng;
pub mod surface;
