use std::time::Duration;

use log::{debug, info};

use crate::config::{ClearPolicy, GameConfig};
use crate::entities::{
    BULLET_HEIGHT, BULLET_WIDTH, ENEMY_POINTS, Formation, PLAYER_HEIGHT, PLAYER_WIDTH, Player,
    Projectile,
};
use crate::rng::RandomSource;
use crate::surface::{Color, Font, RenderSurface, Sprite};

/// Distance between the player's top edge and the bottom of the playfield
const PLAYER_BASELINE: i32 = 30;
/// Longest frame `update` will simulate; anything longer is treated as a stall
const MAX_FRAME: Duration = Duration::from_secs(1);

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Lives ran out
    Defeated,
    /// The formation reached the player's line
    Invaded,
    /// The formation was wiped out under `ClearPolicy::EndGame`
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver(Outcome),
}

/// Things that happened during a step, for sound and logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired,
    EnemyDestroyed { score: u32 },
    PlayerHit { lives: u32 },
    LevelCleared { level: u32 },
    GameOver { outcome: Outcome, score: u32 },
    Restarted,
}

/// A fixed-interval sub-step fed from elapsed time
#[derive(Debug, Clone, Copy)]
struct Cadence {
    interval: Duration,
    accumulated: Duration,
}

impl Cadence {
    fn new(interval: Duration) -> Self {
        Self {
            // A zero interval would never drain
            interval: interval.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
        }
    }

    fn due_in(&self) -> Duration {
        self.interval.saturating_sub(self.accumulated)
    }

    fn advance(&mut self, elapsed: Duration) {
        self.accumulated += elapsed;
    }

    fn take(&mut self) -> bool {
        if self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    PlayerBullets,
    EnemyBullets,
    Enemies,
}

#[derive(Debug, Clone)]
struct FlavorText {
    text: String,
    remaining: Duration,
}

/// Owns every piece of mutable game state. Drivers feed it input and elapsed
/// time and ask it to paint itself; nothing else mutates the game.
pub struct GameLoop<R> {
    config: GameConfig,
    rng: R,
    phase: GamePhase,
    player: Player,
    formation: Formation,
    bullets: Vec<Projectile>,
    enemy_bullets: Vec<Projectile>,
    score: u32,
    level: u32,
    enemy_cadence: Cadence,
    player_bullet_cadence: Cadence,
    enemy_bullet_cadence: Cadence,
    flavor: Option<FlavorText>,
    enemy_sprite: Option<Sprite>,
    events: Vec<GameEvent>,
}

impl<R: RandomSource> GameLoop<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let player = Self::spawn_player(&config);
        let formation = Self::spawn_formation(&config, 1);

        Self {
            enemy_cadence: Cadence::new(config.enemy_step()),
            player_bullet_cadence: Cadence::new(config.player_bullet_step()),
            enemy_bullet_cadence: Cadence::new(config.enemy_bullet_step()),
            config,
            rng,
            phase: GamePhase::Playing,
            player,
            formation,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            score: 0,
            level: 1,
            flavor: None,
            enemy_sprite: None,
            events: Vec::new(),
        }
    }

    fn spawn_player(config: &GameConfig) -> Player {
        let x = config.playfield_width / 2 - PLAYER_WIDTH / 2;
        let y = config.playfield_height - PLAYER_BASELINE;
        Player::new(x, y, config.initial_lives)
    }

    fn spawn_formation(config: &GameConfig, level: u32) -> Formation {
        Formation::grid(
            config.layout_for_level(level),
            config.enemy_speed_for_level(level),
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn bullets(&self) -> &[Projectile] {
        &self.bullets
    }

    pub fn enemy_bullets(&self) -> &[Projectile] {
        &self.enemy_bullets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor.as_ref().map(|f| f.text.as_str())
    }

    pub fn set_enemy_sprite(&mut self, sprite: Option<Sprite>) {
        self.enemy_sprite = sprite;
    }

    /// Hands over everything that happened since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn move_left(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.player.move_left(0);
    }

    pub fn move_right(&mut self) {
        if self.is_game_over() {
            return;
        }
        let max_x = (self.config.playfield_width - PLAYER_WIDTH).max(0);
        self.player.move_right(max_x);
    }

    /// Fires from the player's current position. Returns whether a bullet
    /// was actually launched.
    pub fn fire(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        match self.player.try_fire(self.config.fire_cooldown()) {
            Some(bullet) => {
                self.bullets.push(bullet);
                self.events.push(GameEvent::PlayerFired);
                true
            }
            None => false,
        }
    }

    /// Advances the game by `elapsed`, running each periodic step as many
    /// times as its interval fits. Steps run in the order their deadlines fall;
    /// on a tie player bullets go first, then enemy bullets, then the formation.
    pub fn update(&mut self, elapsed: Duration) {
        if self.is_game_over() {
            return;
        }

        let elapsed = elapsed.min(MAX_FRAME);
        self.player.update_cooldown(elapsed);
        self.tick_flavor(elapsed);

        let mut budget = elapsed;
        while !self.is_game_over() {
            let next = self
                .player_bullet_cadence
                .due_in()
                .min(self.enemy_bullet_cadence.due_in())
                .min(self.enemy_cadence.due_in());

            if next > budget {
                self.advance_cadences(budget);
                break;
            }
            self.advance_cadences(next);
            budget -= next;

            for step in [Step::PlayerBullets, Step::EnemyBullets, Step::Enemies] {
                if self.is_game_over() {
                    break;
                }
                let due = match step {
                    Step::PlayerBullets => self.player_bullet_cadence.take(),
                    Step::EnemyBullets => self.enemy_bullet_cadence.take(),
                    Step::Enemies => self.enemy_cadence.take(),
                };
                if due {
                    match step {
                        Step::PlayerBullets => self.advance_player_bullets(),
                        Step::EnemyBullets => self.advance_enemy_bullets(),
                        Step::Enemies => self.advance_enemies(),
                    }
                }
            }
        }
    }

    fn advance_cadences(&mut self, elapsed: Duration) {
        self.player_bullet_cadence.advance(elapsed);
        self.enemy_bullet_cadence.advance(elapsed);
        self.enemy_cadence.advance(elapsed);
    }

    fn tick_flavor(&mut self, elapsed: Duration) {
        if let Some(flavor) = &mut self.flavor {
            flavor.remaining = flavor.remaining.saturating_sub(elapsed);
            if flavor.remaining.is_zero() {
                self.flavor = None;
            }
        }
    }

    fn show_flavor(&mut self, text: String) {
        self.flavor = Some(FlavorText {
            text,
            remaining: self.config.flavor_duration(),
        });
    }

    /// One formation step: march, check for invasion, then for a cleared board
    pub fn advance_enemies(&mut self) {
        if self.is_game_over() {
            return;
        }

        if self.formation.advance(self.config.playfield_width) {
            debug!(
                "formation bounced, now heading {} at y={:?}",
                if self.formation.direction > 0 { "right" } else { "left" },
                self.formation.lowest_edge()
            );
        }

        if let Some(bottom) = self.formation.lowest_edge()
            && bottom >= self.player.y
        {
            self.end_game(Outcome::Invaded);
            return;
        }

        if self.formation.is_empty() {
            self.formation_cleared();
        }
    }

    fn formation_cleared(&mut self) {
        match self.config.clear_policy {
            ClearPolicy::NextLevel => {
                let cleared = self.level;
                self.level += 1;
                self.formation = Self::spawn_formation(&self.config, self.level);
                info!(
                    "level {} cleared, spawning {} enemies at speed {}",
                    cleared,
                    self.formation.len(),
                    self.formation.speed
                );
                self.events.push(GameEvent::LevelCleared { level: cleared });
                self.show_flavor(format!("LEVEL {}", self.level));
            }
            ClearPolicy::EndGame => self.end_game(Outcome::Cleared),
        }
    }

    /// Moves player bullets up, drops the ones that left the playfield and
    /// resolves hits. A bullet destroys at most one enemy, the first in
    /// formation order that it overlaps.
    pub fn advance_player_bullets(&mut self) {
        if self.is_game_over() {
            return;
        }

        let speed = self.config.player_bullet_speed;
        let max_y = self.config.playfield_height;
        for bullet in &mut self.bullets {
            bullet.update(speed);
        }
        self.bullets.retain(|b| !b.is_out_of_bounds(max_y));

        let formation = &mut self.formation;
        let mut destroyed = 0;
        self.bullets.retain(|bullet| {
            let bounds = bullet.bounds();
            match formation
                .enemies
                .iter()
                .position(|enemy| enemy.bounds().overlaps(&bounds))
            {
                Some(index) => {
                    formation.remove(index);
                    destroyed += 1;
                    false
                }
                None => true,
            }
        });

        for _ in 0..destroyed {
            self.score += ENEMY_POINTS;
            self.events.push(GameEvent::EnemyDestroyed { score: self.score });
            if !self.config.flavor_messages.is_empty() {
                let index = self.rng.pick(self.config.flavor_messages.len());
                let text = self.config.flavor_messages[index].clone();
                self.show_flavor(text);
            }
        }
    }

    /// Moves enemy bullets down, maybe lets a random enemy fire, then checks
    /// every enemy bullet against the player.
    pub fn advance_enemy_bullets(&mut self) {
        if self.is_game_over() {
            return;
        }

        let speed = self.config.enemy_bullet_speed;
        let max_y = self.config.playfield_height;
        for bullet in &mut self.enemy_bullets {
            bullet.update(speed);
        }
        self.enemy_bullets.retain(|b| !b.is_out_of_bounds(max_y));

        if !self.formation.is_empty() && self.rng.chance(self.config.enemy_fire_chance) {
            let index = self.rng.pick(self.formation.len());
            let bullet = self.formation.enemies[index].fire();
            self.enemy_bullets.push(bullet);
            self.events.push(GameEvent::EnemyFired);
        }

        let player = &self.player;
        let mut hits = 0;
        self.enemy_bullets.retain(|bullet| {
            let hit = hits_player(bullet, player);
            if hit {
                hits += 1;
            }
            !hit
        });

        for _ in 0..hits {
            self.player.take_hit();
            self.events.push(GameEvent::PlayerHit {
                lives: self.player.lives,
            });
            if !self.player.is_alive() {
                self.end_game(Outcome::Defeated);
                break;
            }
        }
    }

    fn end_game(&mut self, outcome: Outcome) {
        self.phase = GamePhase::GameOver(outcome);
        info!("game over ({:?}) with score {} on level {}", outcome, self.score, self.level);
        self.events.push(GameEvent::GameOver {
            outcome,
            score: self.score,
        });
    }

    /// Starts over from level 1. Only valid once the game has ended; returns
    /// whether the restart happened.
    pub fn restart(&mut self) -> bool {
        if !self.is_game_over() {
            return false;
        }

        self.phase = GamePhase::Playing;
        self.player = Self::spawn_player(&self.config);
        self.formation = Self::spawn_formation(&self.config, 1);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.score = 0;
        self.level = 1;
        self.enemy_cadence = Cadence::new(self.config.enemy_step());
        self.player_bullet_cadence = Cadence::new(self.config.player_bullet_step());
        self.enemy_bullet_cadence = Cadence::new(self.config.enemy_bullet_step());
        self.flavor = None;
        info!("game restarted");
        self.events.push(GameEvent::Restarted);
        true
    }

    /// Paints the current state. Reads only.
    pub fn render(&self, surface: &mut impl RenderSurface) {
        let (width, height) = surface.size();

        surface.draw_rect(self.player.bounds(), Color::Player);

        for bullet in &self.bullets {
            surface.draw_rect(bullet.bounds(), Color::PlayerBullet);
        }

        for enemy in &self.formation.enemies {
            match &self.enemy_sprite {
                Some(sprite) => surface.draw_sprite(sprite, enemy.bounds()),
                None => surface.draw_rect(enemy.bounds(), Color::Enemy),
            }
        }

        for bullet in &self.enemy_bullets {
            surface.draw_rect(bullet.bounds(), Color::EnemyBullet);
        }

        surface.draw_text(&format!("Score: {}", self.score), 10, 25, Font::Hud, Color::Text);
        surface.draw_text(
            &format!("Lives: {}", self.player.lives),
            10,
            50,
            Font::Hud,
            Color::Text,
        );
        surface.draw_text(&format!("Level: {}", self.level), 10, 75, Font::Hud, Color::Text);

        if let Some(flavor) = &self.flavor {
            surface.draw_text(&flavor.text, width / 2 - 60, 25, Font::Hud, Color::Flavor);
        }

        if let GamePhase::GameOver(outcome) = self.phase {
            surface.dim();
            let banner = match outcome {
                Outcome::Cleared => "YOU WIN",
                Outcome::Defeated | Outcome::Invaded => "GAME OVER",
            };
            surface.draw_text(banner, width / 2 - 90, height / 2, Font::Banner, Color::Banner);
            surface.draw_text(
                &format!("Final Score: {}", self.score),
                width / 2 - 90,
                height / 2 + 40,
                Font::Hud,
                Color::Banner,
            );
        }
    }
}

/// Horizontal overlap with the ship plus the bullet's bottom edge reaching
/// the ship's top edge while its top is still above the ship's bottom
fn hits_player(bullet: &Projectile, player: &Player) -> bool {
    bullet.x < player.x + PLAYER_WIDTH
        && bullet.x + BULLET_WIDTH > player.x
        && bullet.y + BULLET_HEIGHT >= player.y
        && bullet.y < player.y + PLAYER_HEIGHT
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::entities::{Enemy, FormationLayout, ProjectileOwner};
    use crate::geometry::Rect;

    /// Replays a fixed script of random decisions
    #[derive(Default)]
    struct ScriptedRng {
        chances: VecDeque<bool>,
        picks: VecDeque<usize>,
    }

    impl RandomSource for ScriptedRng {
        fn chance(&mut self, _p: f64) -> bool {
            self.chances.pop_front().unwrap_or(false)
        }

        fn pick(&mut self, len: usize) -> usize {
            self.picks.pop_front().unwrap_or(0) % len
        }
    }

    fn quiet_game() -> GameLoop<ScriptedRng> {
        GameLoop::new(GameConfig::default(), ScriptedRng::default())
    }

    #[derive(Default)]
    struct RecordingSurface {
        rects: Vec<(Rect, Color)>,
        texts: Vec<(String, Font)>,
        sprites: Vec<Rect>,
        dimmed: bool,
    }

    impl RenderSurface for RecordingSurface {
        fn size(&self) -> (i32, i32) {
            (640, 400)
        }

        fn draw_rect(&mut self, rect: Rect, color: Color) {
            self.rects.push((rect, color));
        }

        fn draw_text(&mut self, text: &str, _x: i32, _y: i32, font: Font, _color: Color) {
            self.texts.push((text.to_string(), font));
        }

        fn draw_sprite(&mut self, _sprite: &Sprite, rect: Rect) {
            self.sprites.push(rect);
        }

        fn dim(&mut self) {
            self.dimmed = true;
        }
    }

    #[test]
    fn test_new_game_state() {
        let game = quiet_game();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.player().x, 305);
        assert_eq!(game.player().y, 370);
        assert_eq!(game.player().lives, 3);
        assert_eq!(game.formation().len(), 12);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_bullet_destroys_first_overlapping_enemy() {
        let mut game = quiet_game();
        game.formation = Formation::new(vec![Enemy::new(30, 60), Enemy::new(70, 60)], 2);
        game.bullets = vec![Projectile::new(35, 55, ProjectileOwner::Player)];

        game.advance_player_bullets();

        assert_eq!(game.formation.enemies, vec![Enemy::new(70, 60)]);
        assert_eq!(game.score(), 10);
        assert!(game.bullets().is_empty());
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::EnemyDestroyed { score: 10 }]
        );
    }

    #[test]
    fn test_one_bullet_kills_one_enemy_in_formation_order() {
        let mut game = quiet_game();
        // Two stacked enemies both overlapped by the same bullet
        game.formation = Formation::new(vec![Enemy::new(30, 60), Enemy::new(30, 66)], 2);
        game.bullets = vec![Projectile::new(35, 70, ProjectileOwner::Player)];

        game.advance_player_bullets();

        assert_eq!(game.formation.enemies, vec![Enemy::new(30, 66)]);
        assert_eq!(game.score(), 10);
    }

    #[test]
    fn test_missing_bullet_keeps_flying() {
        let mut game = quiet_game();
        game.formation = Formation::new(vec![Enemy::new(30, 60)], 2);
        game.bullets = vec![Projectile::new(200, 200, ProjectileOwner::Player)];

        game.advance_player_bullets();

        assert_eq!(game.formation.len(), 1);
        assert_eq!(game.bullets(), &[Projectile::new(200, 196, ProjectileOwner::Player)]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_bullet_leaving_the_top_is_dropped() {
        let mut game = quiet_game();
        game.bullets = vec![Projectile::new(600, 2, ProjectileOwner::Player)];
        game.advance_player_bullets();
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn test_kill_shows_flavor_text() {
        let mut game = quiet_game();
        game.rng.picks.push_back(2);
        game.formation = Formation::new(vec![Enemy::new(30, 60), Enemy::new(70, 60)], 2);
        game.bullets = vec![Projectile::new(35, 55, ProjectileOwner::Player)];

        game.advance_player_bullets();
        assert_eq!(game.flavor_text(), Some("Invader down!"));

        game.update(Duration::from_millis(999));
        assert!(game.flavor_text().is_some());
        game.update(Duration::from_millis(1));
        assert_eq!(game.flavor_text(), None);
    }

    #[test]
    fn test_enemy_fires_from_picked_enemy() {
        let mut game = quiet_game();
        game.rng.chances.push_back(true);
        game.rng.picks.push_back(1);
        game.formation = Formation::new(vec![Enemy::new(30, 60), Enemy::new(70, 60)], 2);

        game.advance_enemy_bullets();

        assert_eq!(
            game.enemy_bullets(),
            &[Projectile::new(82, 75, ProjectileOwner::Enemy)]
        );
        assert_eq!(game.drain_events(), vec![GameEvent::EnemyFired]);
    }

    #[test]
    fn test_empty_formation_never_fires() {
        let mut game = quiet_game();
        game.rng.chances.push_back(true);
        game.formation = Formation::new(Vec::new(), 2);

        game.advance_enemy_bullets();

        assert!(game.enemy_bullets().is_empty());
        // The chance roll is skipped entirely
        assert_eq!(game.rng.chances.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut game = quiet_game();
        game.enemy_bullets = vec![Projectile::new(310, 355, ProjectileOwner::Enemy)];

        game.advance_enemy_bullets();

        assert!(game.enemy_bullets().is_empty());
        assert_eq!(game.player().lives, 2);
        assert!(!game.is_game_over());
        assert_eq!(game.drain_events(), vec![GameEvent::PlayerHit { lives: 2 }]);
    }

    #[test]
    fn test_enemy_bullet_beside_player_misses() {
        let mut game = quiet_game();
        // Right edge of the bullet touches the ship's left edge
        game.enemy_bullets = vec![Projectile::new(300, 355, ProjectileOwner::Enemy)];

        game.advance_enemy_bullets();

        assert_eq!(game.player().lives, 3);
        assert_eq!(game.enemy_bullets().len(), 1);
    }

    #[test]
    fn test_enemy_bullet_below_player_misses() {
        let mut game = quiet_game();
        // Already past the ship's bottom edge at y=380
        game.enemy_bullets = vec![Projectile::new(310, 375, ProjectileOwner::Enemy)];

        game.advance_enemy_bullets();

        assert_eq!(game.player().lives, 3);
        assert_eq!(game.enemy_bullets()[0].y, 385);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut game = quiet_game();
        game.player.lives = 1;
        game.enemy_bullets = vec![Projectile::new(310, 355, ProjectileOwner::Enemy)];

        game.advance_enemy_bullets();

        assert_eq!(game.player().lives, 0);
        assert_eq!(game.phase(), GamePhase::GameOver(Outcome::Defeated));
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::PlayerHit { lives: 0 },
                GameEvent::GameOver {
                    outcome: Outcome::Defeated,
                    score: 0
                }
            ]
        );
    }

    #[test]
    fn test_formation_reaching_player_line_ends_the_game() {
        let mut game = quiet_game();
        // Bottom edge at 360, one drop away from the player's top at 370
        game.formation = Formation::new(vec![Enemy::new(620, 345)], 2);

        game.advance_enemies();

        assert_eq!(game.formation.enemies[0].y, 355);
        assert_eq!(game.phase(), GamePhase::GameOver(Outcome::Invaded));
    }

    #[test]
    fn test_cleared_formation_advances_level() {
        let mut game = quiet_game();
        game.formation = Formation::new(Vec::new(), 2);

        game.advance_enemies();

        assert_eq!(game.level(), 2);
        assert_eq!(game.formation().len(), 18);
        assert_eq!(game.formation().speed, 3);
        assert_eq!(game.flavor_text(), Some("LEVEL 2"));
        assert!(!game.is_game_over());
        assert_eq!(game.drain_events(), vec![GameEvent::LevelCleared { level: 1 }]);
    }

    #[test]
    fn test_cleared_formation_can_end_the_game() {
        let config = GameConfig {
            clear_policy: ClearPolicy::EndGame,
            ..GameConfig::default()
        };
        let mut game = GameLoop::new(config, ScriptedRng::default());
        game.formation = Formation::new(Vec::new(), 2);

        game.advance_enemies();

        assert_eq!(game.level(), 1);
        assert_eq!(game.phase(), GamePhase::GameOver(Outcome::Cleared));
    }

    #[test]
    fn test_steps_are_inert_after_game_over() {
        let mut game = quiet_game();
        game.end_game(Outcome::Defeated);
        let x = game.player().x;
        game.bullets = vec![Projectile::new(35, 55, ProjectileOwner::Player)];

        game.move_left();
        game.move_right();
        assert!(!game.fire());
        game.advance_player_bullets();
        game.advance_enemies();
        game.update(Duration::from_secs(5));

        assert_eq!(game.player().x, x);
        assert_eq!(game.bullets(), &[Projectile::new(35, 55, ProjectileOwner::Player)]);
        assert_eq!(game.formation().enemies[0], Enemy::new(30, 60));
    }

    #[test]
    fn test_update_runs_each_cadence() {
        let mut game = quiet_game();
        assert!(game.fire());

        // 200ms: four player-bullet steps, one enemy-bullet step, no enemy step
        game.update(Duration::from_millis(200));
        assert_eq!(game.bullets()[0].y, 360 - 16);
        assert_eq!(game.formation().enemies[0].x, 30);

        // Crossing 500ms triggers the first formation step
        game.update(Duration::from_millis(300));
        assert_eq!(game.bullets()[0].y, 360 - 40);
        assert_eq!(game.formation().enemies[0].x, 32);
    }

    #[test]
    fn test_update_accumulates_small_frames() {
        let mut game = quiet_game();
        for _ in 0..50 {
            game.update(Duration::from_millis(10));
        }
        assert_eq!(game.formation().enemies[0].x, 32);
    }

    #[test]
    fn test_update_clamps_long_frames() {
        let mut game = quiet_game();
        game.update(Duration::from_secs(60));
        // Only one second worth of formation steps
        assert_eq!(game.formation().enemies[0].x, 34);
    }

    #[test]
    fn test_update_stops_stepping_once_game_ends() {
        let mut game = quiet_game();
        game.player.lives = 1;
        game.enemy_bullets = vec![Projectile::new(310, 355, ProjectileOwner::Enemy)];

        // The enemy-bullet step at 200ms kills the player
        game.update(Duration::from_millis(600));

        assert!(game.is_game_over());
        // The formation step due at 500ms never ran
        assert_eq!(game.formation().enemies[0].x, 30);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut game = quiet_game();
        assert!(!game.restart());

        game.score = 120;
        game.level = 3;
        game.player.lives = 0;
        game.player.x = 0;
        game.bullets = vec![Projectile::new(35, 55, ProjectileOwner::Player)];
        game.enemy_bullets = vec![Projectile::new(35, 55, ProjectileOwner::Enemy)];
        game.formation.advance(640);
        game.formation.remove(0);
        game.formation.direction = -1;
        game.formation.speed = 5;
        game.end_game(Outcome::Defeated);
        game.drain_events();

        assert!(game.restart());
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.player().lives, 3);
        assert_eq!(game.player().x, 305);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert!(game.bullets().is_empty());
        assert!(game.enemy_bullets().is_empty());
        let fresh = Formation::grid(FormationLayout::new(2, 6), 2);
        assert_eq!(game.formation().enemies, fresh.enemies);
        assert_eq!(game.formation().direction, 1);
        assert_eq!(game.formation().speed, 2);
        assert_eq!(game.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_render_draws_every_entity() {
        let mut game = quiet_game();
        game.fire();
        game.enemy_bullets = vec![Projectile::new(100, 200, ProjectileOwner::Enemy)];

        let mut surface = RecordingSurface::default();
        game.render(&mut surface);

        let count = |color| surface.rects.iter().filter(|(_, c)| *c == color).count();
        assert_eq!(count(Color::Player), 1);
        assert_eq!(count(Color::PlayerBullet), 1);
        assert_eq!(count(Color::Enemy), 12);
        assert_eq!(count(Color::EnemyBullet), 1);
        assert!(surface.sprites.is_empty());
        assert!(!surface.dimmed);
        let texts: Vec<&str> = surface.texts.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["Score: 0", "Lives: 3", "Level: 1"]);
    }

    #[test]
    fn test_render_uses_sprite_when_available() {
        let mut game = quiet_game();
        game.set_enemy_sprite(Sprite::new(1, 1, vec![[255, 255, 255, 255]]));

        let mut surface = RecordingSurface::default();
        game.render(&mut surface);

        assert_eq!(surface.sprites.len(), 12);
        assert!(surface.rects.iter().all(|(_, c)| *c != Color::Enemy));
    }

    #[test]
    fn test_render_game_over_overlay() {
        let mut game = quiet_game();
        game.end_game(Outcome::Invaded);

        let mut surface = RecordingSurface::default();
        game.render(&mut surface);

        assert!(surface.dimmed);
        assert!(
            surface
                .texts
                .iter()
                .any(|(t, f)| t == "GAME OVER" && *f == Font::Banner)
        );
    }
}
