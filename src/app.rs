use color_eyre::Result;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::assets::load_sprite;
use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::game::{GameEvent, GameLoop};
use crate::input::{InputAction, InputManager, InputMode};
use crate::renderer::{GameRenderer, RenderView};

/// The main application: wires terminal input, the clock, sound and drawing
/// to one `GameLoop`.
pub struct App {
    running: bool,
    /// Pausing only stops feeding time to the game
    paused: bool,
    game: GameLoop<StdRng>,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`]. `tracks_release` tells the input
    /// layer whether the terminal reports key releases.
    pub fn new(config: GameConfig, tracks_release: bool) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                info!("using fixed seed {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        let sprite = config
            .enemy_sprite
            .as_deref()
            .and_then(|path| match load_sprite(path) {
                Ok(sprite) => {
                    info!("loaded enemy sprite {}", path.display());
                    Some(sprite)
                }
                Err(err) => {
                    warn!("{err:#}; drawing enemies as rectangles");
                    None
                }
            });
        let audio_manager = AudioManager::new_or_silent(config.sound_dir.as_deref());

        let mut game = GameLoop::new(config, rng);
        game.set_enemy_sprite(sprite);

        Self {
            running: true,
            paused: false,
            game,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager: InputManager::new(tracks_release),
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    fn input_mode(&self) -> InputMode {
        if self.game.is_game_over() {
            InputMode::GameOver
        } else if self.paused {
            InputMode::Paused
        } else {
            InputMode::Playing
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            // Poll input events and get actions
            let mode = self.input_mode();
            self.input_manager.poll_events(mode)?;
            let actions = self.input_manager.get_actions(frame_time, mode);
            self.process_actions(&actions);

            if !self.paused {
                self.game.update(frame_time);
            }

            for event in self.game.drain_events() {
                self.handle_game_event(&event);
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    paused: self.paused,
                    fps: self.fps,
                };
                self.renderer.render(frame, &self.game, &view);
            })?;

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    info!("quit requested");
                    self.running = false;
                }
                InputAction::Pause => {
                    self.paused = true;
                }
                InputAction::Resume => {
                    self.paused = false;
                }
                InputAction::Restart => {
                    if self.game.restart() {
                        self.paused = false;
                    }
                }
                InputAction::MoveLeft => self.game.move_left(),
                InputAction::MoveRight => self.game.move_right(),
                InputAction::Fire => {
                    self.game.fire();
                }
            }
        }
    }

    fn handle_game_event(&self, event: &GameEvent) {
        debug!("{event:?}");
        self.audio_manager.handle_event(event);
    }
}
