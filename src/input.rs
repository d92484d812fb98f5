use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// How often a held key re-sends its action
pub const HOLD_REPEAT: Duration = Duration::from_millis(60);

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Fire,
    Pause,
    Resume,
    Restart,
    Quit,
}

/// Which keys mean something right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Playing,
    Paused,
    GameOver,
}

/// Tracks the state of keys that can be held down for continuous input
#[derive(Debug, Default)]
struct KeyState {
    left: bool,
    right: bool,
    fire: bool,
}

/// Manages input polling and translates raw key events into game actions
pub struct InputManager {
    key_state: KeyState,
    oneshot_actions: Vec<InputAction>,
    /// Whether the terminal reports key releases. Without them held keys
    /// cannot be tracked and the OS auto-repeat drives movement instead.
    tracks_release: bool,
    repeat_timer: Duration,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(false)
    }
}

impl InputManager {
    pub fn new(tracks_release: bool) -> Self {
        Self {
            key_state: KeyState::default(),
            oneshot_actions: Vec::new(),
            tracks_release,
            repeat_timer: Duration::ZERO,
        }
    }

    /// Drains every pending terminal event without blocking
    pub fn poll_events(&mut self, mode: InputMode) -> color_eyre::Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    self.handle_key_event(key_event, mode);
                }
                Event::Mouse(_) => {
                    // Mouse events currently ignored
                }
                Event::Resize(_, _) => {
                    // The next draw picks up the new size
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Processes a key event and updates key state and one-shot actions
    pub fn handle_key_event(&mut self, key_event: KeyEvent, mode: InputMode) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, mode),
            // Enhanced terminals report auto-repeat separately; we repeat held
            // keys ourselves so those are redundant
            KeyEventKind::Repeat if !self.tracks_release => self.handle_key_press(key_event, mode),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
            _ => {}
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, mode: InputMode) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        // State-specific one-shot actions
        match mode {
            InputMode::Playing => {
                if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
                    self.oneshot_actions.push(InputAction::Pause);
                    return;
                }
            }
            InputMode::Paused => {
                if matches!(key_event.code, KeyCode::Char('p') | KeyCode::Char('P')) {
                    self.oneshot_actions.push(InputAction::Resume);
                }
                return;
            }
            InputMode::GameOver => {
                if matches!(key_event.code, KeyCode::Char('r') | KeyCode::Char('R')) {
                    self.oneshot_actions.push(InputAction::Restart);
                }
                return;
            }
        }

        let action = match key_event.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = true;
                self.key_state.right = false;
                InputAction::MoveLeft
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = true;
                self.key_state.left = false;
                InputAction::MoveRight
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = true;
                InputAction::Fire
            }
            // Anything else is ignored
            _ => return,
        };

        // The press itself acts immediately, repeats start one interval later
        self.oneshot_actions.push(action);
        self.repeat_timer = Duration::ZERO;
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.key_state.left = false;
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.key_state.right = false;
            }
            KeyCode::Char(' ') => {
                self.key_state.fire = false;
            }
            _ => {}
        }
    }

    /// Returns this frame's actions: one-shot presses first, then repeats
    /// for keys still held after `elapsed` more time
    pub fn get_actions(&mut self, elapsed: Duration, mode: InputMode) -> Vec<InputAction> {
        let mut actions = std::mem::take(&mut self.oneshot_actions);

        if mode != InputMode::Playing || !self.tracks_release {
            self.key_state = KeyState::default();
            self.repeat_timer = Duration::ZERO;
            return actions;
        }

        self.repeat_timer += elapsed;
        if self.repeat_timer >= HOLD_REPEAT {
            self.repeat_timer = Duration::ZERO;
            if self.key_state.left {
                actions.push(InputAction::MoveLeft);
            }
            if self.key_state.right {
                actions.push(InputAction::MoveRight);
            }
            if self.key_state.fire {
                actions.push(InputAction::Fire);
            }
        }

        actions
    }
}
