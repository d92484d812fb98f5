use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};

use crate::game::GameEvent;

type Sound = Buffered<Decoder<BufReader<File>>>;

/// Plays sound effects for game events. Every part is optional: without an
/// output device or sound files the game simply stays silent.
#[derive(Default)]
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    fire: Option<Sound>,
    explosion: Option<Sound>,
    hit: Option<Sound>,
}

impl AudioManager {
    /// Opens the default output device and pre-loads `fire.wav`,
    /// `explosion.wav` and `hit.wav` from `sound_dir`
    pub fn new(sound_dir: &Path) -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().wrap_err("no audio output device")?;

        Ok(Self {
            output: Some((stream, stream_handle)),
            fire: load_sound(&sound_dir.join("fire.wav")),
            explosion: load_sound(&sound_dir.join("explosion.wav")),
            hit: load_sound(&sound_dir.join("hit.wav")),
        })
    }

    /// Sets up audio, falling back to silence on any failure
    pub fn new_or_silent(sound_dir: Option<&Path>) -> Self {
        let Some(sound_dir) = sound_dir else {
            return Self::default();
        };
        Self::new(sound_dir).unwrap_or_else(|err| {
            warn!("continuing without audio: {err:#}");
            Self::default()
        })
    }

    pub fn handle_event(&self, event: &GameEvent) {
        match event {
            GameEvent::PlayerFired => self.play(self.fire.as_ref(), 0.3),
            GameEvent::EnemyFired => self.play(self.fire.as_ref(), 0.05),
            GameEvent::EnemyDestroyed { .. } => self.play(self.explosion.as_ref(), 0.4),
            GameEvent::PlayerHit { .. } | GameEvent::GameOver { .. } => self.play(self.hit.as_ref(), 0.5),
            GameEvent::LevelCleared { .. } | GameEvent::Restarted => {}
        }
    }

    fn play(&self, sound: Option<&Sound>, volume: f32) {
        let (Some((_, stream_handle)), Some(sound)) = (&self.output, sound) else {
            return;
        };
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(stream_handle) {
            sink.set_volume(volume);
            // Clone the buffered source (fast - just clones references)
            sink.append(sound.clone());
            sink.detach();
        }
    }
}

fn load_sound(path: &Path) -> Option<Sound> {
    let file = File::open(path).ok()?;
    match Decoder::new(BufReader::new(file)) {
        Ok(source) => {
            info!("loaded sound {}", path.display());
            Some(source.buffered())
        }
        Err(err) => {
            warn!("could not decode {}: {err}", path.display());
            None
        }
    }
}
