//! Sound effects as fire-and-forget requests.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Player attack.
    Bite,
    SpellHit,
    /// Slime melee landing on the player.
    EnemyBite,
    PlayerDeath,
    EnemyDeath,
    /// The cat greets the player on reaching the finish.
    Meow,
    /// A bear trap snapping shut.
    Clang,
}

pub trait AudioSink: Send {
    fn play(&mut self, sound: Sound);
}

/// Logs each request; used by the headless runner.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, sound: Sound) {
        log::debug!("Sound: {:?}", sound);
    }
}

/// Keeps every request in order, for inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    played: std::sync::Arc<std::sync::Mutex<Vec<Sound>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Sound> {
        self.played
            .lock()
            .map(|sounds| sounds.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn count(&self, sound: Sound) -> usize {
        self.played().iter().filter(|&&played| played == sound).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        match self.played.lock() {
            Ok(mut sounds) => sounds.push(sound),
            Err(poisoned) => poisoned.into_inner().push(sound),
        }
    }
}
