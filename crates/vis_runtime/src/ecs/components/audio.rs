//! Sound and music components

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Sound effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundComponent {
    /// Playback volume, 0 to 1
    pub volume: f32,
}

impl Default for SoundComponent {
    fn default() -> Self {
        Self { volume: 1.0 }
    }
}

impl Component for SoundComponent {}

/// Streamed music track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicComponent {
    /// Restart the track when it ends
    pub looping: bool,
    /// Start playing when the scene starts
    pub play_on_start: bool,
    /// Playback volume, 0 to 1
    pub volume: f32,
}

impl Default for MusicComponent {
    fn default() -> Self {
        Self { looping: false, play_on_start: false, volume: 1.0 }
    }
}

impl Component for MusicComponent {}
