//! Audio triggers driven by simulation events
//!
//! The game needs two one-shot effects and a looping background track.
//! Playback itself belongs to a host-provided [`AudioSink`]; a sink that
//! cannot play simply does nothing.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Pickup captured
    Collect,
    /// Craft hit a hazard or a riddle was answered wrong
    Crash,
}

/// Looping tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Music {
    Background,
}

/// Playback backend
pub trait AudioSink {
    /// Fire-and-forget one-shot
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start looping a track, replacing whatever is playing
    fn loop_music(&mut self, track: Music, volume: f32);
}

/// Silent sink for hosts without audio
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn loop_music(&mut self, _track: Music, _volume: f32) {}
}

/// Sink that logs and counts triggers instead of playing them
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    pub collects: u32,
    pub crashes: u32,
    pub music: Option<Music>,
    /// Volume of the most recent trigger
    pub last_volume: f32,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {effect:?} at {volume:.2}");
        self.last_volume = volume;
        match effect {
            SoundEffect::Collect => self.collects += 1,
            SoundEffect::Crash => self.crashes += 1,
        }
    }

    fn loop_music(&mut self, track: Music, volume: f32) {
        log::debug!("music {track:?} at {volume:.2}");
        self.last_volume = volume;
        self.music = Some(track);
    }
}

/// Sound effect for a simulation event, if it has one
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::PickupCollected { .. } => Some(SoundEffect::Collect),
        GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
        _ => None,
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Start the background loop
    pub fn start_music(&mut self) {
        let vol = self.effective_volume(self.music_volume);
        self.sink.loop_music(Music::Background, vol);
    }

    /// Play the effects for a batch of drained events
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(sound_for) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            sound_for(&GameEvent::PickupCollected { score: 10 }),
            Some(SoundEffect::Collect)
        );
        assert_eq!(
            sound_for(&GameEvent::Crashed { crashes: 1 }),
            Some(SoundEffect::Crash)
        );
        assert_eq!(sound_for(&GameEvent::ChallengeOpened), None);
    }

    #[test]
    fn test_dispatch_counts() {
        let mut audio = AudioManager::new(LogAudio::default());
        audio.start_music();
        audio.dispatch(&[
            GameEvent::PickupCollected { score: 10 },
            GameEvent::Crashed { crashes: 1 },
            GameEvent::PickupCollected { score: 20 },
            GameEvent::LevelCleared {
                level: 0,
                score: 100,
            },
        ]);
        assert_eq!(audio.sink().collects, 2);
        assert_eq!(audio.sink().crashes, 1);
        assert_eq!(audio.sink().music, Some(Music::Background));
    }

    #[test]
    fn test_muted_drops_effects() {
        let mut audio = AudioManager::new(LogAudio::default());
        audio.set_muted(true);
        audio.dispatch(&[GameEvent::PickupCollected { score: 10 }]);
        assert_eq!(audio.sink().collects, 0);

        audio.set_muted(false);
        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::Crash);
        assert_eq!(audio.sink().crashes, 0);
    }

    #[test]
    fn test_channel_volumes_scale_by_master() {
        let mut audio = AudioManager::new(LogAudio::default());
        audio.set_master_volume(0.5);
        audio.set_music_volume(0.4);
        audio.start_music();
        assert!((audio.sink().last_volume - 0.2).abs() < 1e-6);

        audio.set_master_volume(2.0);
        audio.play(SoundEffect::Collect);
        assert!((audio.sink().last_volume - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_null_sink_is_silent() {
        let mut audio = AudioManager::new(NullAudio);
        audio.start_music();
        audio.play(SoundEffect::Collect);
    }
}
