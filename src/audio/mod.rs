mod pattern;
mod tone;

#[cfg(feature = "sound")]
mod device;

use std::time::{Duration, Instant};

use crate::morse::MorseTable;

#[cfg(feature = "sound")]
pub use device::DeviceAudio;
pub use pattern::{schedule, schedule_duration_ms, PatternPlayer, PlaybackTiming, Segment};
pub use tone::ToneGenerator;

/// Sound output as seen by the game. Every call returns immediately and
/// stopping something that is not playing is a no-op.
pub trait Audio {
    /// Start the sidetone for a held key
    fn start_tone(&mut self);
    fn stop_tone(&mut self);
    fn is_tone_active(&self) -> bool;
    /// Play the morse pattern for `c` in the background
    fn play_character_pattern(&mut self, c: char);
    fn is_pattern_playback_active(&self) -> bool;
    fn cancel_pattern(&mut self);
}

impl<A: Audio + ?Sized> Audio for Box<A> {
    fn start_tone(&mut self) {
        (**self).start_tone()
    }

    fn stop_tone(&mut self) {
        (**self).stop_tone()
    }

    fn is_tone_active(&self) -> bool {
        (**self).is_tone_active()
    }

    fn play_character_pattern(&mut self, c: char) {
        (**self).play_character_pattern(c)
    }

    fn is_pattern_playback_active(&self) -> bool {
        (**self).is_pattern_playback_active()
    }

    fn cancel_pattern(&mut self) {
        (**self).cancel_pattern()
    }
}

/// Produces no sound but keeps the same busy timing a sound device would,
/// so receive rounds still wait for the pattern to "finish".
#[derive(Debug)]
pub struct SilentAudio {
    table: MorseTable,
    timing: PlaybackTiming,
    tone_active: bool,
    pattern_until: Option<Instant>,
}

impl SilentAudio {
    pub fn new(table: MorseTable, timing: PlaybackTiming) -> Self {
        Self {
            table,
            timing,
            tone_active: false,
            pattern_until: None,
        }
    }
}

impl Audio for SilentAudio {
    fn start_tone(&mut self) {
        self.tone_active = true;
    }

    fn stop_tone(&mut self) {
        self.tone_active = false;
    }

    fn is_tone_active(&self) -> bool {
        self.tone_active
    }

    fn play_character_pattern(&mut self, c: char) {
        if let Some(symbols) = self.table.encode(c) {
            let total = schedule_duration_ms(&schedule(symbols, &self.timing));
            self.pattern_until = Some(Instant::now() + Duration::from_millis(total));
        }
    }

    fn is_pattern_playback_active(&self) -> bool {
        self.pattern_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false)
    }

    fn cancel_pattern(&mut self) {
        self.pattern_until = None;
    }
}

/// Test double that records every request and lets the caller decide when
/// pattern playback ends.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingAudio {
    pub tone_active: bool,
    pub pattern_active: bool,
    pub tone_starts: usize,
    pub tone_stops: usize,
    pub cancels: usize,
    pub played: Vec<char>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish_pattern(&mut self) {
        self.pattern_active = false;
    }
}

impl Audio for RecordingAudio {
    fn start_tone(&mut self) {
        self.tone_active = true;
        self.tone_starts += 1;
    }

    fn stop_tone(&mut self) {
        self.tone_active = false;
        self.tone_stops += 1;
    }

    fn is_tone_active(&self) -> bool {
        self.tone_active
    }

    fn play_character_pattern(&mut self, c: char) {
        self.played.push(c);
        self.pattern_active = true;
    }

    fn is_pattern_playback_active(&self) -> bool {
        self.pattern_active
    }

    fn cancel_pattern(&mut self) {
        self.pattern_active = false;
        self.cancels += 1;
    }
}
