use std::collections::VecDeque;

use crate::morse::MorseSymbol;

/// Element lengths used when a character is played back to the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackTiming {
    pub dot_ms: u64,
    pub dash_ms: u64,
    pub symbol_gap_ms: u64,
    pub letter_gap_ms: u64,
}

impl PlaybackTiming {
    /// Standard 1:3 weighting derived from the dot length
    pub fn from_dot(dot_ms: u64) -> Self {
        Self {
            dot_ms,
            dash_ms: 3 * dot_ms,
            symbol_gap_ms: dot_ms,
            letter_gap_ms: 3 * dot_ms,
        }
    }
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self::from_dot(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub tone: bool,
    pub duration_ms: u64,
}

/// Tone/silence segments for one character, ending with a letter gap
pub fn schedule(symbols: &[MorseSymbol], timing: &PlaybackTiming) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(symbols.len() * 2 + 1);
    for (i, symbol) in symbols.iter().enumerate() {
        let duration_ms = match symbol {
            MorseSymbol::Dot => timing.dot_ms,
            MorseSymbol::Dash => timing.dash_ms,
        };
        segments.push(Segment {
            tone: true,
            duration_ms,
        });
        if i + 1 < symbols.len() {
            segments.push(Segment {
                tone: false,
                duration_ms: timing.symbol_gap_ms,
            });
        }
    }
    if !segments.is_empty() {
        segments.push(Segment {
            tone: false,
            duration_ms: timing.letter_gap_ms,
        });
    }
    segments
}

pub fn schedule_duration_ms(segments: &[Segment]) -> u64 {
    segments.iter().map(|s| s.duration_ms).sum()
}

/// Walks a schedule one output sample at a time
#[derive(Debug, Default)]
pub struct PatternPlayer {
    segments: VecDeque<Segment>,
    samples_left: u64,
    tone: bool,
}

impl PatternPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is playing with `segments`
    pub fn load(&mut self, segments: Vec<Segment>) {
        self.segments = segments.into();
        self.samples_left = 0;
        self.tone = false;
    }

    pub fn cancel(&mut self) {
        self.segments.clear();
        self.samples_left = 0;
        self.tone = false;
    }

    pub fn is_active(&self) -> bool {
        self.samples_left > 0 || !self.segments.is_empty()
    }

    /// Advance one sample and report whether the tone is keyed for it
    pub fn next_sample(&mut self, sample_rate: u32) -> bool {
        while self.samples_left == 0 {
            match self.segments.pop_front() {
                Some(segment) => {
                    self.tone = segment.tone;
                    self.samples_left = segment.duration_ms * u64::from(sample_rate) / 1000;
                }
                None => {
                    self.tone = false;
                    return false;
                }
            }
        }
        self.samples_left -= 1;
        self.tone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morse::parse_pattern;

    #[test]
    fn schedule_for_a() {
        let timing = PlaybackTiming::default();
        let segments = schedule(&parse_pattern(".-").unwrap(), &timing);
        let expected: Vec<(bool, u64)> = vec![(true, 100), (false, 100), (true, 300), (false, 300)];
        let actual: Vec<(bool, u64)> = segments.iter().map(|s| (s.tone, s.duration_ms)).collect();
        assert_eq!(actual, expected);
        assert_eq!(schedule_duration_ms(&segments), 800);
    }

    #[test]
    fn empty_pattern_has_no_segments() {
        assert!(schedule(&[], &PlaybackTiming::default()).is_empty());
    }

    #[test]
    fn player_keys_tone_for_scheduled_samples() {
        // 1kHz sample rate makes one sample per millisecond
        let mut player = PatternPlayer::new();
        player.load(schedule(
            &parse_pattern(".").unwrap(),
            &PlaybackTiming::from_dot(3),
        ));
        assert!(player.is_active());

        let keyed: Vec<bool> = (0..15).map(|_| player.next_sample(1000)).collect();
        assert_eq!(&keyed[..3], &[true, true, true]);
        assert!(keyed[3..].iter().all(|&k| !k));
        assert!(!player.is_active());
    }

    #[test]
    fn cancel_stops_immediately_and_is_idempotent() {
        let mut player = PatternPlayer::new();
        player.load(schedule(
            &parse_pattern("---").unwrap(),
            &PlaybackTiming::default(),
        ));
        assert!(player.next_sample(1000));
        player.cancel();
        player.cancel();
        assert!(!player.is_active());
        assert!(!player.next_sample(1000));
    }
}
