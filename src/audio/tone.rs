use std::f32::consts::TAU;

/// Rise/fall time of the keying envelope; avoids clicks at key edges
const RAMP_SECS: f32 = 0.005;

/// Keyed sine oscillator
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    frequency: f32,
    volume: f32,
    sample_rate: f32,
    phase: f32,
    step: f32,
    envelope: f32,
    ramp: f32,
}

impl ToneGenerator {
    pub fn new(frequency: f32, volume: f32, sample_rate: f32) -> Self {
        let mut generator = Self {
            frequency,
            volume: volume.clamp(0.0, 1.0),
            sample_rate,
            phase: 0.0,
            step: 0.0,
            envelope: 0.0,
            ramp: 0.0,
        };
        generator.retune();
        generator
    }

    fn retune(&mut self) {
        self.step = TAU * self.frequency / self.sample_rate;
        self.ramp = 1.0 / (RAMP_SECS * self.sample_rate);
    }

    /// Next output sample; `keyed` moves the envelope towards on or off
    pub fn next_sample(&mut self, keyed: bool) -> f32 {
        self.envelope = if keyed {
            (self.envelope + self.ramp).min(1.0)
        } else {
            (self.envelope - self.ramp).max(0.0)
        };

        let sample = self.phase.sin() * self.envelope * self.volume;
        self.phase = (self.phase + self.step) % TAU;
        sample
    }

    #[cfg(test)]
    fn is_silent(&self) -> bool {
        self.envelope == 0.0
    }
}
