use std::time::Duration;

use crate::decoder::classify_press;
use crate::morse::MorseSymbol;

/// Symbols keyed during one round, plus the timing needed to tell when the
/// player has stopped keying.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputAccumulator {
    symbols: Vec<MorseSymbol>,
    press_started_ms: Option<u64>,
    last_update_ms: Option<u64>,
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_round(&mut self) {
        self.symbols.clear();
        self.press_started_ms = None;
        self.last_update_ms = None;
    }

    /// Start timing a press. Ignored while audio is busy or a press is
    /// already being timed. Returns whether the press was accepted.
    pub fn on_press_start(&mut self, now_ms: u64, audio_busy: bool) -> bool {
        if audio_busy || self.press_started_ms.is_some() {
            return false;
        }
        self.press_started_ms = Some(now_ms);
        true
    }

    /// Finish the current press and append its symbol
    pub fn on_press_end(&mut self, now_ms: u64) -> Option<MorseSymbol> {
        let started = self.press_started_ms.take()?;
        let held = Duration::from_millis(now_ms.saturating_sub(started));
        let symbol = classify_press(held);
        self.symbols.push(symbol);
        self.last_update_ms = Some(now_ms);
        Some(symbol)
    }

    pub fn is_complete(&self, now_ms: u64, timeout_ms: u64) -> bool {
        match self.last_update_ms {
            Some(last) if !self.symbols.is_empty() => now_ms.saturating_sub(last) > timeout_ms,
            _ => false,
        }
    }

    pub fn is_pressing(&self) -> bool {
        self.press_started_ms.is_some()
    }

    pub fn symbols(&self) -> &[MorseSymbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Take the keyed sequence, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<MorseSymbol> {
        self.last_update_ms = None;
        std::mem::take(&mut self.symbols)
    }
}
