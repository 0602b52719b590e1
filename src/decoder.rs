use std::time::Duration;

use crate::morse::MorseSymbol;

/// Presses held up to and including this long are dots
pub const DASH_THRESHOLD: Duration = Duration::from_millis(200);

/// Classify a single key press by how long it was held
pub fn classify_press(held: Duration) -> MorseSymbol {
    if held > DASH_THRESHOLD {
        MorseSymbol::Dash
    } else {
        MorseSymbol::Dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_presses_are_dots() {
        assert_eq!(classify_press(Duration::ZERO), MorseSymbol::Dot);
        assert_eq!(classify_press(Duration::from_millis(100)), MorseSymbol::Dot);
    }

    #[test]
    fn threshold_itself_is_a_dot() {
        assert_eq!(classify_press(DASH_THRESHOLD), MorseSymbol::Dot);
        assert_eq!(
            classify_press(DASH_THRESHOLD + Duration::from_millis(1)),
            MorseSymbol::Dash
        );
    }

    #[test]
    fn dash_iff_longer_than_threshold() {
        for ms in (0..1000).step_by(7) {
            let held = Duration::from_millis(ms);
            let expected = if held > DASH_THRESHOLD {
                MorseSymbol::Dash
            } else {
                MorseSymbol::Dot
            };
            assert_eq!(classify_press(held), expected, "{ms}ms");
        }
    }
}
