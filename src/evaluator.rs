use crate::morse::{MorseSymbol, MorseTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    #[strum(serialize = "CORRECT!")]
    Correct,
    #[strum(serialize = "WRONG!")]
    WrongValid,
    #[strum(serialize = "INVALID MORSE!")]
    InvalidSequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub outcome: Outcome,
    pub score_delta: u32,
}

impl RoundOutcome {
    fn from_outcome(outcome: Outcome) -> Self {
        let score_delta = match outcome {
            Outcome::Correct => 1,
            Outcome::WrongValid | Outcome::InvalidSequence => 0,
        };
        Self {
            outcome,
            score_delta,
        }
    }
}

/// Judge a keyed symbol sequence against the character the player was asked to send
pub fn evaluate_transmit(keyed: &[MorseSymbol], target: char, table: &MorseTable) -> RoundOutcome {
    let outcome = match table.decode(keyed) {
        Some(c) if c == target => Outcome::Correct,
        Some(_) => Outcome::WrongValid,
        None => Outcome::InvalidSequence,
    };
    RoundOutcome::from_outcome(outcome)
}

/// Judge a typed character against the character that was played
pub fn evaluate_receive(typed: char, target: char, table: &MorseTable) -> RoundOutcome {
    let typed = typed.to_ascii_uppercase();
    let outcome = if typed == target {
        Outcome::Correct
    } else if table.contains(typed) {
        Outcome::WrongValid
    } else {
        Outcome::InvalidSequence
    };
    RoundOutcome::from_outcome(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morse::parse_pattern;
    use assert_matches::assert_matches;

    fn transmit(pattern: &str, target: char) -> RoundOutcome {
        let table = MorseTable::new();
        evaluate_transmit(&parse_pattern(pattern).unwrap(), target, &table)
    }

    #[test]
    fn transmit_three_way_classification() {
        assert_matches!(
            transmit("...", 'S'),
            RoundOutcome {
                outcome: Outcome::Correct,
                score_delta: 1
            }
        );
        // "...." is H
        assert_matches!(
            transmit("....", 'S'),
            RoundOutcome {
                outcome: Outcome::WrongValid,
                score_delta: 0
            }
        );
        assert_matches!(
            transmit(".-.-.-.-", 'S'),
            RoundOutcome {
                outcome: Outcome::InvalidSequence,
                score_delta: 0
            }
        );
    }

    #[test]
    fn transmit_dash_for_e_is_wrong_but_valid() {
        assert_eq!(transmit("-", 'E').outcome, Outcome::WrongValid);
        assert_eq!(transmit("------", 'E').outcome, Outcome::InvalidSequence);
    }

    #[test]
    fn empty_sequence_is_invalid() {
        assert_eq!(transmit("", 'E').outcome, Outcome::InvalidSequence);
    }

    #[test]
    fn receive_three_way_classification() {
        let table = MorseTable::new();
        assert_eq!(evaluate_receive('K', 'K', &table).outcome, Outcome::Correct);
        assert_eq!(evaluate_receive('k', 'K', &table).score_delta, 1);
        assert_eq!(
            evaluate_receive('R', 'K', &table).outcome,
            Outcome::WrongValid
        );
        assert_eq!(
            evaluate_receive('#', 'K', &table).outcome,
            Outcome::InvalidSequence
        );
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(Outcome::Correct.to_string(), "CORRECT!");
        assert_eq!(Outcome::WrongValid.to_string(), "WRONG!");
        assert_eq!(Outcome::InvalidSequence.to_string(), "INVALID MORSE!");
    }
}
