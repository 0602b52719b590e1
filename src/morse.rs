use std::collections::HashMap;
use std::fmt;

/// One keyed element of a morse character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorseSymbol {
    Dot,
    Dash,
}

impl MorseSymbol {
    pub fn as_char(self) -> char {
        match self {
            MorseSymbol::Dot => '.',
            MorseSymbol::Dash => '-',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(MorseSymbol::Dot),
            '-' => Some(MorseSymbol::Dash),
            _ => None,
        }
    }
}

impl fmt::Display for MorseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse a `.`/`-` pattern. Any other character makes the pattern invalid.
pub fn parse_pattern(pattern: &str) -> Option<Vec<MorseSymbol>> {
    pattern.chars().map(MorseSymbol::from_char).collect()
}

/// Render symbols back into `.`/`-` text
pub fn render_pattern(symbols: &[MorseSymbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

/// ITU morse alphabet
const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('/', "-..-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('@', ".--.-."),
    ('!', "-.-.--"),
    ('\'', ".----."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('_', "..--.-"),
];

/// Bidirectional character <-> symbol sequence lookup, built once at startup
#[derive(Debug, Clone)]
pub struct MorseTable {
    chars: Vec<char>,
    encode: HashMap<char, Vec<MorseSymbol>>,
    decode: HashMap<Vec<MorseSymbol>, char>,
}

impl MorseTable {
    pub fn new() -> Self {
        let mut chars = Vec::with_capacity(MORSE_TABLE.len());
        let mut encode = HashMap::with_capacity(MORSE_TABLE.len());
        let mut decode = HashMap::with_capacity(MORSE_TABLE.len());

        for &(c, pattern) in MORSE_TABLE {
            // The table above only contains `.` and `-`
            let symbols = parse_pattern(pattern).unwrap_or_default();
            chars.push(c);
            decode.insert(symbols.clone(), c);
            encode.insert(c, symbols);
        }

        Self {
            chars,
            encode,
            decode,
        }
    }

    /// Every character the table can encode, in table order
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Symbols for `c`; lowercase letters are looked up as uppercase
    pub fn encode(&self, c: char) -> Option<&[MorseSymbol]> {
        self.encode
            .get(&c.to_ascii_uppercase())
            .map(|symbols| symbols.as_slice())
    }

    /// Character for an exact symbol sequence
    pub fn decode(&self, symbols: &[MorseSymbol]) -> Option<char> {
        self.decode.get(symbols).copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.encode.contains_key(&c.to_ascii_uppercase())
    }
}

impl Default for MorseTable {
    fn default() -> Self {
        Self::new()
    }
}
