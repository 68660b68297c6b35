use crate::domain::model::NormalizedKey;
use crate::utils::error::{HologramError, Result};

pub const DEFAULT_FIXED_SIZE: usize = 30;

/// 數字後綴需能放進 u128
pub const MAX_FIXED_SIZE: usize = 38;

/// Turns free-form user input into a fixed-width [`NormalizedKey`].
///
/// Persian and Arabic-Indic digits become ASCII digits, everything that is not an
/// ASCII letter or digit is dropped, letters are upper-cased, and the letters are
/// followed by zero padding and then the digits so the key is exactly
/// `fixed_size` characters wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonicalizer {
    fixed_size: usize,
}

impl Canonicalizer {
    pub fn new(fixed_size: usize) -> Result<Self> {
        crate::utils::validation::validate_range(
            "canonicalizer.fixed_size",
            fixed_size,
            1,
            MAX_FIXED_SIZE,
        )?;
        Ok(Self { fixed_size })
    }

    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }

    pub fn normalize(&self, raw: &str) -> Result<NormalizedKey> {
        let mut letters = String::new();
        let mut digits = String::new();

        for c in raw.chars().map(translate_digit) {
            if c.is_ascii_alphabetic() {
                letters.push(c.to_ascii_uppercase());
            } else if c.is_ascii_digit() {
                digits.push(c);
            }
        }

        let length = letters.len() + digits.len();
        if length > self.fixed_size {
            return Err(HologramError::InputOverflow {
                length,
                fixed_size: self.fixed_size,
            });
        }

        let mut key = letters;
        key.extend(std::iter::repeat('0').take(self.fixed_size - length));
        key.push_str(&digits);

        Ok(NormalizedKey::from_canonical(key))
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            fixed_size: DEFAULT_FIXED_SIZE,
        }
    }
}

/// Normalizes with the default width of 30.
pub fn normalize(raw: &str) -> Result<NormalizedKey> {
    Canonicalizer::default().normalize(raw)
}

fn translate_digit(c: char) -> char {
    let offset = match c {
        '\u{06F0}'..='\u{06F9}' => c as u32 - 0x06F0, // Persian
        '\u{0660}'..='\u{0669}' => c as u32 - 0x0660, // Arabic-Indic
        _ => return c,
    };
    char::from_digit(offset, 10).unwrap_or(c)
}
