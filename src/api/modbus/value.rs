//! Raw register words to typed values.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use tokio_modbus::Quantity;

use crate::api::modbus::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataType {
    U16,
    I16,

    /// Two registers, high word first.
    I32,

    /// Two unsigned bytes packed into one register, high byte first.
    BytePair,

    /// ASCII text, two characters per register.
    Text { n_words: Quantity },
}

impl DataType {
    pub const fn num_words(self) -> Quantity {
        match self {
            Self::U16 | Self::I16 | Self::BytePair => 1,
            Self::I32 => 2,
            Self::Text { n_words } => n_words,
        }
    }

    /// Convert the raw words to the target value.
    pub fn decode(self, words: &[u16]) -> Result<Value, Error> {
        if words.len() != usize::from(self.num_words()) {
            return Err(Error::UnexpectedLength {
                expected: usize::from(self.num_words()),
                actual: words.len(),
            });
        }
        let value = match self {
            Self::U16 => Value::U16(words[0]),
            #[expect(clippy::cast_possible_wrap)]
            Self::I16 => Value::I16(words[0] as i16),
            Self::I32 => Value::I32(i32_from_words(words[0], words[1])),
            Self::BytePair => {
                let [high, low] = words[0].to_be_bytes();
                Value::BytePair(high, low)
            }
            Self::Text { .. } => Value::Text(text_from_words(words)),
        };
        Ok(value)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U16 => write!(f, "u16"),
            Self::I16 => write!(f, "i16"),
            Self::I32 => write!(f, "i32"),
            Self::BytePair => write!(f, "u8+u8"),
            Self::Text { n_words } => write!(f, "string[{n_words}]"),
        }
    }
}

/// Combine two unsigned words into a signed 32-bit integer.
#[must_use]
#[expect(clippy::cast_possible_wrap)]
pub const fn i32_from_words(high: u16, low: u16) -> i32 {
    ((high as u32) << 16 | low as u32) as i32
}

/// Decode ASCII text packed big-endian into registers, dropping the NUL and space padding.
#[must_use]
pub fn text_from_words(words: &[u16]) -> String {
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_be_bytes()).collect();
    String::from_utf8_lossy(&bytes).trim_end_matches(['\0', ' ']).to_owned()
}

#[must_use]
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    U16(u16),
    I16(i16),
    I32(i32),
    BytePair(u8, u8),
    Text(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::U16(value) => Display::fmt(value, f),
            Self::I16(value) => Display::fmt(value, f),
            Self::I32(value) => Display::fmt(value, f),
            Self::BytePair(high, low) => write!(f, "{high}+{low}"),
            Self::Text(text) => Display::fmt(text, f),
        }
    }
}

impl TryFrom<Value> for u16 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::U16(value) => Ok(value),
            actual => Err(Error::UnexpectedValue { expected: "u16", actual }),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::I32(value) => Ok(value),
            Value::I16(value) => Ok(value.into()),
            Value::U16(value) => Ok(value.into()),
            actual => Err(Error::UnexpectedValue { expected: "i32", actual }),
        }
    }
}

impl TryFrom<Value> for (u8, u8) {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::BytePair(high, low) => Ok((high, low)),
            actual => Err(Error::UnexpectedValue { expected: "u8+u8", actual }),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(text) => Ok(text),
            actual => Err(Error::UnexpectedValue { expected: "string", actual }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_from_words_ok() {
        assert_eq!(i32_from_words(0x0000, 0x01F4), 500);
        assert_eq!(i32_from_words(0x0001, 0x0000), 65_536);
        assert_eq!(i32_from_words(0xFFFF, 0xFE0C), -500);
        assert_eq!(i32_from_words(0x8000, 0x0000), i32::MIN);
        assert_eq!(i32_from_words(0x7FFF, 0xFFFF), i32::MAX);
    }

    /// Words with the high bit set must not be sign-extended before combining.
    #[test]
    fn i32_from_words_high_bit_in_low_word_ok() {
        assert_eq!(i32_from_words(0x0000, 0x8000), 32_768);
        assert_eq!(i32_from_words(0x0000, 0xFFFF), 65_535);
        assert_eq!(i32_from_words(0x00FF, 0x0080), 0x00FF_0080);
    }

    #[test]
    fn decode_i32_ok() -> Result<(), Error> {
        assert_eq!(DataType::I32.decode(&[0xFFFF, 0xFFFF])?, Value::I32(-1));
        Ok(())
    }

    #[test]
    fn decode_i16_ok() -> Result<(), Error> {
        assert_eq!(DataType::I16.decode(&[0xFFFE])?, Value::I16(-2));
        Ok(())
    }

    #[test]
    fn decode_byte_pair_ok() -> Result<(), Error> {
        assert_eq!(DataType::BytePair.decode(&[0x5A_1E])?, Value::BytePair(90, 30));
        Ok(())
    }

    #[test]
    fn decode_text_ok() -> Result<(), Error> {
        // "E3/DC GmbH" padded with NULs.
        let words = [0x4533, 0x2F44, 0x4320, 0x476D, 0x6248, 0x0000, 0x0000];
        let value = DataType::Text { n_words: 7 }.decode(&words)?;
        assert_eq!(value, Value::Text("E3/DC GmbH".to_owned()));
        Ok(())
    }

    #[test]
    fn decode_length_mismatch_fails() {
        assert!(matches!(
            DataType::I32.decode(&[0x0001]),
            Err(Error::UnexpectedLength { expected: 2, actual: 1 }),
        ));
    }

    #[test]
    fn try_from_mismatch_fails() {
        assert!(String::try_from(Value::U16(1)).is_err());
        assert!(u16::try_from(Value::I32(1)).is_err());
    }
}
