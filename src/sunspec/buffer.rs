use crate::error::{Error, Result};

/// Raw pattern a device reports for a 16-bit field it does not support.
pub const NULL_16: u16 = 0xFFFF;

/// Cursor over the register words returned by a single transport read.
///
/// Every decode consumes a fixed number of words. A read that would run past
/// the end fails with [`Error::BufferUnderrun`]; a buffer that has failed once
/// should be dropped rather than read again.
#[derive(Clone, Debug, Default)]
pub struct RegisterBuffer {
    words: Vec<u16>,
    position: usize,
}

impl RegisterBuffer {
    pub fn new(words: Vec<u16>) -> Self {
        Self { words, position: 0 }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.words.len() - self.position
    }

    fn take(&mut self, count: usize) -> Result<&[u16]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::BufferUnderrun {
                position: self.position,
                needed: count,
                available,
            });
        }

        let start = self.position;
        self.position += count;
        Ok(&self.words[start..self.position])
    }

    fn word(&mut self) -> Result<u16> {
        Ok(self.take(1)?[0])
    }

    fn double_word(&mut self) -> Result<(u16, u16)> {
        let words = self.take(2)?;
        Ok((words[0], words[1]))
    }

    pub fn uint16(&mut self) -> Result<u16> {
        self.word()
    }

    pub fn uint16_nullable(&mut self) -> Result<Option<u16>> {
        let raw = self.word()?;
        Ok((raw != NULL_16).then_some(raw))
    }

    pub fn int16(&mut self) -> Result<i16> {
        Ok(self.word()? as i16)
    }

    /// The sentinel is checked on the raw word, so a signed field reads as
    /// absent when the device reports 0xFFFF (i.e. -1).
    pub fn int16_nullable(&mut self) -> Result<Option<i16>> {
        let raw = self.word()?;
        Ok((raw != NULL_16).then_some(raw as i16))
    }

    pub fn uint32(&mut self) -> Result<u32> {
        let (high, low) = self.double_word()?;
        Ok(u32::from(high) << 16 | u32::from(low))
    }

    pub fn uint32_nullable(&mut self) -> Result<Option<u32>> {
        let (high, low) = self.double_word()?;
        if high == NULL_16 && low == NULL_16 {
            Ok(None)
        } else {
            Ok(Some(u32::from(high) << 16 | u32::from(low)))
        }
    }

    pub fn int32(&mut self) -> Result<i32> {
        Ok(self.uint32()? as i32)
    }

    /// Two ASCII characters per word, high byte first. Trailing NULs are
    /// dropped.
    pub fn string(&mut self, word_count: usize) -> Result<String> {
        let bytes: Vec<u8> = self
            .take(word_count)?
            .iter()
            .flat_map(|word| word.to_be_bytes())
            .collect();
        let end = bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);

        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn skip(&mut self, word_count: usize) -> Result<()> {
        self.take(word_count).map(|_| ())
    }

    /// Signed exponent word, returned as the multiplier 10^exponent.
    pub fn scale(&mut self) -> Result<f64> {
        Ok(10f64.powi(i32::from(self.int16()?)))
    }

    /// Unsigned exponent word, returned as the multiplier 10^exponent.
    pub fn scale_unsigned(&mut self) -> Result<f64> {
        Ok(10f64.powi(i32::from(self.uint16()?)))
    }

    pub fn int16_scaled(&mut self) -> Result<f64> {
        let value = self.int16()?;
        Ok(f64::from(value) * self.scale()?)
    }

    pub fn uint16_scaled(&mut self) -> Result<f64> {
        let value = self.uint16()?;
        Ok(f64::from(value) * self.scale()?)
    }
}

impl From<Vec<u16>> for RegisterBuffer {
    fn from(words: Vec<u16>) -> Self {
        Self::new(words)
    }
}
