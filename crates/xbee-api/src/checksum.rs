//! Frame checksum.
//!
//! The checksum covers the frame type and payload bytes (not the delimiter
//! or length). It is `0xFF` minus the low byte of their sum, so a valid frame
//! satisfies `sum(frame_type, payload, checksum) mod 256 == 0xFF`.

/// Compute the checksum byte for a mod-256 sum.
pub fn compute(sum: u8) -> u8 {
    0xFF - sum
}

/// Check a received checksum byte against a mod-256 sum.
pub fn validate(sum: u8, checksum: u8) -> bool {
    compute(sum) == checksum
}

/// Running mod-256 sum over frame bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumAccumulator {
    sum: u8,
}

impl ChecksumAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        ChecksumAccumulator { sum: 0 }
    }

    /// Sum a whole byte slice.
    pub fn over(bytes: &[u8]) -> Self {
        let mut acc = Self::new();
        acc.extend(bytes);
        acc
    }

    /// Add one byte.
    pub fn add(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(byte);
    }

    /// Add every byte of a slice.
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.add(byte);
        }
    }

    /// Current sum, mod 256.
    pub fn sum(&self) -> u8 {
        self.sum
    }

    /// Checksum byte for the bytes added so far.
    pub fn checksum(&self) -> u8 {
        compute(self.sum)
    }

    /// Whether `checksum` closes the bytes added so far.
    pub fn is_valid(&self, checksum: u8) -> bool {
        validate(self.sum, checksum)
    }

    /// Start over.
    pub fn reset(&mut self) {
        self.sum = 0;
    }
}
