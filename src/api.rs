//! Contains traits that a user of this assembler must implement.

/// Describe how an instruction is emitted into a code buffer.
///
/// All multi-byte integers are written little-endian.
pub trait CodeSink {
    /// Add 1 byte to the code section.
    fn put1(&mut self, _: u8);

    /// Add 2 bytes to the code section.
    fn put2(&mut self, _: u16);

    /// Add 4 bytes to the code section.
    fn put4(&mut self, _: u32);

    /// Add 8 bytes to the code section.
    fn put8(&mut self, _: u64);

    /// Return the byte offset of the current location in the code buffer;
    /// required for recording pointer fixups.
    fn current_offset(&self) -> u32;
}

/// Provide a convenient implementation for testing.
impl CodeSink for Vec<u8> {
    fn put1(&mut self, v: u8) {
        self.extend_from_slice(&[v]);
    }

    fn put2(&mut self, v: u16) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put4(&mut self, v: u32) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn put8(&mut self, v: u64) {
        self.extend_from_slice(&v.to_le_bytes());
    }

    fn current_offset(&self) -> u32 {
        self.len().try_into().unwrap()
    }
}

/// The string-pool collaborator.
///
/// The encoder interns string immediates through this interface; the pool
/// itself (layout, lifetime, concurrency) belongs to the host.
pub trait StringTable {
    /// Intern `s` and return its address within the pool.
    ///
    /// Must be idempotent per string, and the returned address must stay
    /// stable for the lifetime of the encoder.
    fn add(&mut self, s: &str) -> u64;
}

/// Provide a convenient implementation for testing: entries occupy their
/// NUL-terminated length and addresses are byte offsets into the notional
/// concatenation.
impl StringTable for Vec<String> {
    fn add(&mut self, s: &str) -> u64 {
        let mut address = 0;
        for entry in self.iter() {
            if entry == s {
                return address;
            }
            address += entry.len() as u64 + 1;
        }
        self.push(s.to_owned());
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_is_little_endian() {
        let mut sink = Vec::new();
        sink.put1(0x01);
        sink.put2(0x0302);
        sink.put4(0x0706_0504);
        sink.put8(0x0f0e_0d0c_0b0a_0908);
        assert_eq!(sink, (0x01..=0x0f).collect::<Vec<u8>>());
        assert_eq!(sink.current_offset(), 15);
    }

    #[test]
    fn string_table_interning_is_idempotent() {
        let mut pool = Vec::new();
        assert_eq!(pool.add("hello"), 0);
        assert_eq!(pool.add("world"), 6);
        assert_eq!(pool.add("hello"), 0);
        assert_eq!(pool.add("world"), 6);
        assert_eq!(pool.len(), 2);
    }
}
