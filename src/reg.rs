//! Pure register operands; see [`Gpr`].

use crate::rex::RexFlags;
use std::fmt;

/// A single x64 register encoding can access a different number of bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Size {
    /// An 8-bit access.
    Byte,
    /// A 16-bit access.
    Word,
    /// A 32-bit access.
    Doubleword,
    /// A 64-bit access.
    Quadword,
}

impl Size {
    /// Return the access width in bits.
    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            Size::Byte => 8,
            Size::Word => 16,
            Size::Doubleword => 32,
            Size::Quadword => 64,
        }
    }
}

/// A general purpose x64 register resolved from its mnemonic: the
/// hardware encoding plus the access width the mnemonic implies (e.g.,
/// `eax` is encoding 0 at 32 bits).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gpr {
    enc: u8,
    size: Size,
}

impl Gpr {
    /// Resolve a lowercase register mnemonic.
    ///
    /// The catalogue is total over the 64 canonical x86-64 GPR names; an
    /// unknown name is a caller bug, not a runtime condition.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a canonical GPR mnemonic.
    #[must_use]
    pub fn named(name: &str) -> Self {
        match enc::from_str(name) {
            Some((enc, size)) => Self { enc, size },
            None => panic!("unknown register name: {name}"),
        }
    }

    /// Return the register's hardware encoding; e.g., `0` for `rax`.
    #[must_use]
    pub fn enc(&self) -> u8 {
        debug_assert!(self.enc < 16, "invalid register: {}", self.enc);
        self.enc
    }

    /// Return the access width implied by the mnemonic.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// True for `r8..r15` and their sub-width aliases; the high bit of
    /// their encoding travels in REX.R/REX.B.
    #[must_use]
    pub fn is_extended(&self) -> bool {
        self.enc >= 8
    }

    /// Proxy on the 8-bit REX flag emission: without a REX byte the
    /// encodings of `spl`, `bpl`, `sil` and `dil` decode as `ah/ch/dh/bh`.
    pub(crate) fn always_emit_if_8bit_needed(&self, rex: &mut RexFlags) {
        if self.size == Size::Byte && (4..=7).contains(&self.enc) {
            rex.always_emit();
        }
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", enc::to_string(self.enc, self.size))
    }
}

/// Encode x64 registers.
pub mod enc {
    use super::Size;

    pub const RAX: u8 = 0;
    pub const RCX: u8 = 1;
    pub const RDX: u8 = 2;
    pub const RBX: u8 = 3;
    pub const RSP: u8 = 4;
    pub const RBP: u8 = 5;
    pub const RSI: u8 = 6;
    pub const RDI: u8 = 7;
    pub const R8: u8 = 8;
    pub const R9: u8 = 9;
    pub const R10: u8 = 10;
    pub const R11: u8 = 11;
    pub const R12: u8 = 12;
    pub const R13: u8 = 13;
    pub const R14: u8 = 14;
    pub const R15: u8 = 15;

    /// Resolve a lowercase GPR mnemonic to its hardware encoding and
    /// access width, or `None` for a name outside the catalogue.
    #[must_use]
    pub fn from_str(name: &str) -> Option<(u8, Size)> {
        use Size::{Byte, Doubleword, Quadword, Word};
        Some(match name {
            "al" => (RAX, Byte),
            "ax" => (RAX, Word),
            "eax" => (RAX, Doubleword),
            "rax" => (RAX, Quadword),
            "cl" => (RCX, Byte),
            "cx" => (RCX, Word),
            "ecx" => (RCX, Doubleword),
            "rcx" => (RCX, Quadword),
            "dl" => (RDX, Byte),
            "dx" => (RDX, Word),
            "edx" => (RDX, Doubleword),
            "rdx" => (RDX, Quadword),
            "bl" => (RBX, Byte),
            "bx" => (RBX, Word),
            "ebx" => (RBX, Doubleword),
            "rbx" => (RBX, Quadword),
            "spl" => (RSP, Byte),
            "sp" => (RSP, Word),
            "esp" => (RSP, Doubleword),
            "rsp" => (RSP, Quadword),
            "bpl" => (RBP, Byte),
            "bp" => (RBP, Word),
            "ebp" => (RBP, Doubleword),
            "rbp" => (RBP, Quadword),
            "sil" => (RSI, Byte),
            "si" => (RSI, Word),
            "esi" => (RSI, Doubleword),
            "rsi" => (RSI, Quadword),
            "dil" => (RDI, Byte),
            "di" => (RDI, Word),
            "edi" => (RDI, Doubleword),
            "rdi" => (RDI, Quadword),
            "r8b" => (R8, Byte),
            "r8w" => (R8, Word),
            "r8d" => (R8, Doubleword),
            "r8" => (R8, Quadword),
            "r9b" => (R9, Byte),
            "r9w" => (R9, Word),
            "r9d" => (R9, Doubleword),
            "r9" => (R9, Quadword),
            "r10b" => (R10, Byte),
            "r10w" => (R10, Word),
            "r10d" => (R10, Doubleword),
            "r10" => (R10, Quadword),
            "r11b" => (R11, Byte),
            "r11w" => (R11, Word),
            "r11d" => (R11, Doubleword),
            "r11" => (R11, Quadword),
            "r12b" => (R12, Byte),
            "r12w" => (R12, Word),
            "r12d" => (R12, Doubleword),
            "r12" => (R12, Quadword),
            "r13b" => (R13, Byte),
            "r13w" => (R13, Word),
            "r13d" => (R13, Doubleword),
            "r13" => (R13, Quadword),
            "r14b" => (R14, Byte),
            "r14w" => (R14, Word),
            "r14d" => (R14, Doubleword),
            "r14" => (R14, Quadword),
            "r15b" => (R15, Byte),
            "r15w" => (R15, Word),
            "r15d" => (R15, Doubleword),
            "r15" => (R15, Quadword),
            _ => return None,
        })
    }

    /// Return the name of a GPR encoding (`enc`) at the given `size`.
    ///
    /// # Panics
    ///
    /// This function will panic if the encoding is not a valid x64 register.
    #[must_use]
    pub fn to_string(enc: u8, size: Size) -> &'static str {
        use Size::{Byte, Doubleword, Quadword, Word};
        match enc {
            RAX => match size {
                Byte => "al",
                Word => "ax",
                Doubleword => "eax",
                Quadword => "rax",
            },
            RCX => match size {
                Byte => "cl",
                Word => "cx",
                Doubleword => "ecx",
                Quadword => "rcx",
            },
            RDX => match size {
                Byte => "dl",
                Word => "dx",
                Doubleword => "edx",
                Quadword => "rdx",
            },
            RBX => match size {
                Byte => "bl",
                Word => "bx",
                Doubleword => "ebx",
                Quadword => "rbx",
            },
            RSP => match size {
                Byte => "spl",
                Word => "sp",
                Doubleword => "esp",
                Quadword => "rsp",
            },
            RBP => match size {
                Byte => "bpl",
                Word => "bp",
                Doubleword => "ebp",
                Quadword => "rbp",
            },
            RSI => match size {
                Byte => "sil",
                Word => "si",
                Doubleword => "esi",
                Quadword => "rsi",
            },
            RDI => match size {
                Byte => "dil",
                Word => "di",
                Doubleword => "edi",
                Quadword => "rdi",
            },
            R8 => match size {
                Byte => "r8b",
                Word => "r8w",
                Doubleword => "r8d",
                Quadword => "r8",
            },
            R9 => match size {
                Byte => "r9b",
                Word => "r9w",
                Doubleword => "r9d",
                Quadword => "r9",
            },
            R10 => match size {
                Byte => "r10b",
                Word => "r10w",
                Doubleword => "r10d",
                Quadword => "r10",
            },
            R11 => match size {
                Byte => "r11b",
                Word => "r11w",
                Doubleword => "r11d",
                Quadword => "r11",
            },
            R12 => match size {
                Byte => "r12b",
                Word => "r12w",
                Doubleword => "r12d",
                Quadword => "r12",
            },
            R13 => match size {
                Byte => "r13b",
                Word => "r13w",
                Doubleword => "r13d",
                Quadword => "r13",
            },
            R14 => match size {
                Byte => "r14b",
                Word => "r14w",
                Doubleword => "r14d",
                Quadword => "r14",
            },
            R15 => match size {
                Byte => "r15b",
                Word => "r15w",
                Doubleword => "r15d",
                Quadword => "r15",
            },
            _ => panic!("invalid register: {enc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &[
        "al", "cl", "dl", "bl", "spl", "bpl", "sil", "dil", "r8b", "r9b", "r10b", "r11b", "r12b",
        "r13b", "r14b", "r15b", "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w",
        "r10w", "r11w", "r12w", "r13w", "r14w", "r15w", "eax", "ecx", "edx", "ebx", "esp", "ebp",
        "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d", "r13d", "r14d", "r15d", "rax", "rcx",
        "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13", "r14",
        "r15",
    ];

    #[test]
    fn catalogue_is_total_over_the_canonical_names() {
        assert_eq!(NAMES.len(), 64);
        for name in NAMES {
            let reg = Gpr::named(name);
            assert_eq!(reg.to_string(), *name);
            assert_eq!(reg.is_extended(), reg.enc() >= 8);
        }
    }

    #[test]
    fn only_the_four_legacy_low_bytes_force_rex() {
        for name in NAMES {
            let reg = Gpr::named(name);
            let mut rex = RexFlags::from_size(reg.size());
            reg.always_emit_if_8bit_needed(&mut rex);
            let forced = matches!(*name, "spl" | "bpl" | "sil" | "dil");
            assert_eq!(rex.must_always_emit(), forced, "{name}");
        }
    }

    #[test]
    #[should_panic(expected = "unknown register name: xmm0")]
    fn unknown_name_panics() {
        let _ = Gpr::named("xmm0");
    }
}
