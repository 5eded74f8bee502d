//! The instruction encoders; see [`Assembler`].

use crate::api::{CodeSink, StringTable};
use crate::buffer::{CodeBuffer, Fixup};
use crate::imm::{self, Immediate};
use crate::mem;
use crate::reg::{Gpr, Size};
use crate::rex::{RexFlags, encode_modrm};
use log::trace;

/// An x64 instruction encoder.
///
/// Each operation takes its registers by mnemonic and appends exactly one
/// fully-formed instruction (prefixes through immediate) to the internal
/// [`CodeBuffer`]. Malformed operands are caller bugs and panic; a
/// well-formed caller never observes a failure.
///
/// The encoder is single-threaded by design: one encoder per producer,
/// with the [`StringTable`] as the only shared collaborator.
pub struct Assembler<S> {
    buf: CodeBuffer,
    strings: S,
    optimize: bool,
}

impl<S: StringTable> Assembler<S> {
    /// Create an encoder that interns string immediates through
    /// `strings`. The immediate-width optimiser starts enabled.
    pub fn new(strings: S) -> Self {
        Self {
            buf: CodeBuffer::new(),
            strings,
            optimize: true,
        }
    }

    /// Toggle the 64-bit immediate-width optimiser; disable it to emit
    /// literal widths (e.g., when exact encodings are asserted on).
    pub fn set_optimizer(&mut self, enabled: bool) {
        self.optimize = enabled;
    }

    /// Return the machine code emitted so far.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.buf.bytes()
    }

    /// Return the pointer fixups recorded so far.
    #[must_use]
    pub fn fixups(&self) -> &[Fixup] {
        self.buf.fixups()
    }

    /// Encode `mov reg, imm`.
    ///
    /// The immediate width follows the register width; for a 64-bit
    /// destination the optimiser (on by default) drops to the 32-bit form
    /// whenever `value <= i32::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is not a GPR mnemonic or `value` does not fit the
    /// register's width.
    pub fn move_register_immediate(&mut self, reg: &str, value: u64) {
        trace!("mov {reg}, {value:#x}");
        self.mov_reg_imm(Gpr::named(reg), Immediate::Int(value));
    }

    /// Encode `mov reg, s`: intern `s` in the string pool and emit its
    /// address as the 64-bit immediate, recording a [`Fixup`] over the 8
    /// address bytes for the layout stage to patch.
    ///
    /// # Panics
    ///
    /// Panics if `reg` is not a 64-bit GPR mnemonic.
    pub fn move_register_immediate_string(&mut self, reg: &str, s: &str) {
        trace!("mov {reg}, {s:?}");
        self.mov_reg_imm(Gpr::named(reg), Immediate::Str(s));
    }

    /// Encode `mov dst, src` between two registers of equal width.
    ///
    /// # Panics
    ///
    /// Panics if either name is not a GPR mnemonic or the widths differ.
    pub fn move_register_register(&mut self, dst: &str, src: &str) {
        trace!("mov {dst}, {src}");
        let dst = Gpr::named(dst);
        let src = Gpr::named(src);
        assert!(
            dst.size() == src.size(),
            "operand width mismatch: {dst} vs {src}"
        );
        let size = dst.size();
        if size == Size::Word {
            self.buf.put1(0x66);
        }
        let mut rex = RexFlags::from_size(size);
        dst.always_emit_if_8bit_needed(&mut rex);
        src.always_emit_if_8bit_needed(&mut rex);
        rex.emit_two_op(&mut self.buf, src.enc(), dst.enc());
        let opcode = if size == Size::Byte { 0x88 } else { 0x89 };
        self.buf.put1(opcode);
        self.buf
            .put1(encode_modrm(0b11, src.enc() & 7, dst.enc() & 7));
    }

    /// Encode `mov [base], imm`, storing the low `byte_count` bytes of
    /// `value` at the address in `base`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not a 64-bit GPR mnemonic, if `byte_count` is
    /// not one of 1, 2, 4 or 8, or if `value` is not representable at the
    /// store width. The 8-byte store's immediate is still 32 bits
    /// (`C7 /0` has no imm64 form; the CPU sign-extends), so its `value`
    /// must sign-extend from the low 32 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn move_memory_immediate(&mut self, base: &str, byte_count: u8, value: u64) {
        trace!("mov [{base}], {value:#x} ({byte_count}-byte store)");
        let base = Gpr::named(base);
        assert!(
            base.size() == Size::Quadword,
            "memory base must be a 64-bit register, got {base}"
        );
        let size = match byte_count {
            1 => Size::Byte,
            2 => Size::Word,
            4 => Size::Doubleword,
            8 => Size::Quadword,
            _ => panic!("invalid store width: {byte_count} bytes"),
        };
        if size == Size::Quadword {
            assert!(
                imm::sign_extends_from_32(value),
                "immediate {value:#x} does not sign-extend from 32 bits"
            );
        } else {
            assert!(
                imm::fits_size(value, size),
                "immediate {value:#x} does not fit a {byte_count}-byte store"
            );
        }
        if size == Size::Word {
            self.buf.put1(0x66);
        }
        RexFlags::from_size(size).emit_two_op(&mut self.buf, 0, base.enc());
        let opcode = if size == Size::Byte { 0xc6 } else { 0xc7 };
        self.buf.put1(opcode);
        mem::emit_base_indirect(&mut self.buf, 0, base.enc());
        match size {
            Size::Byte => self.buf.put1(value as u8),
            Size::Word => self.buf.put2(value as u16),
            Size::Doubleword | Size::Quadword => self.buf.put4(value as u32),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn mov_reg_imm(&mut self, reg: Gpr, imm: Immediate) {
        match imm {
            Immediate::Str(s) => {
                // The string form always takes the 64-bit encoding: its
                // immediate is the 8-byte pooled address.
                assert!(
                    reg.size() == Size::Quadword,
                    "string immediates need a 64-bit destination, got {reg}"
                );
                let address = self.strings.add(s);
                RexFlags::from_size(Size::Quadword).emit_one_op(&mut self.buf, reg.enc());
                self.buf.put1(0xb8 | (reg.enc() & 7));
                self.buf.record_fixup(address);
                self.buf.put8(address);
            }
            Immediate::Int(value) => {
                let size = match reg.size() {
                    Size::Quadword if self.optimize => imm::optimized_size(value),
                    size => {
                        assert!(
                            imm::fits_size(value, size),
                            "immediate {value:#x} does not fit {}-bit operand",
                            size.bits()
                        );
                        size
                    }
                };
                if size == Size::Word {
                    self.buf.put1(0x66);
                }
                let mut rex = RexFlags::from_size(size);
                reg.always_emit_if_8bit_needed(&mut rex);
                rex.emit_one_op(&mut self.buf, reg.enc());
                let opcode = if size == Size::Byte { 0xb0 } else { 0xb8 };
                self.buf.put1(opcode | (reg.enc() & 7));
                match size {
                    Size::Byte => self.buf.put1(value as u8),
                    Size::Word => self.buf.put2(value as u16),
                    Size::Doubleword => self.buf.put4(value as u32),
                    Size::Quadword => self.buf.put8(value),
                }
            }
        }
    }
}
