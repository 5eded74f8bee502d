//! Memory operands to instructions.

use crate::api::CodeSink;
use crate::reg::enc;
use crate::rex::{encode_modrm, encode_sib};

/// Emit the ModR/M (plus SIB or displacement where the base demands it)
/// sequence for a zero-displacement register-indirect operand `[base]`.
///
/// Most base registers need a single ModR/M byte. Two encodings are
/// special, keyed by the base's low three bits:
/// - rsp/r12 (`100`): r/m=100 announces a SIB byte; the index-less SIB
///   with base 100 is `0x24`, with or without a REX-extended fourth bit.
/// - rbp/r13 (`101`): mod=00 with r/m=101 means RIP-relative, so the zero
///   offset must be spelled as an explicit disp8 of 0.
pub fn emit_base_indirect(sink: &mut impl CodeSink, enc_g: u8, enc_base: u8) {
    debug_assert!(enc_base < 16);
    let enc_e = enc_base & 7;
    if enc_e == enc::RSP {
        sink.put1(encode_modrm(0b00, enc_g & 7, 0b100));
        sink.put1(encode_sib(0, 0b100, 0b100));
    } else if enc_e == enc::RBP {
        sink.put1(encode_modrm(0b01, enc_g & 7, 0b101));
        sink.put1(0x00);
    } else {
        sink.put1(encode_modrm(0b00, enc_g & 7, enc_e));
    }
}
