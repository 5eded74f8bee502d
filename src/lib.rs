//! An x64 instruction encoder for in-memory code generation.
//!
//! Callers hand the [`Assembler`] symbolic operands (register mnemonics,
//! integer immediates and pooled strings) and it appends the canonical
//! little-endian x86-64 encoding to an append-only code buffer destined
//! for the `.text` section of an executable image. String immediates are
//! interned through a [`StringTable`] collaborator and leave behind
//! [`Fixup`] records for the host's layout stage to patch.
//!
//! ```
//! use asm_x64::Assembler;
//!
//! // The string pool is pluggable; a `Vec<String>` works for tests.
//! let pool: Vec<String> = Vec::new();
//! let mut asm = Assembler::new(pool);
//!
//! // `mov rax, 60`: the optimiser (on by default) picks the 5-byte
//! // 32-bit form over the 10-byte `movabs`.
//! asm.move_register_immediate("rax", 60);
//! assert_eq!(asm.bytes(), [0xb8, 0x3c, 0x00, 0x00, 0x00]);
//!
//! // Register-to-register and memory stores share the same buffer.
//! asm.move_register_register("rdi", "rax");
//! asm.move_memory_immediate("rsp", 8, 0);
//! assert!(asm.fixups().is_empty());
//! ```

mod api;
mod asm;
mod buffer;
mod imm;
mod mem;
mod reg;
mod rex;

pub use api::{CodeSink, StringTable};
pub use asm::Assembler;
pub use buffer::{CodeBuffer, Fixup};
pub use reg::{Gpr, Size};
pub use rex::RexFlags;
