//! Round-trip the encoder's output through a known-good disassembler.

use arbtest::arbtest;
use asm_x64::Assembler;
use capstone::{Capstone, arch::BuildsCapstone, arch::BuildsCapstoneSyntax, arch::x86};

const BYTE: &[&str] = &[
    "al", "cl", "dl", "bl", "spl", "bpl", "sil", "dil", "r8b", "r9b", "r10b", "r11b", "r12b",
    "r13b", "r14b", "r15b",
];
const WORD: &[&str] = &[
    "ax", "cx", "dx", "bx", "sp", "bp", "si", "di", "r8w", "r9w", "r10w", "r11w", "r12w", "r13w",
    "r14w", "r15w",
];
const DWORD: &[&str] = &[
    "eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi", "r8d", "r9d", "r10d", "r11d", "r12d",
    "r13d", "r14d", "r15d",
];
const QWORD: &[&str] = &[
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi", "r8", "r9", "r10", "r11", "r12", "r13",
    "r14", "r15",
];

fn new_asm() -> Assembler<Vec<String>> {
    Assembler::new(Vec::new())
}

/// Disassemble `bytes`, asserting they form exactly one instruction, and
/// return its mnemonic and operand string.
fn disassemble(bytes: &[u8]) -> (String, String) {
    let cs = Capstone::new()
        .x86()
        .mode(x86::ArchMode::Mode64)
        .syntax(x86::ArchSyntax::Intel)
        .detail(false)
        .build()
        .expect("failed to create Capstone object");
    let insts = cs.disasm_all(bytes, 0x0).expect("failed to disassemble");
    assert_eq!(insts.len(), 1, "not a single instruction: {bytes:02x?}");
    let inst = insts.iter().next().expect("at least one instruction");
    assert_eq!(inst.bytes(), bytes, "extra bytes not disassembled");
    (
        inst.mnemonic().expect("a mnemonic").to_owned(),
        inst.op_str().expect("operands").to_owned(),
    )
}

#[test]
fn register_to_register_moves_disassemble_exactly() {
    for group in [BYTE, WORD, DWORD, QWORD] {
        for reg in group {
            let mut asm = new_asm();
            asm.move_register_register(reg, reg);
            let (mnemonic, ops) = disassemble(asm.bytes());
            assert_eq!(mnemonic, "mov", "{reg}");
            assert_eq!(ops, format!("{reg}, {reg}"));
        }
    }
}

#[test]
fn literal_64_bit_immediates_disassemble_as_movabs() {
    for reg in QWORD {
        let mut asm = new_asm();
        asm.set_optimizer(false);
        asm.move_register_immediate(reg, 1);
        let (mnemonic, ops) = disassemble(asm.bytes());
        assert_eq!(mnemonic, "movabs", "{reg}");
        assert_eq!(ops, format!("{reg}, 1"));
    }
}

#[test]
fn optimised_immediates_disassemble_at_the_32_bit_alias() {
    // The optimiser rewrites `mov r64, imm` into the 32-bit form, which
    // the disassembler reads back under the destination's 32-bit name;
    // the zero extension makes the two spellings equivalent.
    for (reg, alias) in QWORD.iter().zip(DWORD) {
        let mut asm = new_asm();
        asm.move_register_immediate(reg, 1);
        let (mnemonic, ops) = disassemble(asm.bytes());
        assert_eq!(mnemonic, "mov", "{reg}");
        assert_eq!(ops, format!("{alias}, 1"));
    }
}

#[test]
fn memory_stores_disassemble_with_the_store_width() {
    for base in QWORD {
        let mut asm = new_asm();
        asm.move_memory_immediate(base, 8, 0x7f);
        let (mnemonic, ops) = disassemble(asm.bytes());
        assert_eq!(mnemonic, "mov", "{base}");
        assert_eq!(ops, format!("qword ptr [{base}], 0x7f"));
    }

    let mut asm = new_asm();
    asm.move_memory_immediate("r13", 1, 0x7f);
    let (mnemonic, ops) = disassemble(asm.bytes());
    assert_eq!(mnemonic, "mov");
    assert_eq!(ops, "byte ptr [r13], 0x7f");
}

#[test]
fn random_immediate_moves_disassemble_cleanly() {
    let groups: &[(&[&str], u64)] = &[
        (BYTE, u64::from(u8::MAX)),
        (WORD, u64::from(u16::MAX)),
        (DWORD, u64::from(u32::MAX)),
        (QWORD, u64::MAX),
    ];
    arbtest(|u| {
        let &(regs, mask) = u.choose(groups)?;
        let reg = u.choose(regs)?;
        let value = u.arbitrary::<u64>()? & mask;
        let mut asm = new_asm();
        asm.set_optimizer(u.arbitrary()?);
        asm.move_register_immediate(reg, value);
        let (mnemonic, _) = disassemble(asm.bytes());
        assert!(
            mnemonic.starts_with("mov"),
            "unexpected mnemonic for mov {reg}, {value:#x}: {mnemonic}"
        );
        Ok(())
    })
    .budget_ms(1_000);
}

#[test]
fn random_memory_stores_disassemble_cleanly() {
    arbtest(|u| {
        let base = u.choose(QWORD)?;
        let (byte_count, mask) = *u.choose(&[
            (1_u8, u64::from(u8::MAX)),
            (2, u64::from(u16::MAX)),
            (4, u64::from(u32::MAX)),
            (8, u64::from(i32::MAX as u32)),
        ])?;
        let value = u.arbitrary::<u64>()? & mask;
        let mut asm = new_asm();
        asm.move_memory_immediate(base, byte_count, value);
        let (mnemonic, _) = disassemble(asm.bytes());
        assert_eq!(mnemonic, "mov", "mov [{base}], {value:#x} ({byte_count}b)");
        Ok(())
    })
    .budget_ms(1_000);
}
