//! Built-in demo: reads two integers X and Y from the console and prints
//! their sum, difference, product, and quotient. Hand-assembled as a
//! little-endian word stream loaded at the boot address.

use mips32_core::constants::*;
use mips32_core::{Machine, MemoryFault};

const ZERO: u8 = 0;
const A0: u8 = REG_A0;
const V0: u8 = REG_V0;
const S0: u8 = 16;
const S1: u8 = 17;

const STR_X: u32 = BOOT_ADDRESS + 0x400;
const STR_Y: u32 = BOOT_ADDRESS + 0x410;
const STR_SUM: u32 = BOOT_ADDRESS + 0x420;
const STR_DIFF: u32 = BOOT_ADDRESS + 0x430;
const STR_PROD: u32 = BOOT_ADDRESS + 0x440;
const STR_QUOT: u32 = BOOT_ADDRESS + 0x450;
const STR_NL: u32 = BOOT_ADDRESS + 0x460;

const fn i_type(op: u8, rs: u8, rt: u8, immediate: u16) -> u32 {
    ((op as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | immediate as u32
}

const fn r_type(function: u8, rs: u8, rt: u8, rd: u8, shamt: u8) -> u32 {
    ((rs as u32) << 21)
        | ((rt as u32) << 16)
        | ((rd as u32) << 11)
        | ((shamt as u32) << 6)
        | function as u32
}

const fn lui(rt: u8, immediate: u16) -> u32 {
    i_type(OP_AUI, 0, rt, immediate)
}

const fn ori(rt: u8, rs: u8, immediate: u16) -> u32 {
    i_type(OP_ORI, rs, rt, immediate)
}

const fn li_v0(value: u16) -> u32 {
    i_type(OP_ADDIU, 0, V0, value)
}

const fn addu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_ADDU, rs, rt, rd, 0)
}

const fn subu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SUBU, rs, rt, rd, 0)
}

const fn mul(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP30, rs, rt, rd, SOP_LOW)
}

const fn div(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP32, rs, rt, rd, SOP_LOW)
}

const fn syscall() -> u32 {
    FUNCTION_SYSCALL as u32
}

static DEMO_TEXT: &[u32] = &[
    // print "X: ", read X into s0
    lui(A0, (STR_X >> 16) as u16),
    ori(A0, A0, STR_X as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    li_v0(SYSCALL_READ_INT as u16),
    syscall(),
    addu(S0, V0, ZERO),
    // print "Y: ", read Y into s1
    lui(A0, (STR_Y >> 16) as u16),
    ori(A0, A0, STR_Y as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    li_v0(SYSCALL_READ_INT as u16),
    syscall(),
    addu(S1, V0, ZERO),
    // "X + Y = " and the sum
    lui(A0, (STR_SUM >> 16) as u16),
    ori(A0, A0, STR_SUM as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    addu(A0, S0, S1),
    li_v0(SYSCALL_PRINT_INT as u16),
    syscall(),
    lui(A0, (STR_NL >> 16) as u16),
    ori(A0, A0, STR_NL as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    // "X - Y = " and the difference
    lui(A0, (STR_DIFF >> 16) as u16),
    ori(A0, A0, STR_DIFF as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    subu(A0, S0, S1),
    li_v0(SYSCALL_PRINT_INT as u16),
    syscall(),
    lui(A0, (STR_NL >> 16) as u16),
    ori(A0, A0, STR_NL as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    // "X * Y = " and the product
    lui(A0, (STR_PROD >> 16) as u16),
    ori(A0, A0, STR_PROD as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    mul(A0, S0, S1),
    li_v0(SYSCALL_PRINT_INT as u16),
    syscall(),
    lui(A0, (STR_NL >> 16) as u16),
    ori(A0, A0, STR_NL as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    // "X / Y = " and the quotient
    lui(A0, (STR_QUOT >> 16) as u16),
    ori(A0, A0, STR_QUOT as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    div(A0, S0, S1),
    li_v0(SYSCALL_PRINT_INT as u16),
    syscall(),
    lui(A0, (STR_NL >> 16) as u16),
    ori(A0, A0, STR_NL as u16),
    li_v0(SYSCALL_PRINT_STR as u16),
    syscall(),
    // done
    li_v0(SYSCALL_EXIT as u16),
    syscall(),
];

/// Load the demo image and point the PC at it. Returns the entry point.
pub fn load(machine: &mut Machine) -> Result<u32, MemoryFault> {
    let mut inspector = machine.inspector();

    let mut text = Vec::with_capacity(DEMO_TEXT.len() * 4);
    for word in DEMO_TEXT {
        text.extend_from_slice(&word.to_le_bytes());
    }
    inspector.write_ram(BOOT_ADDRESS, &text)?;

    inspector.write_ram(STR_X, b"X: \0")?;
    inspector.write_ram(STR_Y, b"Y: \0")?;
    inspector.write_ram(STR_SUM, b"X + Y = \0")?;
    inspector.write_ram(STR_DIFF, b"X - Y = \0")?;
    inspector.write_ram(STR_PROD, b"X * Y = \0")?;
    inspector.write_ram(STR_QUOT, b"X / Y = \0")?;
    inspector.write_ram(STR_NL, b"\n\0")?;

    inspector.set_pc(BOOT_ADDRESS);
    Ok(BOOT_ADDRESS)
}
