// Operation codes
pub const OP_SPECIAL: u8 = 0x00;
pub const OP_REGIMM: u8 = 0x01;
pub const OP_J: u8 = 0x02;
pub const OP_JAL: u8 = 0x03;
pub const OP_BEQ: u8 = 0x04;
pub const OP_BNE: u8 = 0x05;
pub const OP_BLEZ: u8 = 0x06;
pub const OP_BGTZ: u8 = 0x07;
pub const OP_ADDI: u8 = 0x08;
pub const OP_ADDIU: u8 = 0x09;
pub const OP_SLTI: u8 = 0x0A;
pub const OP_SLTIU: u8 = 0x0B;
pub const OP_ANDI: u8 = 0x0C;
pub const OP_ORI: u8 = 0x0D;
pub const OP_XORI: u8 = 0x0E;
/// AUI; LUI is the `rs == 0` special case
pub const OP_AUI: u8 = 0x0F;
pub const OP_COP1: u8 = 0x11;
pub const OP_JALX: u8 = 0x1D;
pub const OP_LB: u8 = 0x20;
pub const OP_LH: u8 = 0x21;
pub const OP_LW: u8 = 0x23;
pub const OP_LBU: u8 = 0x24;
pub const OP_LHU: u8 = 0x25;
pub const OP_SB: u8 = 0x28;
pub const OP_SH: u8 = 0x29;
pub const OP_SW: u8 = 0x2B;
pub const OP_LL: u8 = 0x30;
pub const OP_LWC1: u8 = 0x31;
pub const OP_LDC1: u8 = 0x35;
pub const OP_SC: u8 = 0x38;
pub const OP_SWC1: u8 = 0x39;
pub const OP_SDC1: u8 = 0x3D;

// R-type function codes
pub const FUNCTION_SLL: u8 = 0x00;
pub const FUNCTION_SRL: u8 = 0x02;
pub const FUNCTION_SRA: u8 = 0x03;
pub const FUNCTION_SLLV: u8 = 0x04;
pub const FUNCTION_SRLV: u8 = 0x06;
pub const FUNCTION_SRAV: u8 = 0x07;
pub const FUNCTION_JR: u8 = 0x08;
pub const FUNCTION_JALR: u8 = 0x09;
pub const FUNCTION_SYSCALL: u8 = 0x0C;
pub const FUNCTION_BREAK: u8 = 0x0D;
pub const FUNCTION_MFHI: u8 = 0x10;
pub const FUNCTION_MTHI: u8 = 0x11;
pub const FUNCTION_MFLO: u8 = 0x12;
pub const FUNCTION_MTLO: u8 = 0x13;
/// MUL/MUH, selected by the shift-amount field
pub const FUNCTION_SOP30: u8 = 0x18;
/// MULU/MUHU
pub const FUNCTION_SOP31: u8 = 0x19;
/// DIV/MOD
pub const FUNCTION_SOP32: u8 = 0x1A;
/// DIVU/MODU
pub const FUNCTION_SOP33: u8 = 0x1B;
pub const FUNCTION_ADD: u8 = 0x20;
pub const FUNCTION_ADDU: u8 = 0x21;
pub const FUNCTION_SUB: u8 = 0x22;
pub const FUNCTION_SUBU: u8 = 0x23;
pub const FUNCTION_AND: u8 = 0x24;
pub const FUNCTION_OR: u8 = 0x25;
pub const FUNCTION_XOR: u8 = 0x26;
pub const FUNCTION_NOR: u8 = 0x27;
pub const FUNCTION_SLT: u8 = 0x2A;
pub const FUNCTION_SLTU: u8 = 0x2B;

/// Selector values in the shift-amount field of the SOP3x encodings
pub const SOP_LOW: u8 = 0x02;
pub const SOP_HIGH: u8 = 0x03;

// REGIMM rt-field codes
pub const REGIMM_BLTZ: u8 = 0x00;
pub const REGIMM_BGEZ: u8 = 0x01;
pub const REGIMM_BLTZAL: u8 = 0x10;
pub const REGIMM_BGEZAL: u8 = 0x11;

// COP1 rs-field (format) codes
pub const COP1_MFC1: u8 = 0x00;
pub const COP1_CFC1: u8 = 0x02;
pub const COP1_MTC1: u8 = 0x04;
pub const COP1_CTC1: u8 = 0x06;
pub const COP1_BC1: u8 = 0x08;
/// The FP control register number holding the FCSR
pub const FP_CONTROL_FCSR: u8 = 31;

pub const FMT_SINGLE: u8 = 0x10;
pub const FMT_DOUBLE: u8 = 0x11;
pub const FMT_WORD: u8 = 0x14;

// COP1 function codes
pub const FP_FUNCTION_ADD: u8 = 0x00;
pub const FP_FUNCTION_SUB: u8 = 0x01;
pub const FP_FUNCTION_MUL: u8 = 0x02;
pub const FP_FUNCTION_DIV: u8 = 0x03;
pub const FP_FUNCTION_ABS: u8 = 0x05;
pub const FP_FUNCTION_MOV: u8 = 0x06;
pub const FP_FUNCTION_NEG: u8 = 0x07;
pub const FP_FUNCTION_CVT_S: u8 = 0x20;
pub const FP_FUNCTION_CVT_D: u8 = 0x21;
pub const FP_FUNCTION_CVT_W: u8 = 0x24;
/// C.cond occupies 0x30..=0x3F; the low four bits select the predicate
pub const FP_FUNCTION_C_COND: u8 = 0x30;

// Register numbers
pub const REG_V0: u8 = 2;
pub const REG_A0: u8 = 4;
pub const REG_A1: u8 = 5;
pub const REG_A2: u8 = 6;
pub const REG_A3: u8 = 7;
/// The stack pointer register
pub const REG_SP: u8 = 29;
pub const REG_RA: u8 = 31;

/// FP argument register for float/double syscalls
pub const FP_REG_F12: u8 = 12;
/// FP result register for float/double syscalls
pub const FP_REG_F0: u8 = 0;

pub static REGISTER_NAMES: [&str; 32] = [
    "$zero", "$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3",
    "$t4", "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7",
    "$t8", "$t9", "$k0", "$k1", "$gp", "$sp", "$fp", "$ra",
];

// Syscall codes
pub const SYSCALL_PRINT_INT: u32 = 1;
pub const SYSCALL_PRINT_FLOAT: u32 = 2;
pub const SYSCALL_PRINT_DOUBLE: u32 = 3;
pub const SYSCALL_PRINT_STR: u32 = 4;
pub const SYSCALL_READ_INT: u32 = 5;
pub const SYSCALL_READ_FLOAT: u32 = 6;
pub const SYSCALL_READ_DOUBLE: u32 = 7;
pub const SYSCALL_READ_STR: u32 = 8;
pub const SYSCALL_SBRK: u32 = 9;
pub const SYSCALL_EXIT: u32 = 10;
pub const SYSCALL_FILE_OPEN: u32 = 13;
pub const SYSCALL_FILE_READ: u32 = 14;
pub const SYSCALL_FILE_WRITE: u32 = 15;
pub const SYSCALL_FILE_CLOSE: u32 = 16;

/// Upper bound on guest C-strings copied out by the syscall layer.
/// Longer strings are truncated at this many bytes.
pub const MAX_STRING_BYTES: usize = 4096;

/// Default boot address
pub const BOOT_ADDRESS: u32 = 0x8000_0000;
