#![allow(dead_code)]

use mips32_core::config::Config;
use mips32_core::constants::*;
use mips32_core::host::{FileHandler, IoDevice};
use mips32_core::{Machine, PAGE_SIZE};
use std::collections::VecDeque;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small-footprint machine config used by most tests
pub fn test_config() -> Config {
    Config {
        ram_budget_bytes: 16 * PAGE_SIZE as u64,
        boot_address: BOOT_ADDRESS,
    }
}

/// Load a word stream at `address` through the inspector
pub fn load_words(machine: &mut Machine, address: u32, words: &[u32]) {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    machine.inspector().write_ram(address, &bytes).unwrap();
}

/// Load a program at the boot address and run it to completion
pub fn run_program(machine: &mut Machine, words: &[u32]) {
    load_words(machine, BOOT_ADDRESS, words);
    machine.start();
}

// Instruction encoders

pub fn r_type(function: u8, rs: u8, rt: u8, rd: u8, shamt: u8) -> u32 {
    ((rs as u32) << 21)
        | ((rt as u32) << 16)
        | ((rd as u32) << 11)
        | ((shamt as u32) << 6)
        | function as u32
}

pub fn i_type(op: u8, rs: u8, rt: u8, immediate: u16) -> u32 {
    ((op as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | immediate as u32
}

pub fn j_type(op: u8, target_address: u32) -> u32 {
    ((op as u32) << 26) | ((target_address >> 2) & 0x03FF_FFFF)
}

pub fn cop1(fmt: u8, ft: u8, fs: u8, fd: u8, function: u8) -> u32 {
    ((OP_COP1 as u32) << 26)
        | ((fmt as u32) << 21)
        | ((ft as u32) << 16)
        | ((fs as u32) << 11)
        | ((fd as u32) << 6)
        | function as u32
}

pub fn nop() -> u32 {
    0
}

pub fn addiu(rt: u8, rs: u8, immediate: i16) -> u32 {
    i_type(OP_ADDIU, rs, rt, immediate as u16)
}

pub fn addi(rt: u8, rs: u8, immediate: i16) -> u32 {
    i_type(OP_ADDI, rs, rt, immediate as u16)
}

pub fn lui(rt: u8, immediate: u16) -> u32 {
    i_type(OP_AUI, 0, rt, immediate)
}

pub fn ori(rt: u8, rs: u8, immediate: u16) -> u32 {
    i_type(OP_ORI, rs, rt, immediate)
}

pub fn addu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_ADDU, rs, rt, rd, 0)
}

pub fn subu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SUBU, rs, rt, rd, 0)
}

pub fn mul(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP30, rs, rt, rd, SOP_LOW)
}

pub fn muh(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP30, rs, rt, rd, SOP_HIGH)
}

pub fn mulu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP31, rs, rt, rd, SOP_LOW)
}

pub fn muhu(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP31, rs, rt, rd, SOP_HIGH)
}

pub fn div(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP32, rs, rt, rd, SOP_LOW)
}

pub fn modulo(rd: u8, rs: u8, rt: u8) -> u32 {
    r_type(FUNCTION_SOP32, rs, rt, rd, SOP_HIGH)
}

pub fn beq(rs: u8, rt: u8, offset: i16) -> u32 {
    i_type(OP_BEQ, rs, rt, offset as u16)
}

pub fn bne(rs: u8, rt: u8, offset: i16) -> u32 {
    i_type(OP_BNE, rs, rt, offset as u16)
}

pub fn bltzal(rs: u8, offset: i16) -> u32 {
    i_type(OP_REGIMM, rs, REGIMM_BLTZAL, offset as u16)
}

pub fn jal(target_address: u32) -> u32 {
    j_type(OP_JAL, target_address)
}

pub fn jump(target_address: u32) -> u32 {
    j_type(OP_J, target_address)
}

pub fn jr(rs: u8) -> u32 {
    r_type(FUNCTION_JR, rs, 0, 0, 0)
}

pub fn lw(rt: u8, base: u8, offset: i16) -> u32 {
    i_type(OP_LW, base, rt, offset as u16)
}

pub fn sw(rt: u8, base: u8, offset: i16) -> u32 {
    i_type(OP_SW, base, rt, offset as u16)
}

pub fn lh(rt: u8, base: u8, offset: i16) -> u32 {
    i_type(OP_LH, base, rt, offset as u16)
}

pub fn ll(rt: u8, base: u8, offset: i16) -> u32 {
    i_type(OP_LL, base, rt, offset as u16)
}

pub fn sc(rt: u8, base: u8, offset: i16) -> u32 {
    i_type(OP_SC, base, rt, offset as u16)
}

pub fn mtc1(rt: u8, fs: u8) -> u32 {
    cop1(COP1_MTC1, rt, fs, 0, 0)
}

pub fn mfc1(rt: u8, fs: u8) -> u32 {
    cop1(COP1_MFC1, rt, fs, 0, 0)
}

pub fn bc1t(offset: i16) -> u32 {
    i_type(OP_COP1, COP1_BC1, 1, offset as u16)
}

pub fn bc1f(offset: i16) -> u32 {
    i_type(OP_COP1, COP1_BC1, 0, offset as u16)
}

pub fn syscall() -> u32 {
    r_type(FUNCTION_SYSCALL, 0, 0, 0, 0)
}

pub fn break_instruction() -> u32 {
    r_type(FUNCTION_BREAK, 0, 0, 0, 0)
}

/// `$v0 = number; syscall`
pub fn syscall_pair(number: u32) -> [u32; 2] {
    [addiu(REG_V0, 0, number as i16), syscall()]
}

/// The two-instruction exit sequence appended to most test programs
pub fn exit_sequence() -> [u32; 2] {
    syscall_pair(SYSCALL_EXIT)
}

// Host mocks

/// Scripted console: reads pop from queues, prints are recorded
#[derive(Default)]
pub struct ScriptedIo {
    pub int_input: VecDeque<u32>,
    pub float_input: VecDeque<f32>,
    pub double_input: VecDeque<f64>,
    pub string_input: VecDeque<Vec<u8>>,
    pub printed_ints: Vec<u32>,
    pub printed_floats: Vec<f32>,
    pub printed_doubles: Vec<f64>,
    pub printed_strings: Vec<Vec<u8>>,
}

impl IoDevice for ScriptedIo {
    fn print_integer(&mut self, value: u32) {
        self.printed_ints.push(value);
    }

    fn print_float(&mut self, value: f32) {
        self.printed_floats.push(value);
    }

    fn print_double(&mut self, value: f64) {
        self.printed_doubles.push(value);
    }

    fn print_string(&mut self, string: &[u8]) {
        self.printed_strings.push(string.to_vec());
    }

    fn read_integer(&mut self) -> u32 {
        self.int_input.pop_front().unwrap_or(0)
    }

    fn read_float(&mut self) -> f32 {
        self.float_input.pop_front().unwrap_or(0.0)
    }

    fn read_double(&mut self) -> f64 {
        self.double_input.pop_front().unwrap_or(0.0)
    }

    fn read_string(&mut self, buffer: &mut [u8]) -> usize {
        let input = self.string_input.pop_front().unwrap_or_default();
        let count = input.len().min(buffer.len());
        buffer[..count].copy_from_slice(&input[..count]);
        count
    }
}

/// Recording file handler with scripted read data
#[derive(Default)]
pub struct RecordingFiles {
    pub opens: Vec<(Vec<u8>, Vec<u8>)>,
    pub writes: Vec<(u32, Vec<u8>)>,
    pub closes: Vec<u32>,
    pub read_data: VecDeque<Vec<u8>>,
    pub next_fd: u32,
    pub fail_open: bool,
}

impl FileHandler for RecordingFiles {
    fn open(&mut self, name: &[u8], flags: &[u8]) -> u32 {
        self.opens.push((name.to_vec(), flags.to_vec()));
        if self.fail_open {
            return u32::MAX;
        }
        let fd = self.next_fd;
        self.next_fd += 1;
        fd
    }

    fn read(&mut self, _fd: u32, buffer: &mut [u8]) -> u32 {
        let data = self.read_data.pop_front().unwrap_or_default();
        let count = data.len().min(buffer.len());
        buffer[..count].copy_from_slice(&data[..count]);
        count as u32
    }

    fn write(&mut self, fd: u32, buffer: &[u8]) -> u32 {
        self.writes.push((fd, buffer.to_vec()));
        buffer.len() as u32
    }

    fn close(&mut self, fd: u32) {
        self.closes.push(fd);
    }
}
