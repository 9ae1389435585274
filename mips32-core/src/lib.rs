//! A MIPS32 user-mode virtual machine: paged main memory with
//! disk-backed eviction, a CPU with precise exceptions and branch delay
//! slots, a console/file syscall layer, and an inspector for debuggers
//! and loaders.

#[macro_use]
extern crate log;

pub mod config;
pub mod constants;
mod cpu;
mod exception;
pub mod host;
mod inspector;
mod instruction;
mod machine;
mod math;
mod memory;
mod operations;
mod registers;

pub use {
    exception::*,
    inspector::MachineInspector,
    instruction::Instruction,
    machine::{Machine, StopToken},
    memory::{Memory, MemoryFault, PAGE_BITS, PAGE_SIZE},
    registers::{Fcsr, FpRegisters, Registers, RoundingMode},
};
