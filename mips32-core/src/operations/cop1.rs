//! COP1 (floating-point) operations. Arithmetic uses the host's IEEE-754
//! in round-to-nearest-even; conversions to word honor the FCSR rounding
//! mode. Compares set the FCSR condition bit, which BC1T/BC1F read.

use crate::constants::*;
use crate::cpu::Cpu;
use crate::exception::Exception;
use crate::instruction::Instruction;
use crate::math::round_to_word;
use crate::memory::Memory;
use crate::operations::{load_word, store_word};
use crate::registers::Fcsr;

impl Cpu {
    pub(crate) fn op_cop1(&mut self, instruction: Instruction) -> Result<(), Exception> {
        match instruction.fp_format() {
            COP1_MFC1 => {
                let value = self.fp_registers.get(instruction.fs_register());
                self.registers.set(instruction.t_register(), value);
                self.advance_program_counter();
                Ok(())
            }
            COP1_MTC1 => {
                let value = self.registers.get(instruction.t_register());
                self.fp_registers.set(instruction.fs_register(), value);
                self.advance_program_counter();
                Ok(())
            }
            // Only the FCSR exists among the FP control registers
            COP1_CFC1 => {
                if instruction.fs_register() != FP_CONTROL_FCSR {
                    return Err(Exception::ReservedInstruction(instruction.0));
                }
                self.registers.set(instruction.t_register(), self.fcsr.0);
                self.advance_program_counter();
                Ok(())
            }
            COP1_CTC1 => {
                if instruction.fs_register() != FP_CONTROL_FCSR {
                    return Err(Exception::ReservedInstruction(instruction.0));
                }
                self.fcsr = Fcsr(self.registers.get(instruction.t_register()));
                self.advance_program_counter();
                Ok(())
            }
            COP1_BC1 => {
                // rt bit 0 picks the sense: BC1T branches on a set
                // condition bit, BC1F on a clear one
                let wanted = instruction.t_register() & 1 == 1;
                let taken = self.fcsr.condition() == wanted;
                self.branch(taken, instruction.immediate());
                Ok(())
            }
            FMT_SINGLE => self.fp_single(instruction),
            FMT_DOUBLE => self.fp_double(instruction),
            FMT_WORD => self.fp_word(instruction),
            _ => Err(Exception::ReservedInstruction(instruction.0)),
        }
    }

    fn fp_single(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let fs = self.fp_registers.read_single(instruction.fs_register());
        let ft = self.fp_registers.read_single(instruction.ft_register());
        let fd = instruction.fd_register();

        match instruction.function() {
            FP_FUNCTION_ADD => self.fp_registers.write_single(fd, fs + ft),
            FP_FUNCTION_SUB => self.fp_registers.write_single(fd, fs - ft),
            FP_FUNCTION_MUL => self.fp_registers.write_single(fd, fs * ft),
            FP_FUNCTION_DIV => self.fp_registers.write_single(fd, fs / ft),
            FP_FUNCTION_ABS => self.fp_registers.write_single(fd, fs.abs()),
            FP_FUNCTION_MOV => self.fp_registers.write_single(fd, fs),
            FP_FUNCTION_NEG => self.fp_registers.write_single(fd, -fs),
            FP_FUNCTION_CVT_D => self.fp_registers.write_double(fd, fs as f64),
            FP_FUNCTION_CVT_W => {
                let value = round_to_word(fs as f64, self.fcsr.rounding_mode());
                self.fp_registers.set(fd, value as u32);
            }
            function if function >= FP_FUNCTION_C_COND => {
                let result = fp_compare(function, fs as f64, ft as f64);
                self.fcsr.set_condition(result);
            }
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        }
        self.advance_program_counter();
        Ok(())
    }

    fn fp_double(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let fs = self.fp_registers.read_double(instruction.fs_register());
        let ft = self.fp_registers.read_double(instruction.ft_register());
        let fd = instruction.fd_register();

        match instruction.function() {
            FP_FUNCTION_ADD => self.fp_registers.write_double(fd, fs + ft),
            FP_FUNCTION_SUB => self.fp_registers.write_double(fd, fs - ft),
            FP_FUNCTION_MUL => self.fp_registers.write_double(fd, fs * ft),
            FP_FUNCTION_DIV => self.fp_registers.write_double(fd, fs / ft),
            FP_FUNCTION_ABS => self.fp_registers.write_double(fd, fs.abs()),
            FP_FUNCTION_MOV => self.fp_registers.write_double(fd, fs),
            FP_FUNCTION_NEG => self.fp_registers.write_double(fd, -fs),
            FP_FUNCTION_CVT_S => self.fp_registers.write_single(fd, fs as f32),
            FP_FUNCTION_CVT_W => {
                let value = round_to_word(fs, self.fcsr.rounding_mode());
                self.fp_registers.set(fd, value as u32);
            }
            function if function >= FP_FUNCTION_C_COND => {
                let result = fp_compare(function, fs, ft);
                self.fcsr.set_condition(result);
            }
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        }
        self.advance_program_counter();
        Ok(())
    }

    /// Conversions from a fixed-point word held in an FPR
    fn fp_word(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let fs = self.fp_registers.get(instruction.fs_register()) as i32;
        let fd = instruction.fd_register();

        match instruction.function() {
            FP_FUNCTION_CVT_S => self.fp_registers.write_single(fd, fs as f32),
            FP_FUNCTION_CVT_D => self.fp_registers.write_double(fd, fs as f64),
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        }
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_lwc1(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.fp_effective_address(instruction);
        let value = load_word(ram, address)?;
        self.fp_registers.set(instruction.ft_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Load a double as two word accesses; the low word lands in the even
    /// register of the pair
    pub(crate) fn op_ldc1(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.fp_effective_address(instruction);
        let low = load_word(ram, address)?;
        let high = load_word(ram, address.wrapping_add(4))?;
        let even = instruction.ft_register() & !1;
        self.fp_registers.set(even, low);
        self.fp_registers.set(even + 1, high);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_swc1(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.fp_effective_address(instruction);
        store_word(ram, address, self.fp_registers.get(instruction.ft_register()))?;
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_sdc1(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.fp_effective_address(instruction);
        let even = instruction.ft_register() & !1;
        store_word(ram, address, self.fp_registers.get(even))?;
        store_word(ram, address.wrapping_add(4), self.fp_registers.get(even + 1))?;
        self.advance_program_counter();
        Ok(())
    }

    fn fp_effective_address(&self, instruction: Instruction) -> u32 {
        crate::math::add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        )
    }
}

/// C.cond predicate: the low three condition bits select an or of
/// less/equal/unordered. Bit 3 (signaling) only affects exception flags,
/// which this machine does not model.
fn fp_compare(function: u8, a: f64, b: f64) -> bool {
    let cond = function & 0x7;
    let unordered = a.is_nan() || b.is_nan();
    let less = !unordered && a < b;
    let equal = !unordered && a == b;

    (cond & 0x4 != 0 && less) || (cond & 0x2 != 0 && equal) || (cond & 0x1 != 0 && unordered)
}
