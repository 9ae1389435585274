use crate::constants::{SOP_HIGH, SOP_LOW};
use crate::cpu::Cpu;
use crate::exception::Exception;
use crate::instruction::Instruction;

impl Cpu {
    /// Shift left logical
    pub(crate) fn op_sll(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let value = self.registers.get(instruction.t_register()) << instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Shift right logical
    pub(crate) fn op_srl(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let value = self.registers.get(instruction.t_register()) >> instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Shift right arithmetic
    pub(crate) fn op_sra(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let value =
            (self.registers.get(instruction.t_register()) as i32) >> instruction.shift_amount();
        self.registers.set(instruction.d_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Shift left logical variable. Only the low five bits of the shift
    /// register are used.
    pub(crate) fn op_sllv(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let amount = self.registers.get(instruction.s_register()) & 0x1F;
        let value = self.registers.get(instruction.t_register()) << amount;
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Shift right logical variable
    pub(crate) fn op_srlv(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let amount = self.registers.get(instruction.s_register()) & 0x1F;
        let value = self.registers.get(instruction.t_register()) >> amount;
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Shift right arithmetic variable
    pub(crate) fn op_srav(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let amount = self.registers.get(instruction.s_register()) & 0x1F;
        let value = (self.registers.get(instruction.t_register()) as i32) >> amount;
        self.registers.set(instruction.d_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Jump register
    pub(crate) fn op_jr(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let address = self.registers.get(instruction.s_register());
        self.jump_to(address);
        Ok(())
    }

    /// Jump and link register
    pub(crate) fn op_jalr(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let address = self.registers.get(instruction.s_register());
        let return_register = instruction.d_register();
        let return_address = self.jump_to(address);
        self.registers.set(return_register, return_address);
        Ok(())
    }

    /// Move from HI
    pub(crate) fn op_mfhi(&mut self, instruction: Instruction) -> Result<(), Exception> {
        self.registers.set(instruction.d_register(), self.hi_register);
        self.advance_program_counter();
        Ok(())
    }

    /// Move to HI
    pub(crate) fn op_mthi(&mut self, instruction: Instruction) -> Result<(), Exception> {
        self.hi_register = self.registers.get(instruction.s_register());
        self.advance_program_counter();
        Ok(())
    }

    /// Move from LO
    pub(crate) fn op_mflo(&mut self, instruction: Instruction) -> Result<(), Exception> {
        self.registers.set(instruction.d_register(), self.lo_register);
        self.advance_program_counter();
        Ok(())
    }

    /// Move to LO
    pub(crate) fn op_mtlo(&mut self, instruction: Instruction) -> Result<(), Exception> {
        self.lo_register = self.registers.get(instruction.s_register());
        self.advance_program_counter();
        Ok(())
    }

    /// MUL/MUH: signed multiply, low or high word selected by the
    /// shift-amount field. HI and LO are not written.
    pub(crate) fn op_mul(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32 as i64;
        let t = self.registers.get(instruction.t_register()) as i32 as i64;
        let product = s.wrapping_mul(t);

        let value = match instruction.shift_amount() {
            SOP_LOW => product as u32,
            SOP_HIGH => (product >> 32) as u32,
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        };
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// MULU/MUHU: unsigned multiply
    pub(crate) fn op_mulu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as u64;
        let t = self.registers.get(instruction.t_register()) as u64;
        let product = s.wrapping_mul(t);

        let value = match instruction.shift_amount() {
            SOP_LOW => product as u32,
            SOP_HIGH => (product >> 32) as u32,
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        };
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// DIV/MOD: signed divide. Division by zero writes nothing and does
    /// not trap.
    pub(crate) fn op_div(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let sop = instruction.shift_amount();
        if sop != SOP_LOW && sop != SOP_HIGH {
            return Err(Exception::ReservedInstruction(instruction.0));
        }

        let s = self.registers.get(instruction.s_register()) as i32;
        let t = self.registers.get(instruction.t_register()) as i32;
        if t != 0 {
            let value = if sop == SOP_LOW {
                s.wrapping_div(t) as u32
            } else {
                s.wrapping_rem(t) as u32
            };
            self.registers.set(instruction.d_register(), value);
        }
        self.advance_program_counter();
        Ok(())
    }

    /// DIVU/MODU: unsigned divide
    pub(crate) fn op_divu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let sop = instruction.shift_amount();
        if sop != SOP_LOW && sop != SOP_HIGH {
            return Err(Exception::ReservedInstruction(instruction.0));
        }

        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());
        if t != 0 {
            let value = if sop == SOP_LOW { s / t } else { s % t };
            self.registers.set(instruction.d_register(), value);
        }
        self.advance_program_counter();
        Ok(())
    }

    /// Add (traps on signed overflow)
    pub(crate) fn op_add(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register()) as i32;
        let b = self.registers.get(instruction.t_register()) as i32;
        let value = a.checked_add(b).ok_or(Exception::ArithmeticOverflow)?;
        self.registers.set(instruction.d_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Add unsigned (wraps silently)
    pub(crate) fn op_addu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a.wrapping_add(b));
        self.advance_program_counter();
        Ok(())
    }

    /// Subtract (traps on signed overflow)
    pub(crate) fn op_sub(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register()) as i32;
        let b = self.registers.get(instruction.t_register()) as i32;
        let value = a.checked_sub(b).ok_or(Exception::ArithmeticOverflow)?;
        self.registers.set(instruction.d_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Subtract unsigned (wraps silently)
    pub(crate) fn op_subu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a.wrapping_sub(b));
        self.advance_program_counter();
        Ok(())
    }

    /// Bitwise and
    pub(crate) fn op_and(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a & b);
        self.advance_program_counter();
        Ok(())
    }

    /// Bitwise or
    pub(crate) fn op_or(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a | b);
        self.advance_program_counter();
        Ok(())
    }

    /// Bitwise exclusive or
    pub(crate) fn op_xor(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a ^ b);
        self.advance_program_counter();
        Ok(())
    }

    /// Bitwise nor
    pub(crate) fn op_nor(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), !(a | b));
        self.advance_program_counter();
        Ok(())
    }

    /// Set if less than (signed)
    pub(crate) fn op_slt(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;
        let t = self.registers.get(instruction.t_register()) as i32;
        self.registers
            .set(instruction.d_register(), (s < t) as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Set if less than (unsigned)
    pub(crate) fn op_sltu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), (s < t) as u32);
        self.advance_program_counter();
        Ok(())
    }
}
