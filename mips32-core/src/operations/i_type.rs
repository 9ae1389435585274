use crate::constants::{REGIMM_BGEZ, REGIMM_BGEZAL, REGIMM_BLTZ, REGIMM_BLTZAL, REG_RA};
use crate::cpu::Cpu;
use crate::exception::Exception;
use crate::instruction::Instruction;
use crate::math::add_unsigned;
use crate::memory::Memory;
use crate::operations::{load_byte, load_half, load_word, store_byte, store_half, store_word};

impl Cpu {
    pub(crate) fn op_beq(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());
        self.branch(s == t, instruction.immediate());
        Ok(())
    }

    pub(crate) fn op_bne(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());
        self.branch(s != t, instruction.immediate());
        Ok(())
    }

    pub(crate) fn op_blez(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;
        self.branch(s <= 0, instruction.immediate());
        Ok(())
    }

    pub(crate) fn op_bgtz(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;
        self.branch(s > 0, instruction.immediate());
        Ok(())
    }

    /// BLTZ/BGEZ and their linking variants, selected by the rt field.
    /// The linking variants write the return address whether or not the
    /// branch is taken.
    pub(crate) fn op_regimm(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;

        let (taken, link) = match instruction.t_register() {
            REGIMM_BLTZ => (s < 0, false),
            REGIMM_BGEZ => (s >= 0, false),
            REGIMM_BLTZAL => (s < 0, true),
            REGIMM_BGEZAL => (s >= 0, true),
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        };

        if link {
            let return_address = self.program_counter.wrapping_add(8);
            self.registers.set(REG_RA, return_address);
        }
        self.branch(taken, instruction.immediate());
        Ok(())
    }

    pub(crate) fn op_addi(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;
        let value = s
            .checked_add(instruction.immediate() as i32)
            .ok_or(Exception::ArithmeticOverflow)?;
        self.registers.set(instruction.t_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_addiu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let value = add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        );
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_slti(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register()) as i32;
        let value = (s < instruction.immediate() as i32) as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_sltiu(&mut self, instruction: Instruction) -> Result<(), Exception> {
        // The immediate is sign-extended, then compared unsigned
        let s = self.registers.get(instruction.s_register());
        let value = (s < instruction.immediate() as i32 as u32) as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_andi(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let value = s & instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_ori(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let value = s | instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_xori(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let value = s ^ instruction.immediate() as u16 as u32;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// AUI places the immediate in the upper half and adds it to rs.
    /// With `rs == 0` this is LUI.
    pub(crate) fn op_aui(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let s = self.registers.get(instruction.s_register());
        let value = s.wrapping_add((instruction.immediate() as u16 as u32) << 16);
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    fn effective_address(&self, instruction: Instruction) -> u32 {
        add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        )
    }

    pub(crate) fn op_lb(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = load_byte(ram, self.effective_address(instruction))? as i8;
        self.registers.set(instruction.t_register(), value as i32 as u32);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_lbu(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = load_byte(ram, self.effective_address(instruction))?;
        self.registers.set(instruction.t_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_lh(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = load_half(ram, self.effective_address(instruction))? as i16;
        self.registers.set(instruction.t_register(), value as i32 as u32);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_lhu(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = load_half(ram, self.effective_address(instruction))?;
        self.registers.set(instruction.t_register(), value as u32);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_lw(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = load_word(ram, self.effective_address(instruction))?;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_sb(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = self.registers.get(instruction.t_register()) as u8;
        store_byte(ram, self.effective_address(instruction), value)?;
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_sh(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = self.registers.get(instruction.t_register()) as u16;
        store_half(ram, self.effective_address(instruction), value)?;
        self.advance_program_counter();
        Ok(())
    }

    pub(crate) fn op_sw(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let value = self.registers.get(instruction.t_register());
        store_word(ram, self.effective_address(instruction), value)?;
        self.advance_program_counter();
        Ok(())
    }

    /// Load linked: a word load that opens a reservation on the address
    pub(crate) fn op_ll(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.effective_address(instruction);
        let value = load_word(ram, address)?;
        self.registers.set(instruction.t_register(), value);
        self.reservation = Some(address);
        self.advance_program_counter();
        Ok(())
    }

    /// Store conditional: succeeds only while the reservation covers the
    /// accessed word. Every SC clears the reservation, either way.
    pub(crate) fn op_sc(&mut self, instruction: Instruction, ram: &mut Memory) -> Result<(), Exception> {
        let address = self.effective_address(instruction);
        if address % 4 != 0 {
            return Err(Exception::AddressErrorData(address));
        }

        let success = self.reservation == Some(address);
        self.reservation = None;
        if success {
            store_word(ram, address, self.registers.get(instruction.t_register()))?;
        }
        self.registers.set(instruction.t_register(), success as u32);
        self.advance_program_counter();
        Ok(())
    }
}
