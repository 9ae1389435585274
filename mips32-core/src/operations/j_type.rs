use crate::constants::REG_RA;
use crate::cpu::Cpu;
use crate::exception::Exception;
use crate::instruction::Instruction;

impl Cpu {
    pub(crate) fn op_j(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let address = instruction.real_address(self.program_counter);
        self.jump_to(address);
        Ok(())
    }

    pub(crate) fn op_jal(&mut self, instruction: Instruction) -> Result<(), Exception> {
        let address = instruction.real_address(self.program_counter);
        let return_address = self.jump_to(address);
        self.registers.set(REG_RA, return_address);
        Ok(())
    }

    /// JALX links and jumps like JAL; there is no other instruction set
    /// to switch into.
    pub(crate) fn op_jalx(&mut self, instruction: Instruction) -> Result<(), Exception> {
        self.op_jal(instruction)
    }
}
