use crate::constants::*;
use crate::exception::{Exception, ExceptionRecord, ExitCode};
use crate::host::{FileHandler, IoDevice};
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::registers::{Fcsr, FpRegisters, Registers};

/// A MIPS32 CPU: register file, two-slot program counter, and the
/// decoder/executor. Memory and host interfaces are borrowed per step by
/// the owning machine.
#[derive(Debug)]
pub struct Cpu {
    pub(crate) registers: Registers,
    pub(crate) fp_registers: FpRegisters,
    pub(crate) fcsr: Fcsr,
    pub(crate) hi_register: u32,
    pub(crate) lo_register: u32,
    pub(crate) program_counter: u32,
    pub(crate) next_program_counter: u32,
    /// Set by every branch and jump: the instruction about to execute
    /// sits in a delay slot
    delay_slot: bool,
    pub(crate) exit_code: ExitCode,
    pub(crate) exception: Option<ExceptionRecord>,
    /// Word address covered by an LL reservation
    pub(crate) reservation: Option<u32>,
}

impl Cpu {
    pub(crate) fn new(boot_address: u32) -> Self {
        Cpu {
            registers: Registers::new(),
            fp_registers: FpRegisters::new(),
            fcsr: Fcsr::default(),
            hi_register: 0,
            lo_register: 0,
            program_counter: boot_address,
            next_program_counter: boot_address.wrapping_add(4),
            delay_slot: false,
            exit_code: ExitCode::None,
            exception: None,
            reservation: None,
        }
    }

    /// Zero all architectural state and point the PC at `boot_address`
    pub(crate) fn reset(&mut self, boot_address: u32) {
        self.registers.clear();
        self.fp_registers.clear();
        self.fcsr = Fcsr::default();
        self.hi_register = 0;
        self.lo_register = 0;
        self.program_counter = boot_address;
        self.next_program_counter = boot_address.wrapping_add(4);
        self.delay_slot = false;
        self.exit_code = ExitCode::None;
        self.exception = None;
        self.reservation = None;
    }

    /// Execute exactly one instruction. Exceptions are recorded with the
    /// faulting PC (the branch PC when raised from a delay slot) and stop
    /// the machine with `ExitCode::Exception`.
    pub(crate) fn step(
        &mut self,
        ram: &mut Memory,
        io: &mut dyn IoDevice,
        files: &mut dyn FileHandler,
    ) {
        let in_delay_slot = self.delay_slot;
        self.delay_slot = false;

        if let Err(exception) = self.fetch_and_execute(ram, io, files) {
            let pc = if in_delay_slot {
                self.program_counter.wrapping_sub(4)
            } else {
                self.program_counter
            };
            debug!("exception {} at 0x{:08x} (bd={})", exception, pc, in_delay_slot);

            self.reservation = None;
            self.exception = Some(ExceptionRecord {
                kind: exception,
                pc,
                in_delay_slot,
            });
            self.exit_code = ExitCode::Exception;
        }
    }

    fn fetch_and_execute(
        &mut self,
        ram: &mut Memory,
        io: &mut dyn IoDevice,
        files: &mut dyn FileHandler,
    ) -> Result<(), Exception> {
        if self.program_counter % 4 != 0 {
            return Err(Exception::AddressErrorFetch(self.program_counter));
        }

        let word = ram
            .read_word(self.program_counter)
            .map_err(|_| Exception::MachineError)?;
        let instruction = Instruction(word);
        trace!(
            "0x{:08x}: {}",
            self.program_counter,
            instruction.stringify(self.program_counter)
        );

        self.execute(instruction, ram, io, files)
    }

    fn execute(
        &mut self,
        instruction: Instruction,
        ram: &mut Memory,
        io: &mut dyn IoDevice,
        files: &mut dyn FileHandler,
    ) -> Result<(), Exception> {
        match instruction.op_code() {
            OP_SPECIAL => match instruction.function() {
                FUNCTION_SLL => self.op_sll(instruction),
                FUNCTION_SRL => self.op_srl(instruction),
                FUNCTION_SRA => self.op_sra(instruction),
                FUNCTION_SLLV => self.op_sllv(instruction),
                FUNCTION_SRLV => self.op_srlv(instruction),
                FUNCTION_SRAV => self.op_srav(instruction),
                FUNCTION_JR => self.op_jr(instruction),
                FUNCTION_JALR => self.op_jalr(instruction),
                FUNCTION_SYSCALL => self.op_syscall(instruction, ram, io, files),
                FUNCTION_BREAK => Err(Exception::Breakpoint),
                FUNCTION_MFHI => self.op_mfhi(instruction),
                FUNCTION_MTHI => self.op_mthi(instruction),
                FUNCTION_MFLO => self.op_mflo(instruction),
                FUNCTION_MTLO => self.op_mtlo(instruction),
                FUNCTION_SOP30 => self.op_mul(instruction),
                FUNCTION_SOP31 => self.op_mulu(instruction),
                FUNCTION_SOP32 => self.op_div(instruction),
                FUNCTION_SOP33 => self.op_divu(instruction),
                FUNCTION_ADD => self.op_add(instruction),
                FUNCTION_ADDU => self.op_addu(instruction),
                FUNCTION_SUB => self.op_sub(instruction),
                FUNCTION_SUBU => self.op_subu(instruction),
                FUNCTION_AND => self.op_and(instruction),
                FUNCTION_OR => self.op_or(instruction),
                FUNCTION_XOR => self.op_xor(instruction),
                FUNCTION_NOR => self.op_nor(instruction),
                FUNCTION_SLT => self.op_slt(instruction),
                FUNCTION_SLTU => self.op_sltu(instruction),
                _ => Err(Exception::ReservedInstruction(instruction.0)),
            },
            OP_REGIMM => self.op_regimm(instruction),
            OP_J => self.op_j(instruction),
            OP_JAL => self.op_jal(instruction),
            OP_JALX => self.op_jalx(instruction),
            OP_BEQ => self.op_beq(instruction),
            OP_BNE => self.op_bne(instruction),
            OP_BLEZ => self.op_blez(instruction),
            OP_BGTZ => self.op_bgtz(instruction),
            OP_ADDI => self.op_addi(instruction),
            OP_ADDIU => self.op_addiu(instruction),
            OP_SLTI => self.op_slti(instruction),
            OP_SLTIU => self.op_sltiu(instruction),
            OP_ANDI => self.op_andi(instruction),
            OP_ORI => self.op_ori(instruction),
            OP_XORI => self.op_xori(instruction),
            OP_AUI => self.op_aui(instruction),
            OP_COP1 => self.op_cop1(instruction),
            OP_LB => self.op_lb(instruction, ram),
            OP_LBU => self.op_lbu(instruction, ram),
            OP_LH => self.op_lh(instruction, ram),
            OP_LHU => self.op_lhu(instruction, ram),
            OP_LW => self.op_lw(instruction, ram),
            OP_SB => self.op_sb(instruction, ram),
            OP_SH => self.op_sh(instruction, ram),
            OP_SW => self.op_sw(instruction, ram),
            OP_LL => self.op_ll(instruction, ram),
            OP_SC => self.op_sc(instruction, ram),
            OP_LWC1 => self.op_lwc1(instruction, ram),
            OP_LDC1 => self.op_ldc1(instruction, ram),
            OP_SWC1 => self.op_swc1(instruction, ram),
            OP_SDC1 => self.op_sdc1(instruction, ram),
            _ => Err(Exception::ReservedInstruction(instruction.0)),
        }
    }

    pub(crate) fn advance_program_counter(&mut self) {
        self.program_counter = self.next_program_counter;
        self.next_program_counter = self.next_program_counter.wrapping_add(4);
    }

    /// Transfer control after the delay slot. Returns the link address
    /// (the instruction after the delay slot).
    pub(crate) fn jump_to(&mut self, address: u32) -> u32 {
        let return_address = self.program_counter.wrapping_add(8);
        self.delay_slot = true;
        self.program_counter = self.next_program_counter;
        self.next_program_counter = address;
        return_address
    }

    /// PC-relative branch. The delay slot executes whether or not the
    /// branch is taken.
    pub(crate) fn branch(&mut self, taken: bool, offset: i16) {
        self.delay_slot = true;
        if taken {
            let target = crate::math::add_unsigned(self.next_program_counter, (offset as i32) << 2);
            self.program_counter = self.next_program_counter;
            self.next_program_counter = target;
        } else {
            self.advance_program_counter();
        }
    }
}
