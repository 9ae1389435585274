use crate::constants::*;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A MIPS instruction
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Get the operation code
    pub fn op_code(&self) -> u8 {
        ((self.0 & 0xFC00_0000) >> 26) as u8
    }

    /// Get the s register (for R and I type instructions)
    pub fn s_register(&self) -> u8 {
        ((self.0 & 0x03E0_0000) >> 21) as u8
    }

    /// Get the t register (for R and I type instructions)
    pub fn t_register(&self) -> u8 {
        ((self.0 & 0x001F_0000) >> 16) as u8
    }

    /// Get the d register (for R type instructions)
    pub fn d_register(&self) -> u8 {
        ((self.0 & 0x0000_F800) >> 11) as u8
    }

    /// Get the shift amount (for R type instructions)
    pub fn shift_amount(&self) -> u8 {
        ((self.0 & 0x0000_07C0) >> 6) as u8
    }

    /// Get the ALU function (for R type instructions)
    pub fn function(&self) -> u8 {
        (self.0 & 0x0000_003F) as u8
    }

    /// Get the immediate value (for I type instructions)
    pub fn immediate(&self) -> i16 {
        (self.0 & 0x0000_FFFF) as i16
    }

    /// Get the pseudo address (for J type instructions)
    pub fn pseudo_address(&self) -> u32 {
        self.0 & 0x03FF_FFFF
    }

    /// Get the COP1 format field (same bits as the s register)
    pub fn fp_format(&self) -> u8 {
        self.s_register()
    }

    /// Get the ft register (same bits as the t register)
    pub fn ft_register(&self) -> u8 {
        self.t_register()
    }

    /// Get the fs register (same bits as the d register)
    pub fn fs_register(&self) -> u8 {
        self.d_register()
    }

    /// Get the fd register (same bits as the shift amount)
    pub fn fd_register(&self) -> u8 {
        self.shift_amount()
    }

    /// Convert the pseudo address to a full address.
    /// The first four bits are taken from the delay-slot program counter,
    /// and the lower two bits are zeros.
    pub fn real_address(&self, program_counter: u32) -> u32 {
        (0xF000_0000 & program_counter.wrapping_add(4)) | (self.pseudo_address() << 2)
    }

    /// Decode and format the instruction. Unknown encodings format as raw
    /// words instead of failing, so tracing never aborts a run.
    pub fn stringify(&self, program_counter: u32) -> String {
        match self.op_code() {
            OP_SPECIAL => self.stringify_special(),
            OP_REGIMM => {
                let name = match self.t_register() {
                    REGIMM_BLTZ => "bltz",
                    REGIMM_BGEZ => "bgez",
                    REGIMM_BLTZAL => "bltzal",
                    REGIMM_BGEZAL => "bgezal",
                    _ => return self.stringify_unknown(),
                };
                format!("{} {}, {}", name, Register(self.s_register()), self.immediate())
            }
            OP_J => format!("j 0x{:x}", self.real_address(program_counter)),
            OP_JAL => format!("jal 0x{:x}", self.real_address(program_counter)),
            OP_JALX => format!("jalx 0x{:x}", self.real_address(program_counter)),
            OP_BEQ => self.stringify_branch2("beq"),
            OP_BNE => self.stringify_branch2("bne"),
            OP_BLEZ => format!("blez {}, {}", Register(self.s_register()), self.immediate()),
            OP_BGTZ => format!("bgtz {}, {}", Register(self.s_register()), self.immediate()),
            OP_ADDI => self.stringify_imm("addi"),
            OP_ADDIU => self.stringify_imm("addiu"),
            OP_SLTI => self.stringify_imm("slti"),
            OP_SLTIU => self.stringify_imm("sltiu"),
            OP_ANDI => self.stringify_imm_hex("andi"),
            OP_ORI => self.stringify_imm_hex("ori"),
            OP_XORI => self.stringify_imm_hex("xori"),
            OP_AUI => {
                if self.s_register() == 0 {
                    format!(
                        "lui {}, 0x{:x}",
                        Register(self.t_register()),
                        self.immediate() as u16
                    )
                } else {
                    self.stringify_imm_hex("aui")
                }
            }
            OP_COP1 => self.stringify_cop1(),
            OP_LB => self.stringify_mem("lb"),
            OP_LBU => self.stringify_mem("lbu"),
            OP_LH => self.stringify_mem("lh"),
            OP_LHU => self.stringify_mem("lhu"),
            OP_LW => self.stringify_mem("lw"),
            OP_SB => self.stringify_mem("sb"),
            OP_SH => self.stringify_mem("sh"),
            OP_SW => self.stringify_mem("sw"),
            OP_LL => self.stringify_mem("ll"),
            OP_SC => self.stringify_mem("sc"),
            OP_LWC1 => self.stringify_fp_mem("lwc1"),
            OP_LDC1 => self.stringify_fp_mem("ldc1"),
            OP_SWC1 => self.stringify_fp_mem("swc1"),
            OP_SDC1 => self.stringify_fp_mem("sdc1"),
            _ => self.stringify_unknown(),
        }
    }

    fn stringify_special(&self) -> String {
        match self.function() {
            FUNCTION_SLL => {
                if self.0 == 0 {
                    "nop".to_string()
                } else {
                    self.stringify_shift("sll")
                }
            }
            FUNCTION_SRL => self.stringify_shift("srl"),
            FUNCTION_SRA => self.stringify_shift("sra"),
            FUNCTION_SLLV => self.stringify_rtype("sllv"),
            FUNCTION_SRLV => self.stringify_rtype("srlv"),
            FUNCTION_SRAV => self.stringify_rtype("srav"),
            FUNCTION_JR => format!("jr {}", Register(self.s_register())),
            FUNCTION_JALR => format!(
                "jalr {}, {}",
                Register(self.d_register()),
                Register(self.s_register())
            ),
            FUNCTION_SYSCALL => "syscall".to_string(),
            FUNCTION_BREAK => "break".to_string(),
            FUNCTION_MFHI => format!("mfhi {}", Register(self.d_register())),
            FUNCTION_MTHI => format!("mthi {}", Register(self.s_register())),
            FUNCTION_MFLO => format!("mflo {}", Register(self.d_register())),
            FUNCTION_MTLO => format!("mtlo {}", Register(self.s_register())),
            FUNCTION_SOP30 => self.stringify_sop("mul", "muh"),
            FUNCTION_SOP31 => self.stringify_sop("mulu", "muhu"),
            FUNCTION_SOP32 => self.stringify_sop("div", "mod"),
            FUNCTION_SOP33 => self.stringify_sop("divu", "modu"),
            FUNCTION_ADD => self.stringify_rtype("add"),
            FUNCTION_ADDU => self.stringify_rtype("addu"),
            FUNCTION_SUB => self.stringify_rtype("sub"),
            FUNCTION_SUBU => self.stringify_rtype("subu"),
            FUNCTION_AND => self.stringify_rtype("and"),
            FUNCTION_OR => self.stringify_rtype("or"),
            FUNCTION_XOR => self.stringify_rtype("xor"),
            FUNCTION_NOR => self.stringify_rtype("nor"),
            FUNCTION_SLT => self.stringify_rtype("slt"),
            FUNCTION_SLTU => self.stringify_rtype("sltu"),
            _ => self.stringify_unknown(),
        }
    }

    fn stringify_cop1(&self) -> String {
        match self.fp_format() {
            COP1_MFC1 => format!(
                "mfc1 {}, $f{}",
                Register(self.t_register()),
                self.fs_register()
            ),
            COP1_MTC1 => format!(
                "mtc1 {}, $f{}",
                Register(self.t_register()),
                self.fs_register()
            ),
            COP1_CFC1 => format!(
                "cfc1 {}, ${}",
                Register(self.t_register()),
                self.fs_register()
            ),
            COP1_CTC1 => format!(
                "ctc1 {}, ${}",
                Register(self.t_register()),
                self.fs_register()
            ),
            COP1_BC1 => {
                let name = if self.t_register() & 1 == 1 { "bc1t" } else { "bc1f" };
                format!("{} {}", name, self.immediate())
            }
            FMT_SINGLE | FMT_DOUBLE | FMT_WORD => {
                let fmt = match self.fp_format() {
                    FMT_SINGLE => "s",
                    FMT_DOUBLE => "d",
                    _ => "w",
                };
                match self.function() {
                    FP_FUNCTION_ADD => self.stringify_fp3("add", fmt),
                    FP_FUNCTION_SUB => self.stringify_fp3("sub", fmt),
                    FP_FUNCTION_MUL => self.stringify_fp3("mul", fmt),
                    FP_FUNCTION_DIV => self.stringify_fp3("div", fmt),
                    FP_FUNCTION_ABS => self.stringify_fp2("abs", fmt),
                    FP_FUNCTION_MOV => self.stringify_fp2("mov", fmt),
                    FP_FUNCTION_NEG => self.stringify_fp2("neg", fmt),
                    FP_FUNCTION_CVT_S => self.stringify_fp2("cvt.s", fmt),
                    FP_FUNCTION_CVT_D => self.stringify_fp2("cvt.d", fmt),
                    FP_FUNCTION_CVT_W => self.stringify_fp2("cvt.w", fmt),
                    function if function >= FP_FUNCTION_C_COND => format!(
                        "c.{}.{} $f{}, $f{}",
                        function & 0xF,
                        fmt,
                        self.fs_register(),
                        self.ft_register()
                    ),
                    _ => self.stringify_unknown(),
                }
            }
            _ => self.stringify_unknown(),
        }
    }

    fn stringify_rtype(&self, name: &str) -> String {
        format!(
            "{} {}, {}, {}",
            name,
            Register(self.d_register()),
            Register(self.s_register()),
            Register(self.t_register())
        )
    }

    fn stringify_shift(&self, name: &str) -> String {
        format!(
            "{} {}, {}, {}",
            name,
            Register(self.d_register()),
            Register(self.t_register()),
            self.shift_amount()
        )
    }

    fn stringify_sop(&self, low: &str, high: &str) -> String {
        let name = if self.shift_amount() == SOP_HIGH { high } else { low };
        self.stringify_rtype(name)
    }

    fn stringify_branch2(&self, name: &str) -> String {
        format!(
            "{} {}, {}, {}",
            name,
            Register(self.s_register()),
            Register(self.t_register()),
            self.immediate()
        )
    }

    fn stringify_imm(&self, name: &str) -> String {
        format!(
            "{} {}, {}, {}",
            name,
            Register(self.t_register()),
            Register(self.s_register()),
            self.immediate()
        )
    }

    fn stringify_imm_hex(&self, name: &str) -> String {
        format!(
            "{} {}, {}, 0x{:x}",
            name,
            Register(self.t_register()),
            Register(self.s_register()),
            self.immediate() as u16
        )
    }

    fn stringify_mem(&self, name: &str) -> String {
        format!(
            "{} {}, {}({})",
            name,
            Register(self.t_register()),
            self.immediate(),
            Register(self.s_register())
        )
    }

    fn stringify_fp_mem(&self, name: &str) -> String {
        format!(
            "{} $f{}, {}({})",
            name,
            self.ft_register(),
            self.immediate(),
            Register(self.s_register())
        )
    }

    fn stringify_fp3(&self, name: &str, fmt: &str) -> String {
        format!(
            "{}.{} $f{}, $f{}, $f{}",
            name,
            fmt,
            self.fd_register(),
            self.fs_register(),
            self.ft_register()
        )
    }

    fn stringify_fp2(&self, name: &str, fmt: &str) -> String {
        format!(
            "{}.{} $f{}, $f{}",
            name,
            fmt,
            self.fd_register(),
            self.fs_register()
        )
    }

    fn stringify_unknown(&self) -> String {
        format!(".word 0x{:08x}", self.0)
    }
}

/// Pretty-print the register using its name
struct Register(u8);

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(REGISTER_NAMES[(self.0 & 0x1F) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_accessors() {
        // add $t0, $t1, $t2
        let instruction = Instruction(0x012A_4020);
        assert_eq!(instruction.op_code(), OP_SPECIAL);
        assert_eq!(instruction.s_register(), 9);
        assert_eq!(instruction.t_register(), 10);
        assert_eq!(instruction.d_register(), 8);
        assert_eq!(instruction.shift_amount(), 0);
        assert_eq!(instruction.function(), FUNCTION_ADD);
    }

    #[test]
    fn negative_immediate_sign_extends() {
        // addiu $v0, $zero, -1
        let instruction = Instruction(0x2402_FFFF);
        assert_eq!(instruction.immediate(), -1);
    }

    #[test]
    fn jump_target_uses_delay_slot_pc() {
        let instruction = Instruction(0x0800_0001);
        assert_eq!(instruction.real_address(0x8ABC_DEF0), 0x8000_0004);
    }

    #[test]
    fn stringify_is_total() {
        // A reserved encoding must still format
        assert_eq!(Instruction(0xFFFF_FFFF).stringify(0), ".word 0xffffffff");
        assert_eq!(Instruction(0).stringify(0), "nop");
    }
}
