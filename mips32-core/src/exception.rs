use std::fmt;

/// Architectural exceptions. These are machine state, not host errors:
/// raising one stops the fetch loop with `ExitCode::Exception` and never
/// unwinds host control flow.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Exception {
    /// Instruction fetch from a misaligned PC. Carries the faulting address.
    AddressErrorFetch(u32),
    /// Misaligned data load or store. Carries the faulting address.
    AddressErrorData(u32),
    /// Signed overflow in ADD, ADDI or SUB.
    ArithmeticOverflow,
    /// Undecoded opcode/function combination or unknown syscall number.
    /// Carries the instruction encoding.
    ReservedInstruction(u32),
    /// BREAK instruction.
    Breakpoint,
    /// The memory subsystem failed on the host side (swap I/O).
    MachineError,
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exception::AddressErrorFetch(address) => {
                write!(f, "AddressError(fetch, 0x{:08x})", address)
            }
            Exception::AddressErrorData(address) => {
                write!(f, "AddressError(data, 0x{:08x})", address)
            }
            Exception::ArithmeticOverflow => write!(f, "ArithmeticOverflow"),
            Exception::ReservedInstruction(encoding) => {
                write!(f, "ReservedInstruction(0x{:08x})", encoding)
            }
            Exception::Breakpoint => write!(f, "Breakpoint"),
            Exception::MachineError => write!(f, "MachineError"),
        }
    }
}

/// What the CPU records when an exception is taken. For an exception in a
/// branch delay slot, `pc` is the branch's address and `in_delay_slot` is
/// set (the BD bit).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExceptionRecord {
    pub kind: Exception,
    pub pc: u32,
    pub in_delay_slot: bool,
}

/// Why the most recent run stopped. `None` means a fetch loop is running
/// (or the machine was reset and has not run yet).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExitCode {
    None,
    ManualStop,
    /// Reserved for external interrupt delivery; never produced by the core.
    Interrupt,
    Exception,
    Exit,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitCode::None => "NONE",
            ExitCode::ManualStop => "MANUAL_STOP",
            ExitCode::Interrupt => "INTERRUPT",
            ExitCode::Exception => "EXCEPTION",
            ExitCode::Exit => "EXIT",
        };
        f.write_str(name)
    }
}
