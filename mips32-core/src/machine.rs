use crate::config::Config;
use crate::cpu::Cpu;
use crate::exception::{ExceptionRecord, ExitCode};
use crate::host::{FileHandler, IoDevice};
use crate::inspector::MachineInspector;
use crate::memory::Memory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The whole machine: CPU and RAM, plus the host's console and file
/// capabilities borrowed for the machine's lifetime.
pub struct Machine<'h> {
    cpu: Cpu,
    ram: Memory,
    io: &'h mut dyn IoDevice,
    files: &'h mut dyn FileHandler,
    stop_requested: Arc<AtomicBool>,
    boot_address: u32,
}

/// Cloneable handle that asks a running fetch loop to halt at the next
/// instruction boundary. This is the only entry point that may be used
/// from a thread other than the one driving the machine; everything else
/// must wait for the loop to be idle.
#[derive(Clone)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
}

impl StopToken {
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl<'h> Machine<'h> {
    pub fn new(config: Config, io: &'h mut dyn IoDevice, files: &'h mut dyn FileHandler) -> Self {
        Machine {
            cpu: Cpu::new(config.boot_address),
            ram: Memory::new(config.ram_budget_bytes),
            io,
            files,
            stop_requested: Arc::new(AtomicBool::new(false)),
            boot_address: config.boot_address,
        }
    }

    /// Zero all architectural state and drop every memory page. The RAM
    /// budget is kept. Idempotent.
    pub fn reset(&mut self) {
        info!("machine reset, boot address 0x{:08x}", self.boot_address);
        self.cpu.reset(self.boot_address);
        self.ram.reset();
        self.stop_requested.store(false, Ordering::Relaxed);
    }

    /// Drive the fetch loop on the calling thread until an exit code is
    /// set: the exit syscall, an exception, or a stop request.
    pub fn start(&mut self) -> ExitCode {
        self.stop_requested.store(false, Ordering::Relaxed);
        self.cpu.exit_code = ExitCode::None;
        self.cpu.exception = None;
        info!("machine started at 0x{:08x}", self.cpu.program_counter);

        while self.cpu.exit_code == ExitCode::None {
            if self.stop_requested.swap(false, Ordering::Relaxed) {
                self.cpu.exit_code = ExitCode::ManualStop;
                break;
            }
            self.cpu.step(&mut self.ram, &mut *self.io, &mut *self.files);
        }

        info!("machine stopped: {}", self.cpu.exit_code);
        self.cpu.exit_code
    }

    /// Execute exactly one instruction. May set an exit code.
    pub fn single_step(&mut self) {
        self.cpu.step(&mut self.ram, &mut *self.io, &mut *self.files);
    }

    /// Request a halt at the next instruction boundary. For use from
    /// another thread, clone a token with `stop_token` first.
    pub fn stop(&mut self) {
        self.stop_requested.store(true, Ordering::Relaxed);
    }

    pub fn stop_token(&self) -> StopToken {
        StopToken {
            flag: Arc::clone(&self.stop_requested),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        self.cpu.exit_code
    }

    /// The record of the exception that ended the last run, if any
    pub fn exception(&self) -> Option<ExceptionRecord> {
        self.cpu.exception
    }

    /// A borrowed debugger view over the CPU and RAM. Only available
    /// while the fetch loop is idle; the borrow checker enforces it.
    pub fn inspector(&mut self) -> MachineInspector<'_> {
        MachineInspector::new(&mut self.cpu, &mut self.ram)
    }
}
