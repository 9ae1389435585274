use crate::demo;
use crate::plotter::MachineDataPlotter;
use mips32_core::{ExitCode, Instruction, Machine};
use std::fs;
use std::io;
use std::io::{BufRead, Write};
use std::num::ParseIntError;

pub struct Debugger<'h> {
    pub machine: Machine<'h>,
    plotter: MachineDataPlotter,
    breakpoints: Vec<u32>,
    trace: bool,
    running: bool,
}

impl<'h> Debugger<'h> {
    pub fn new(mut machine: Machine<'h>) -> Self {
        let plotter = MachineDataPlotter::new(&machine.inspector());
        Self {
            machine,
            plotter,
            breakpoints: Vec::new(),
            trace: false,
            running: true,
        }
    }

    /// Run the debugger command loop until `exit` or end of input
    pub fn run(&mut self) -> Result<(), io::Error> {
        let stdin = io::stdin();
        while self.running {
            eprint!("mips32-debugger> ");
            io::stderr().flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }
            self.run_command(&input);
        }

        info!("debugger exiting with machine state {}", self.machine.exit_code());
        Ok(())
    }

    /// Run a command
    pub fn run_command(&mut self, command: &str) {
        let command: Vec<&str> = command.trim().split(' ').collect();

        match command.as_slice() {
            ["run"] | ["r"] => self.continue_run(),
            ["step"] | ["s"] => self.step(1),
            ["step", count] | ["s", count] => match count.parse() {
                Ok(count) => self.step(count),
                Err(_) => eprintln!("Bad step count"),
            },
            ["regs"] => {
                let inspector = self.machine.inspector();
                self.plotter.plot(&inspector);
            }
            ["fregs"] => self.print_fp_registers(),
            ["read", address, length] => self.read_memory(address, length),
            ["write", address, bytes @ ..] => self.write_memory(address, bytes),
            ["break", address] => self.add_breakpoint(address),
            ["delete", address] => self.delete_breakpoint(address),
            ["breaks"] => {
                for breakpoint in &self.breakpoints {
                    eprintln!("0x{:08x}", breakpoint);
                }
            }
            ["entry", address] => match parse_address(address) {
                Ok(address) => self.machine.inspector().set_pc(address),
                Err(_) => eprintln!("Bad address"),
            },
            ["load", path, address] => self.load_image(path, address),
            ["demo"] => match demo::load(&mut self.machine) {
                Ok(entry) => eprintln!("Demo loaded, entry 0x{:08x}", entry),
                Err(error) => eprintln!("Demo load failed: {}", error),
            },
            ["reset"] => {
                self.machine.reset();
                eprintln!("Machine reset");
            }
            ["trace", enabled] => self.set_trace(*enabled),
            ["exit"] | ["quit"] => self.running = false,
            [""] => {} // Ignore empty input
            _ => eprintln!("Unknown input"),
        }
    }

    /// Run until exit, an exception, or a breakpoint
    fn continue_run(&mut self) {
        if self.breakpoints.is_empty() {
            self.machine.start();
        } else {
            loop {
                self.trace_next();
                self.machine.single_step();
                if self.machine.exit_code() != ExitCode::None {
                    break;
                }
                let pc = self.machine.inspector().pc();
                if self.breakpoints.contains(&pc) {
                    eprintln!("Breakpoint at 0x{:08x}", pc);
                    return;
                }
            }
        }
        self.report_stop();
    }

    /// Execute the next `count` instructions
    fn step(&mut self, count: u32) {
        for _ in 0..count {
            self.trace_next();
            self.machine.single_step();
            if self.machine.exit_code() != ExitCode::None {
                self.report_stop();
                break;
            }
        }
    }

    fn trace_next(&mut self) {
        if !self.trace {
            return;
        }
        let mut inspector = self.machine.inspector();
        let pc = inspector.pc();
        let mut word = [0; 4];
        if inspector.read_ram(pc, &mut word).is_ok() {
            let instruction = Instruction(u32::from_le_bytes(word));
            eprintln!("0x{:08x}: {}", pc, instruction.stringify(pc));
        }
    }

    fn report_stop(&mut self) {
        eprintln!("Machine stopped: {}", self.machine.exit_code());
        if let Some(record) = self.machine.exception() {
            eprintln!(
                "  {} at 0x{:08x}{}",
                record.kind,
                record.pc,
                if record.in_delay_slot { " (delay slot)" } else { "" }
            );
        }
    }

    fn print_fp_registers(&mut self) {
        let inspector = self.machine.inspector();
        let fprs = inspector.fprs();
        for i in 0..16 {
            eprintln!(
                "$f{:<2} {:#010x} {:>14.6} | $f{:<2} {:#010x} {:>14.6}",
                i,
                fprs[i],
                f32::from_bits(fprs[i]),
                i + 16,
                fprs[i + 16],
                f32::from_bits(fprs[i + 16]),
            );
        }
    }

    fn read_memory(&mut self, address: &str, length: &str) {
        let (address, length) = match (parse_address(address), length.parse::<usize>()) {
            (Ok(address), Ok(length)) => (address, length),
            _ => {
                eprintln!("Bad address or length");
                return;
            }
        };

        let mut buffer = vec![0; length];
        if let Err(error) = self.machine.inspector().read_ram(address, &mut buffer) {
            eprintln!("Read failed: {}", error);
            return;
        }
        for (i, chunk) in buffer.chunks(16).enumerate() {
            eprint!("0x{:08x}:", address as usize + i * 16);
            for byte in chunk {
                eprint!(" {:02x}", byte);
            }
            eprintln!();
        }
    }

    fn write_memory(&mut self, address: &str, bytes: &[&str]) {
        let address = match parse_address(address) {
            Ok(address) => address,
            Err(_) => {
                eprintln!("Bad address");
                return;
            }
        };
        let data: Result<Vec<u8>, _> = bytes
            .iter()
            .map(|byte| u8::from_str_radix(byte.trim_start_matches("0x"), 16))
            .collect();
        match data {
            Ok(data) => {
                if let Err(error) = self.machine.inspector().write_ram(address, &data) {
                    eprintln!("Write failed: {}", error);
                }
            }
            Err(_) => eprintln!("Bad byte value"),
        }
    }

    fn add_breakpoint(&mut self, address: &str) {
        match parse_address(address) {
            Ok(address) => {
                if !self.breakpoints.contains(&address) {
                    self.breakpoints.push(address);
                }
            }
            Err(_) => eprintln!("Bad address"),
        }
    }

    fn delete_breakpoint(&mut self, address: &str) {
        match parse_address(address) {
            Ok(address) => self.breakpoints.retain(|&breakpoint| breakpoint != address),
            Err(_) => eprintln!("Bad address"),
        }
    }

    fn load_image(&mut self, path: &str, address: &str) {
        let address = match parse_address(address) {
            Ok(address) => address,
            Err(_) => {
                eprintln!("Bad address");
                return;
            }
        };
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(error) => {
                eprintln!("Cannot read {}: {}", path, error);
                return;
            }
        };
        let mut inspector = self.machine.inspector();
        match inspector.write_ram(address, &data) {
            Ok(()) => {
                inspector.set_pc(address);
                eprintln!("Loaded {} bytes at 0x{:08x}", data.len(), address);
            }
            Err(error) => eprintln!("Load failed: {}", error),
        }
    }

    /// Set the trace option
    fn set_trace(&mut self, option: &str) {
        match option {
            "on" => {
                self.trace = true;
                eprintln!("Instruction tracing is ON");
            }
            "off" => {
                self.trace = false;
                eprintln!("Instruction tracing is OFF");
            }
            _ => eprintln!("Unknown input"),
        }
    }
}

/// Parse a decimal or `0x`-prefixed hex address
pub fn parse_address(input: &str) -> Result<u32, ParseIntError> {
    if let Some(hex) = input.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        input.parse()
    }
}
