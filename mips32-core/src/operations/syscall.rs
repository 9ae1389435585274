use crate::constants::*;
use crate::cpu::Cpu;
use crate::exception::{Exception, ExitCode};
use crate::host::{FileHandler, IoDevice};
use crate::instruction::Instruction;
use crate::memory::Memory;

impl Cpu {
    /// Dispatch a system call. The number is in `$v0`, arguments in
    /// `$a0..$a3` (floats in `$f12`), results in `$v0` (floats in `$f0`).
    /// An unknown number raises ReservedInstruction with no other effect.
    pub(crate) fn op_syscall(
        &mut self,
        instruction: Instruction,
        ram: &mut Memory,
        io: &mut dyn IoDevice,
        files: &mut dyn FileHandler,
    ) -> Result<(), Exception> {
        let operation = self.registers.get(REG_V0);
        debug!("syscall {}", operation);

        match operation {
            SYSCALL_PRINT_INT => io.print_integer(self.registers.get(REG_A0)),
            SYSCALL_PRINT_FLOAT => io.print_float(self.fp_registers.read_single(FP_REG_F12)),
            SYSCALL_PRINT_DOUBLE => io.print_double(self.fp_registers.read_double(FP_REG_F12)),
            SYSCALL_PRINT_STR => {
                let string = self.read_guest_string(ram, self.registers.get(REG_A0))?;
                io.print_string(&string);
            }
            SYSCALL_READ_INT => {
                let value = io.read_integer();
                self.registers.set(REG_V0, value);
            }
            SYSCALL_READ_FLOAT => {
                let value = io.read_float();
                self.fp_registers.write_single(FP_REG_F0, value);
            }
            SYSCALL_READ_DOUBLE => {
                let value = io.read_double();
                self.fp_registers.write_double(FP_REG_F0, value);
            }
            SYSCALL_READ_STR => self.read_string_into_guest(ram, io)?,
            // Reserved; the machine has no break allocator
            SYSCALL_SBRK => self.registers.set(REG_V0, 0),
            SYSCALL_EXIT => self.exit_code = ExitCode::Exit,
            SYSCALL_FILE_OPEN => {
                let name = self.read_guest_string(ram, self.registers.get(REG_A0))?;
                let flags = self.read_guest_string(ram, self.registers.get(REG_A1))?;
                let fd = files.open(&name, &flags);
                self.registers.set(REG_V0, fd);
            }
            SYSCALL_FILE_READ => {
                let fd = self.registers.get(REG_A0);
                let address = self.registers.get(REG_A1);
                let count = self.registers.get(REG_A2) as usize;

                let mut buffer = vec![0; count];
                let read = (files.read(fd, &mut buffer) as usize).min(count);
                ram.write(address, &buffer[..read])
                    .map_err(|_| Exception::MachineError)?;
                self.registers.set(REG_V0, read as u32);
            }
            SYSCALL_FILE_WRITE => {
                let fd = self.registers.get(REG_A0);
                let address = self.registers.get(REG_A1);
                let count = self.registers.get(REG_A2) as usize;

                let mut buffer = vec![0; count];
                ram.read(address, &mut buffer)
                    .map_err(|_| Exception::MachineError)?;
                let written = files.write(fd, &buffer);
                self.registers.set(REG_V0, written);
            }
            SYSCALL_FILE_CLOSE => files.close(self.registers.get(REG_A0)),
            _ => return Err(Exception::ReservedInstruction(instruction.0)),
        }

        // The reservation does not survive a system call
        self.reservation = None;
        self.advance_program_counter();
        Ok(())
    }

    /// Copy a NUL-terminated guest string into a host buffer, truncating
    /// at MAX_STRING_BYTES. The NUL is not included.
    fn read_guest_string(&mut self, ram: &mut Memory, address: u32) -> Result<Vec<u8>, Exception> {
        let mut bytes = Vec::new();

        for i in 0..MAX_STRING_BYTES as u32 {
            let byte = ram
                .read_byte(address.wrapping_add(i))
                .map_err(|_| Exception::MachineError)?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }

        Ok(bytes)
    }

    /// read_string syscall: host fills a bounded buffer, which is copied
    /// back to guest memory at `$a0` (at most `$a1` bytes), NUL-terminated
    /// when there is room.
    fn read_string_into_guest(
        &mut self,
        ram: &mut Memory,
        io: &mut dyn IoDevice,
    ) -> Result<(), Exception> {
        let address = self.registers.get(REG_A0);
        let max = (self.registers.get(REG_A1) as usize).min(MAX_STRING_BYTES);

        let mut buffer = vec![0; max];
        let count = io.read_string(&mut buffer).min(max);
        ram.write(address, &buffer[..count])
            .map_err(|_| Exception::MachineError)?;
        if count < max {
            ram.write_byte(address.wrapping_add(count as u32), 0)
                .map_err(|_| Exception::MachineError)?;
        }
        Ok(())
    }
}
