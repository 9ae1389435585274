//! Console and stdio implementations of the machine's host interfaces.

use mips32_core::host::{FileHandler, IoDevice};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{Read, Write};

/// Console device: prints go to stdout, reads consume whitespace-split
/// tokens from stdin.
#[derive(Default)]
pub struct ConsoleIoDevice {
    tokens: VecDeque<String>,
}

impl ConsoleIoDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&mut self) -> Option<String> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }
            self.tokens
                .extend(line.split_whitespace().map(str::to_string));
        }
        self.tokens.pop_front()
    }

    fn flush() {
        let _ = io::stdout().flush();
    }
}

impl IoDevice for ConsoleIoDevice {
    fn print_integer(&mut self, value: u32) {
        print!("{}", value);
        Self::flush();
    }

    fn print_float(&mut self, value: f32) {
        print!("{:.3}", value);
        Self::flush();
    }

    fn print_double(&mut self, value: f64) {
        print!("{:.3}", value);
        Self::flush();
    }

    fn print_string(&mut self, string: &[u8]) {
        print!("{}", String::from_utf8_lossy(string));
        Self::flush();
    }

    fn read_integer(&mut self) -> u32 {
        self.next_token()
            .and_then(|token| token.parse::<i64>().ok())
            .unwrap_or(0) as u32
    }

    fn read_float(&mut self) -> f32 {
        self.next_token()
            .and_then(|token| token.parse().ok())
            .unwrap_or(0.0)
    }

    fn read_double(&mut self) -> f64 {
        self.next_token()
            .and_then(|token| token.parse().ok())
            .unwrap_or(0.0)
    }

    fn read_string(&mut self, buffer: &mut [u8]) -> usize {
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return 0;
        }
        let bytes = line.trim_end_matches('\n').as_bytes();
        let count = bytes.len().min(buffer.len());
        buffer[..count].copy_from_slice(&bytes[..count]);
        count
    }
}

/// File handler backed by the host filesystem. File descriptors index a
/// table of open files; closed slots are never reused.
#[derive(Default)]
pub struct StdioFileHandler {
    files: Vec<Option<File>>,
}

impl StdioFileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn file(&mut self, fd: u32) -> Option<&mut File> {
        self.files.get_mut(fd as usize)?.as_mut()
    }
}

impl FileHandler for StdioFileHandler {
    fn open(&mut self, name: &[u8], flags: &[u8]) -> u32 {
        let name = match std::str::from_utf8(name) {
            Ok(name) => name,
            Err(_) => return u32::MAX,
        };

        let mut options = OpenOptions::new();
        match flags {
            b"r" => options.read(true),
            b"r+" => options.read(true).write(true),
            b"w" => options.write(true).create(true).truncate(true),
            b"w+" => options.read(true).write(true).create(true).truncate(true),
            b"a" => options.append(true).create(true),
            b"a+" => options.read(true).append(true).create(true),
            _ => return u32::MAX,
        };

        match options.open(name) {
            Ok(file) => {
                self.files.push(Some(file));
                (self.files.len() - 1) as u32
            }
            Err(error) => {
                warn!("open {:?} failed: {}", name, error);
                u32::MAX
            }
        }
    }

    fn read(&mut self, fd: u32, buffer: &mut [u8]) -> u32 {
        match self.file(fd) {
            Some(file) => file.read(buffer).unwrap_or(0) as u32,
            None => 0,
        }
    }

    fn write(&mut self, fd: u32, buffer: &[u8]) -> u32 {
        match self.file(fd) {
            Some(file) => file.write(buffer).unwrap_or(0) as u32,
            None => 0,
        }
    }

    fn close(&mut self, fd: u32) {
        if let Some(slot) = self.files.get_mut(fd as usize) {
            *slot = None;
        }
    }
}
