//! Machine lifecycle and syscall-layer behavior against scripted hosts.

mod common;

use common::*;
use mips32_core::constants::*;
use mips32_core::{Exception, ExitCode, Machine};
use std::thread;
use std::time::Duration;

fn machine<'h>(
    io: &'h mut ScriptedIo,
    files: &'h mut RecordingFiles,
) -> Machine<'h> {
    init_logging();
    let mut machine = Machine::new(test_config(), io, files);
    machine.reset();
    machine
}

const REG_S0: u8 = 16;
const REG_S1: u8 = 17;

#[test]
fn arithmetic_io_program() {
    let mut io = ScriptedIo::default();
    io.int_input.extend([7, 3]);
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = Vec::new();
    // X and Y from the console
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_INT));
    program.push(addu(REG_S0, REG_V0, 0));
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_INT));
    program.push(addu(REG_S1, REG_V0, 0));
    // X+Y, X-Y, X*Y, X/Y
    program.push(addu(REG_A0, REG_S0, REG_S1));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_INT));
    program.push(subu(REG_A0, REG_S0, REG_S1));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_INT));
    program.push(mul(REG_A0, REG_S0, REG_S1));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_INT));
    program.push(div(REG_A0, REG_S0, REG_S1));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_INT));
    program.extend_from_slice(&exit_sequence());

    run_program(&mut machine, &program);

    assert_eq!(machine.exit_code(), ExitCode::Exit);
    assert_eq!(io.printed_ints, vec![10, 4, 21, 2]);
}

#[test]
fn print_string_copies_from_guest_memory() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    machine
        .inspector()
        .write_ram(BOOT_ADDRESS + 0x1000, b"Hello\0")
        .unwrap();

    let mut program = vec![
        lui(REG_A0, (BOOT_ADDRESS >> 16) as u16),
        ori(REG_A0, REG_A0, 0x1000),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_STR));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(io.printed_strings, vec![b"Hello".to_vec()]);
}

#[test]
fn print_string_truncates_at_the_bound() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    // No terminator within the bound
    let unterminated = vec![b'A'; MAX_STRING_BYTES + 1000];
    machine
        .inspector()
        .write_ram(BOOT_ADDRESS + 0x1000, &unterminated)
        .unwrap();

    let mut program = vec![
        lui(REG_A0, (BOOT_ADDRESS >> 16) as u16),
        ori(REG_A0, REG_A0, 0x1000),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_STR));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(io.printed_strings.len(), 1);
    assert_eq!(io.printed_strings[0].len(), MAX_STRING_BYTES);
}

#[test]
fn read_string_writes_back_with_terminator() {
    let mut io = ScriptedIo::default();
    io.string_input.push_back(b"hi mom".to_vec());
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = vec![
        addiu(REG_A0, 0, 0x200),
        addiu(REG_A1, 0, 16),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_STR));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    let mut buffer = [0xFF_u8; 7];
    machine.inspector().read_ram(0x200, &mut buffer).unwrap();
    assert_eq!(&buffer, b"hi mom\0");
}

#[test]
fn read_string_respects_the_guest_limit() {
    let mut io = ScriptedIo::default();
    io.string_input.push_back(b"abcdefgh".to_vec());
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = vec![
        addiu(REG_A0, 0, 0x200),
        addiu(REG_A1, 0, 4),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_STR));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    let mut buffer = [0_u8; 8];
    machine.inspector().read_ram(0x200, &mut buffer).unwrap();
    assert_eq!(&buffer[..4], b"abcd");
    assert_eq!(&buffer[4..], &[0, 0, 0, 0]);
}

#[test]
fn float_syscalls_use_the_fp_registers() {
    let mut io = ScriptedIo::default();
    io.float_input.push_back(1.5);
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = Vec::new();
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_FLOAT));
    // The result lands in $f0; print_float takes $f12
    program.push(cop1(FMT_SINGLE, 0, 0, 12, FP_FUNCTION_MOV));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_FLOAT));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(io.printed_floats, vec![1.5]);
}

#[test]
fn double_syscalls_use_the_register_pairs() {
    let mut io = ScriptedIo::default();
    io.double_input.push_back(2.5);
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = Vec::new();
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_DOUBLE));
    program.push(cop1(FMT_DOUBLE, 0, 0, 12, FP_FUNCTION_MOV));
    program.extend_from_slice(&syscall_pair(SYSCALL_PRINT_DOUBLE));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(io.printed_doubles, vec![2.5]);
}

#[test]
fn file_open_write_close() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let base = BOOT_ADDRESS;
    {
        let mut inspector = machine.inspector();
        inspector.write_ram(base + 0x200, b"out.txt\0").unwrap();
        inspector.write_ram(base + 0x210, b"w\0").unwrap();
        inspector.write_ram(base + 0x220, b"hi").unwrap();
    }

    let mut program = vec![
        lui(REG_A0, (base >> 16) as u16),
        ori(REG_A0, REG_A0, 0x200),
        lui(REG_A1, (base >> 16) as u16),
        ori(REG_A1, REG_A1, 0x210),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_FILE_OPEN));
    program.push(addu(REG_S0, REG_V0, 0));
    // write(fd, base + 0x220, 2)
    program.push(addu(REG_A0, REG_S0, 0));
    program.push(lui(REG_A1, (base >> 16) as u16));
    program.push(ori(REG_A1, REG_A1, 0x220));
    program.push(addiu(REG_A2, 0, 2));
    program.extend_from_slice(&syscall_pair(SYSCALL_FILE_WRITE));
    program.push(addu(REG_S1, REG_V0, 0));
    // close(fd)
    program.push(addu(REG_A0, REG_S0, 0));
    program.extend_from_slice(&syscall_pair(SYSCALL_FILE_CLOSE));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(machine.exit_code(), ExitCode::Exit);
    assert_eq!(machine.inspector().gprs()[REG_S1 as usize], 2);
    assert_eq!(files.opens, vec![(b"out.txt".to_vec(), b"w".to_vec())]);
    assert_eq!(files.writes, vec![(0, b"hi".to_vec())]);
    assert_eq!(files.closes, vec![0]);
}

#[test]
fn file_read_copies_into_guest_memory() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    files.read_data.push_back(b"AB".to_vec());
    let mut machine = machine(&mut io, &mut files);

    let mut program = vec![
        addiu(REG_A0, 0, 0), // fd
        addiu(REG_A1, 0, 0x300),
        addiu(REG_A2, 0, 8),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_FILE_READ));
    program.push(addu(REG_S0, REG_V0, 0));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(machine.inspector().gprs()[REG_S0 as usize], 2);
    let mut buffer = [0_u8; 2];
    machine.inspector().read_ram(0x300, &mut buffer).unwrap();
    assert_eq!(&buffer, b"AB");
}

#[test]
fn failed_open_returns_the_sentinel() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    files.fail_open = true;
    let mut machine = machine(&mut io, &mut files);

    machine
        .inspector()
        .write_ram(BOOT_ADDRESS + 0x200, b"nope\0r\0")
        .unwrap();

    let mut program = vec![
        lui(REG_A0, (BOOT_ADDRESS >> 16) as u16),
        ori(REG_A0, REG_A0, 0x200),
        lui(REG_A1, (BOOT_ADDRESS >> 16) as u16),
        ori(REG_A1, REG_A1, 0x205),
    ];
    program.extend_from_slice(&syscall_pair(SYSCALL_FILE_OPEN));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(machine.inspector().gprs()[REG_V0 as usize], u32::MAX);
}

#[test]
fn sbrk_is_reserved_and_returns_zero() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = vec![addiu(REG_A0, 0, 100)];
    program.extend_from_slice(&syscall_pair(SYSCALL_SBRK));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);

    assert_eq!(machine.exit_code(), ExitCode::Exit);
    assert_eq!(machine.inspector().gprs()[REG_V0 as usize], 0);
}

#[test]
fn unknown_syscall_number_traps() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    run_program(&mut machine, &syscall_pair(99));

    assert_eq!(machine.exit_code(), ExitCode::Exception);
    assert!(matches!(
        machine.exception().unwrap().kind,
        Exception::ReservedInstruction(_)
    ));
}

#[test]
fn stop_token_halts_a_running_loop() {
    let mut io = ScriptedIo::default();
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    // Spin forever
    load_words(&mut machine, BOOT_ADDRESS, &[jump(BOOT_ADDRESS), nop()]);

    let token = machine.stop_token();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        token.request_stop();
    });

    let exit_code = machine.start();
    stopper.join().unwrap();

    assert_eq!(exit_code, ExitCode::ManualStop);
    assert_eq!(machine.exit_code(), ExitCode::ManualStop);
}

#[test]
fn reset_is_idempotent() {
    let mut io = ScriptedIo::default();
    io.int_input.push_back(5);
    let mut files = RecordingFiles::default();
    let mut machine = machine(&mut io, &mut files);

    let mut program = Vec::new();
    program.extend_from_slice(&syscall_pair(SYSCALL_READ_INT));
    program.extend_from_slice(&exit_sequence());
    run_program(&mut machine, &program);
    assert_eq!(machine.exit_code(), ExitCode::Exit);

    machine.reset();
    let after_one = snapshot(&mut machine);
    machine.reset();
    let after_two = snapshot(&mut machine);

    assert_eq!(after_one, after_two);
    assert_eq!(after_one.0, BOOT_ADDRESS);
    assert_eq!(after_one.1, [0; 32]);
    assert_eq!(after_one.2, ExitCode::None);
    // The program image is gone
    let mut word = [0_u8; 4];
    machine.inspector().read_ram(BOOT_ADDRESS, &mut word).unwrap();
    assert_eq!(word, [0; 4]);
}

fn snapshot(machine: &mut Machine) -> (u32, [u32; 32], ExitCode) {
    let inspector = machine.inspector();
    (inspector.pc(), *inspector.gprs(), inspector.exit_code())
}
