//! Two-column register dump with change markers against the previous plot.

use mips32_core::constants::REGISTER_NAMES;
use mips32_core::MachineInspector;

pub struct MachineDataPlotter {
    prev_gprs: [u32; 32],
    prev_pc: u32,
}

impl MachineDataPlotter {
    pub fn new(inspector: &MachineInspector) -> Self {
        MachineDataPlotter {
            prev_gprs: *inspector.gprs(),
            prev_pc: inspector.pc(),
        }
    }

    /// Print the PC, exit code, and all GPRs in two columns. Values that
    /// changed since the last plot are marked with `<`.
    pub fn plot(&mut self, inspector: &MachineInspector) {
        let pc = inspector.pc();
        let pc_marker = if pc != self.prev_pc { '<' } else { ' ' };
        eprintln!(
            " PC{} {:#010x}{:12}| Exit Code {:>18}",
            pc_marker,
            pc,
            "",
            inspector.exit_code().to_string()
        );

        let gprs = inspector.gprs();
        for i in 0..16 {
            let left = gprs[i];
            let right = gprs[i + 16];
            let left_marker = if left != self.prev_gprs[i] { '<' } else { ' ' };
            let right_marker = if right != self.prev_gprs[i + 16] { '<' } else { ' ' };

            eprintln!(
                "{:>5}{} {:#010x} {:>12} | {:>5}{} {:#010x} {:>12}",
                REGISTER_NAMES[i],
                left_marker,
                left,
                left as i32,
                REGISTER_NAMES[i + 16],
                right_marker,
                right,
                right as i32,
            );
        }

        self.prev_gprs = *gprs;
        self.prev_pc = pc;
    }
}
