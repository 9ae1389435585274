use crate::registers::RoundingMode;

/// Add unsigned and signed 32-bit numbers. Overflows will wrap.
pub fn add_unsigned(a: u32, b: i32) -> u32 {
    if b < 0 {
        a.wrapping_sub(-(b as i64) as u32)
    } else {
        a.wrapping_add(b as u32)
    }
}

/// Round a float towards a 32-bit word using the FCSR rounding mode.
/// Out-of-range and NaN inputs saturate through the `as` conversion.
pub fn round_to_word(value: f64, mode: RoundingMode) -> i32 {
    let rounded = match mode {
        RoundingMode::Nearest => round_ties_even(value),
        RoundingMode::Zero => value.trunc(),
        RoundingMode::Up => value.ceil(),
        RoundingMode::Down => value.floor(),
    };
    rounded as i32
}

fn round_ties_even(value: f64) -> f64 {
    let floor = value.floor();
    let fraction = value - floor;
    if fraction > 0.5 {
        floor + 1.0
    } else if fraction < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_unsigned_handles_negative_offsets() {
        assert_eq!(add_unsigned(100, -1), 99);
        assert_eq!(add_unsigned(0, -1), u32::MAX);
        assert_eq!(add_unsigned(u32::MAX, 1), 0);
        assert_eq!(add_unsigned(5, i32::MIN), 5u32.wrapping_sub(0x8000_0000));
    }

    #[test]
    fn rounding_modes() {
        assert_eq!(round_to_word(2.5, RoundingMode::Nearest), 2);
        assert_eq!(round_to_word(3.5, RoundingMode::Nearest), 4);
        assert_eq!(round_to_word(-2.5, RoundingMode::Nearest), -2);
        assert_eq!(round_to_word(2.7, RoundingMode::Zero), 2);
        assert_eq!(round_to_word(-2.7, RoundingMode::Zero), -2);
        assert_eq!(round_to_word(2.1, RoundingMode::Up), 3);
        assert_eq!(round_to_word(-2.1, RoundingMode::Up), -2);
        assert_eq!(round_to_word(2.9, RoundingMode::Down), 2);
        assert_eq!(round_to_word(-2.1, RoundingMode::Down), -3);
    }
}
