//! Register definitions for the symbol mapper peripheral

/// Base address of the register block on the host bus
pub const BASE: u32 = 0x0;

/// Control register (write-only)
pub const CTRL: u32 = 0x0;
/// Status register (read-only)
pub const STATUS: u32 = 0x1;
/// Input data register (write-only)
pub const DIN: u32 = 0x2;
/// Output symbol register (read-only)
pub const DOUT: u32 = 0x3;

/// Number of mapped registers
pub const REGISTER_COUNT: usize = 4;

// Control bits
pub const CTRL_START: u32 = 1 << 0;
pub const CTRL_SCHEME: u32 = 1 << 1;
pub const CTRL_VALID: u32 = 1 << 2;

// Status bits
pub const STATUS_READY: u32 = 1 << 0;
pub const STATUS_BIT_COUNT_SHIFT: u32 = 1;
pub const STATUS_BIT_COUNT_MASK: u32 = 0xF << STATUS_BIT_COUNT_SHIFT;

/// DIN input word, bits [3:0]
pub const DIN_MASK: u32 = 0xF;

/// DOUT layout: I in bits [7:4], Q in bits [3:0]
pub const DOUT_I_SHIFT: u32 = 4;
pub const NIBBLE_MASK: u32 = 0xF;

/// STATUS field accessors
pub mod status {
    use super::*;

    /// Ready flag from a STATUS value
    pub fn ready(value: u32) -> bool {
        value & STATUS_READY != 0
    }

    /// Consumed-bit count from a STATUS value
    pub fn bit_count(value: u32) -> u8 {
        ((value & STATUS_BIT_COUNT_MASK) >> STATUS_BIT_COUNT_SHIFT) as u8
    }
}

/// DOUT field accessors (raw nibbles, not sign-extended)
pub mod dout {
    use super::*;

    /// I nibble, bits [7:4]
    pub fn i_nibble(value: u32) -> u8 {
        ((value >> DOUT_I_SHIFT) & NIBBLE_MASK) as u8
    }

    /// Q nibble, bits [3:0]
    pub fn q_nibble(value: u32) -> u8 {
        (value & NIBBLE_MASK) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fields() {
        assert!(!status::ready(0));
        assert!(status::ready(0b0_0101));
        assert_eq!(status::bit_count(0b0_0101), 2);
        assert_eq!(status::bit_count(0b0_1001), 4);
        assert_eq!(status::bit_count(0xFFFF_FFE1), 0);
    }

    #[test]
    fn test_dout_fields() {
        assert_eq!(dout::i_nibble(0x1F), 0x1);
        assert_eq!(dout::q_nibble(0x1F), 0xF);
        assert_eq!(dout::i_nibble(0xD3), 0xD);
        assert_eq!(dout::q_nibble(0xD3), 0x3);
    }
}
