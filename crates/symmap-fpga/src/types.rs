//! Mapper types and data structures

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::MapperError;
use crate::mapper::{decode_nibble, encode_nibble};
use crate::registers::{self, CTRL_SCHEME, CTRL_START, CTRL_VALID};

/// Floating-point I/Q sample type
pub type IQSample = Complex64;

/// Modulation scheme, selected by CTRL bit 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// 2 bits per symbol, one bit per axis
    #[default]
    Qpsk,
    /// 4 bits per symbol, two bits per axis
    Qam16,
}

impl Scheme {
    /// All supported schemes
    pub const ALL: [Scheme; 2] = [Scheme::Qpsk, Scheme::Qam16];

    /// Decode the CTRL scheme bit (0 = QPSK, 1 = QAM16)
    pub fn from_ctrl_bit(bit: bool) -> Self {
        if bit {
            Scheme::Qam16
        } else {
            Scheme::Qpsk
        }
    }

    /// CTRL scheme bit for this scheme
    pub fn ctrl_bit(self) -> bool {
        matches!(self, Scheme::Qam16)
    }

    /// Bits per axis (k)
    pub fn group_width(self) -> u32 {
        match self {
            Scheme::Qpsk => 1,
            Scheme::Qam16 => 2,
        }
    }

    /// Bits consumed per symbol (2k)
    pub fn bits_per_symbol(self) -> u32 {
        2 * self.group_width()
    }

    /// Number of constellation points
    pub fn order(self) -> usize {
        1 << self.bits_per_symbol()
    }

    /// Get a human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Qpsk => "QPSK",
            Scheme::Qam16 => "16-QAM",
        }
    }

    /// Scale factor that normalizes the integer constellation to unit average power
    pub fn normalization(self) -> f64 {
        match self {
            Scheme::Qpsk => std::f64::consts::FRAC_1_SQRT_2,
            Scheme::Qam16 => 1.0 / 10.0_f64.sqrt(),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qpsk" => Ok(Scheme::Qpsk),
            "qam16" | "16qam" | "16-qam" => Ok(Scheme::Qam16),
            _ => Err(MapperError::InvalidScheme(s.to_string())),
        }
    }
}

/// Rule deciding whether a CTRL write starts a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// `start` alone requests a mapping; `valid` is informational
    #[default]
    Start,
    /// Both `start` and `valid` must be set
    StartAndValid,
}

/// Decoded CTRL register write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlWord {
    pub start: bool,
    pub scheme: Scheme,
    pub valid: bool,
}

impl ControlWord {
    /// Request word with start and valid both set
    pub fn request(scheme: Scheme) -> Self {
        Self {
            start: true,
            scheme,
            valid: true,
        }
    }

    /// Decode a raw CTRL value; unused bits are ignored
    pub fn from_bits(value: u32) -> Self {
        Self {
            start: value & CTRL_START != 0,
            scheme: Scheme::from_ctrl_bit(value & CTRL_SCHEME != 0),
            valid: value & CTRL_VALID != 0,
        }
    }

    /// Encode as a raw CTRL value
    pub fn bits(self) -> u32 {
        let mut value = 0;
        if self.start {
            value |= CTRL_START;
        }
        if self.scheme.ctrl_bit() {
            value |= CTRL_SCHEME;
        }
        if self.valid {
            value |= CTRL_VALID;
        }
        value
    }

    /// Whether this write starts a mapping under `policy`
    pub fn requests_mapping(self, policy: TriggerPolicy) -> bool {
        match policy {
            TriggerPolicy::Start => self.start,
            TriggerPolicy::StartAndValid => self.start && self.valid,
        }
    }
}

/// Constellation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    I,
    Q,
}

/// DIN input word (bits [3:0])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputWord(u8);

impl InputWord {
    /// Latch a raw DIN value, keeping bits [3:0]
    pub fn from_bits(value: u32) -> Self {
        Self((value & registers::DIN_MASK) as u8)
    }

    /// Raw 4-bit value
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Only the bits the scheme consumes
    pub fn masked(self, scheme: Scheme) -> Self {
        Self(self.0 & ((1u8 << scheme.bits_per_symbol()) - 1))
    }

    /// Extract the k-bit group for one axis
    ///
    /// I-group is bits `[2k-1:k]`, Q-group is bits `[k-1:0]`.
    pub fn group(self, scheme: Scheme, axis: Axis) -> u8 {
        let k = scheme.group_width();
        let mask = (1u8 << k) - 1;
        match axis {
            Axis::I => (self.0 >> k) & mask,
            Axis::Q => self.0 & mask,
        }
    }
}

/// Mapped constellation point with signed integer amplitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Symbol {
    pub i: i8,
    pub q: i8,
}

impl Symbol {
    pub const fn new(i: i8, q: i8) -> Self {
        Self { i, q }
    }

    /// Pack as the DOUT byte: `(I << 4) | (Q & 0xF)`
    pub fn pack(self) -> u8 {
        (encode_nibble(self.i) << 4) | encode_nibble(self.q)
    }

    /// Unpack a DOUT value, sign-extending both nibbles
    pub fn unpack(value: u8) -> Self {
        Self {
            i: decode_nibble(value >> 4),
            q: decode_nibble(value & 0x0F),
        }
    }

    /// Normalized floating-point point (unit average power for `scheme`)
    pub fn to_iq(self, scheme: Scheme) -> IQSample {
        let scale = scheme.normalization();
        IQSample::new(self.i as f64 * scale, self.q as f64 * scale)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.i, self.q)
    }
}

/// Decoded STATUS register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusWord {
    pub ready: bool,
    pub bit_count: u8,
}

impl StatusWord {
    /// Pack as bit0 = ready, bits[4:1] = bit_count
    pub fn bits(self) -> u32 {
        let ready = if self.ready { registers::STATUS_READY } else { 0 };
        let count = ((self.bit_count as u32) << registers::STATUS_BIT_COUNT_SHIFT)
            & registers::STATUS_BIT_COUNT_MASK;
        ready | count
    }

    pub fn from_bits(value: u32) -> Self {
        Self {
            ready: registers::status::ready(value),
            bit_count: registers::status::bit_count(value),
        }
    }
}

/// Logical register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum RegisterAddress {
    Ctrl = registers::CTRL,
    Status = registers::STATUS,
    Din = registers::DIN,
    Dout = registers::DOUT,
}

impl RegisterAddress {
    pub const ALL: [RegisterAddress; registers::REGISTER_COUNT] = [
        RegisterAddress::Ctrl,
        RegisterAddress::Status,
        RegisterAddress::Din,
        RegisterAddress::Dout,
    ];

    pub fn offset(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            RegisterAddress::Ctrl => "CTRL",
            RegisterAddress::Status => "STATUS",
            RegisterAddress::Din => "DIN",
            RegisterAddress::Dout => "DOUT",
        }
    }

    pub fn access(self) -> RegisterAccess {
        match self {
            RegisterAddress::Ctrl | RegisterAddress::Din => RegisterAccess::WriteOnly,
            RegisterAddress::Status | RegisterAddress::Dout => RegisterAccess::ReadOnly,
        }
    }
}

impl TryFrom<u32> for RegisterAddress {
    type Error = MapperError;

    fn try_from(address: u32) -> Result<Self, Self::Error> {
        match address {
            registers::CTRL => Ok(RegisterAddress::Ctrl),
            registers::STATUS => Ok(RegisterAddress::Status),
            registers::DIN => Ok(RegisterAddress::Din),
            registers::DOUT => Ok(RegisterAddress::Dout),
            other => Err(MapperError::InvalidAddress(other)),
        }
    }
}

/// Register map of the peripheral
#[derive(Debug, Clone)]
pub struct RegisterMap {
    /// Base address
    pub base: u32,

    /// Registers in address order
    pub registers: Vec<RegisterInfo>,
}

impl RegisterMap {
    /// The four-register symbol mapper map
    pub fn symbol_mapper(base: u32) -> Self {
        let registers = RegisterAddress::ALL
            .iter()
            .map(|&addr| {
                let (width, description) = match addr {
                    RegisterAddress::Ctrl => (3, "bit0 start, bit1 scheme (0=QPSK, 1=16-QAM), bit2 valid"),
                    RegisterAddress::Status => (5, "bit0 ready, bits[4:1] consumed bit count"),
                    RegisterAddress::Din => (4, "bits[3:0] input word"),
                    RegisterAddress::Dout => (8, "bits[7:4] I, bits[3:0] Q (signed 4-bit)"),
                };
                RegisterInfo {
                    name: addr.name().to_string(),
                    offset: addr.offset(),
                    width,
                    access: addr.access(),
                    description: description.to_string(),
                }
            })
            .collect();

        Self { base, registers }
    }

    /// Look up a register by name
    pub fn get(&self, name: &str) -> Option<&RegisterInfo> {
        self.registers.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Absolute address of a register
    pub fn address_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|r| self.base + r.offset)
    }
}

/// Information about a single register
#[derive(Debug, Clone)]
pub struct RegisterInfo {
    /// Register name
    pub name: String,

    /// Offset from base address
    pub offset: u32,

    /// Width of the meaningful field in bits
    pub width: u8,

    /// Access mode
    pub access: RegisterAccess,

    /// Description
    pub description: String,
}

/// Register access mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegisterAccess {
    /// Read-only
    ReadOnly,
    /// Write-only
    WriteOnly,
}

impl RegisterAccess {
    pub fn readable(self) -> bool {
        self == RegisterAccess::ReadOnly
    }

    pub fn writable(self) -> bool {
        self == RegisterAccess::WriteOnly
    }
}

/// Control/status state machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapperState {
    /// No mapping in flight
    #[default]
    Idle,
    /// Mapping requested; the engine runs when `remaining` reaches zero
    Compute { remaining: u32 },
    /// Result held in DOUT, STATUS.ready = 1
    Done,
}

impl MapperState {
    pub fn is_busy(&self) -> bool {
        matches!(self, MapperState::Compute { .. })
    }
}

/// Information about the peripheral
#[derive(Debug, Clone)]
pub struct PeripheralInfo {
    /// Device name
    pub name: String,

    /// Model version
    pub version: String,

    /// Number of mapped registers
    pub register_count: usize,

    /// Supported modulation schemes
    pub schemes: Vec<Scheme>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_widths() {
        assert_eq!(Scheme::Qpsk.group_width(), 1);
        assert_eq!(Scheme::Qpsk.bits_per_symbol(), 2);
        assert_eq!(Scheme::Qpsk.order(), 4);
        assert_eq!(Scheme::Qam16.group_width(), 2);
        assert_eq!(Scheme::Qam16.bits_per_symbol(), 4);
        assert_eq!(Scheme::Qam16.order(), 16);
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("QPSK".parse::<Scheme>().unwrap(), Scheme::Qpsk);
        assert_eq!("16-qam".parse::<Scheme>().unwrap(), Scheme::Qam16);
        assert_eq!("qam16".parse::<Scheme>().unwrap(), Scheme::Qam16);
        assert!("8psk".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_control_word_decode() {
        // CTRL = 5: start + valid, scheme bit clear
        let ctrl = ControlWord::from_bits(5);
        assert!(ctrl.start);
        assert!(ctrl.valid);
        assert_eq!(ctrl.scheme, Scheme::Qpsk);

        let ctrl = ControlWord::from_bits(CTRL_START | CTRL_VALID | CTRL_SCHEME);
        assert_eq!(ctrl.scheme, Scheme::Qam16);
        assert_eq!(ctrl.bits(), 0b111);
        assert_eq!(ControlWord::request(Scheme::Qpsk).bits(), 5);
    }

    #[test]
    fn test_trigger_policy() {
        let start_only = ControlWord::from_bits(CTRL_START);
        assert!(start_only.requests_mapping(TriggerPolicy::Start));
        assert!(!start_only.requests_mapping(TriggerPolicy::StartAndValid));

        let valid_only = ControlWord::from_bits(CTRL_VALID | CTRL_SCHEME);
        assert!(!valid_only.requests_mapping(TriggerPolicy::Start));
        assert!(!valid_only.requests_mapping(TriggerPolicy::StartAndValid));

        for raw in [5, CTRL_START | CTRL_VALID | CTRL_SCHEME] {
            let ctrl = ControlWord::from_bits(raw);
            assert!(ctrl.requests_mapping(TriggerPolicy::Start));
            assert!(ctrl.requests_mapping(TriggerPolicy::StartAndValid));
        }
    }

    #[test]
    fn test_input_groups() {
        let word = InputWord::from_bits(0b1101);
        assert_eq!(word.group(Scheme::Qam16, Axis::I), 0b11);
        assert_eq!(word.group(Scheme::Qam16, Axis::Q), 0b01);
        assert_eq!(word.group(Scheme::Qpsk, Axis::I), 0);
        assert_eq!(word.group(Scheme::Qpsk, Axis::Q), 1);

        // Upper DIN bits are dropped on latch
        assert_eq!(InputWord::from_bits(0xF3).bits(), 0x3);
        assert_eq!(InputWord::from_bits(0b1110).masked(Scheme::Qpsk).bits(), 0b10);
    }

    #[test]
    fn test_symbol_pack() {
        assert_eq!(Symbol::new(1, -1).pack(), 0x1F);
        assert_eq!(Symbol::new(3, 3).pack(), 0x33);
        assert_eq!(Symbol::new(-3, 1).pack(), 0xD1);
        assert_eq!(Symbol::unpack(0xDF), Symbol::new(-3, -1));
        assert_eq!(Symbol::new(-1, 3).to_string(), "(-1, +3)");
    }

    #[test]
    fn test_symbol_normalized() {
        let p = Symbol::new(1, -1).to_iq(Scheme::Qpsk);
        assert!((p.norm() - 1.0).abs() < 1e-12);

        let p = Symbol::new(3, 3).to_iq(Scheme::Qam16);
        assert!((p.re - 3.0 / 10.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_status_word() {
        let status = StatusWord { ready: true, bit_count: 4 };
        assert_eq!(status.bits(), 0b0_1001);
        assert_eq!(StatusWord::from_bits(0b0_0101), StatusWord { ready: true, bit_count: 2 });
        assert_eq!(StatusWord::default().bits(), 0);
    }

    #[test]
    fn test_register_address() {
        assert_eq!(RegisterAddress::try_from(0x3).unwrap(), RegisterAddress::Dout);
        assert!(matches!(
            RegisterAddress::try_from(0x4),
            Err(MapperError::InvalidAddress(0x4))
        ));
        assert!(RegisterAddress::Ctrl.access().writable());
        assert!(!RegisterAddress::Ctrl.access().readable());
        assert!(RegisterAddress::Status.access().readable());
    }

    #[test]
    fn test_register_map() {
        let map = RegisterMap::symbol_mapper(0x40);
        assert_eq!(map.registers.len(), 4);
        assert_eq!(map.address_of("dout"), Some(0x43));
        assert_eq!(map.get("STATUS").map(|r| r.width), Some(5));
        assert!(map.get("VERSION").is_none());
    }
}
