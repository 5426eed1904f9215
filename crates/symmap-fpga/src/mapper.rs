//! Mapper engine: bit groups to constellation levels
//!
//! Each scheme has its own level table indexed by the raw k-bit group value.
//! The tables are kept separate because the two schemes use different sign
//! conventions: QPSK maps `0 → +1`, while the 16-QAM table starts at `-3`.
//!
//! 16-QAM per-axis table (Gray labels, adjacent levels differ in one bit):
//!
//! ```text
//!  group   00   01   11   10
//!  level   -3   -1   +1   +3
//! ```

use crate::types::{Axis, InputWord, Scheme, Symbol};

/// QPSK level per 1-bit group
pub const QPSK_LEVELS: [i8; 2] = [1, -1];

/// 16-QAM level per 2-bit group
pub const QAM16_LEVELS: [i8; 4] = [-3, -1, 3, 1];

/// Level table for a scheme
pub fn levels(scheme: Scheme) -> &'static [i8] {
    match scheme {
        Scheme::Qpsk => &QPSK_LEVELS,
        Scheme::Qam16 => &QAM16_LEVELS,
    }
}

/// Amplitude level for one k-bit group
pub fn level(scheme: Scheme, group: u8) -> i8 {
    let table = levels(scheme);
    table[group as usize & (table.len() - 1)]
}

/// Map a latched input word to a symbol
pub fn map_symbol(scheme: Scheme, input: InputWord) -> Symbol {
    Symbol {
        i: level(scheme, input.group(scheme, Axis::I)),
        q: level(scheme, input.group(scheme, Axis::Q)),
    }
}

/// Map a raw DIN value to a symbol
pub fn map_bits(scheme: Scheme, bits: u32) -> Symbol {
    map_symbol(scheme, InputWord::from_bits(bits).masked(scheme))
}

/// Every constellation point in input-word order
pub fn constellation(scheme: Scheme) -> Vec<Symbol> {
    (0..scheme.order() as u32)
        .map(|bits| map_bits(scheme, bits))
        .collect()
}

/// Inverse lookup: the input word that produces `symbol`, if any
pub fn demap(scheme: Scheme, symbol: Symbol) -> Option<InputWord> {
    let table = levels(scheme);
    let i = table.iter().position(|&l| l == symbol.i)? as u32;
    let q = table.iter().position(|&l| l == symbol.q)? as u32;
    Some(InputWord::from_bits((i << scheme.group_width()) | q))
}

/// Signed level to 4-bit two's complement
pub fn encode_nibble(level: i8) -> u8 {
    (level as u8) & 0x0F
}

/// 4-bit two's complement to signed level
pub fn decode_nibble(nibble: u8) -> i8 {
    ((nibble << 4) as i8) >> 4
}
