//! Host-side driver for the symbol mapper
//!
//! Performs the request sequence a host uses against the peripheral:
//! write DIN, write CTRL, poll STATUS for at most the poll budget, then read
//! DOUT. Works over any [`RegisterBus`].

use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use crate::registers::{CTRL, DIN, DOUT};
use crate::traits::{RegisterBus, RegisterBusExt};
use crate::types::{ControlWord, RegisterMap, Scheme, Symbol};

/// A completed mapping as read back from the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedSymbol {
    /// Decoded I/Q levels
    pub symbol: Symbol,

    /// STATUS bit count (bits consumed)
    pub bit_count: u8,

    /// Raw DOUT byte
    pub raw: u8,
}

/// Driver for a symbol mapper behind a register bus
pub struct MapperDriver<B: RegisterBus> {
    bus: B,
    config: MapperConfig,
}

impl<B: RegisterBus> MapperDriver<B> {
    pub fn new(bus: B, config: MapperConfig) -> Self {
        Self { bus, config }
    }

    /// Create a driver, rejecting a poll budget shorter than the compute latency
    pub fn with_config(bus: B, config: MapperConfig) -> MapperResult<Self> {
        config.validate_poll_budget()?;
        Ok(Self::new(bus, config))
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Reset the peripheral
    pub fn reset(&mut self) -> MapperResult<()> {
        self.bus.reset()
    }

    /// Issue a mapping request without waiting
    ///
    /// DIN is written before CTRL so the input word is stable when start is
    /// asserted, whatever the peripheral's compute latency.
    pub fn request(&mut self, scheme: Scheme, bits: u32) -> MapperResult<()> {
        let ctrl = ControlWord::request(scheme);
        tracing::debug!(%scheme, bits, ctrl = ctrl.bits(), "Requesting mapping");

        self.bus.write_reg(DIN, bits)?;
        self.bus.write_reg(CTRL, ctrl.bits())?;
        Ok(())
    }

    /// Map one input word and read the result back
    pub fn map(&mut self, scheme: Scheme, bits: u32) -> MapperResult<MappedSymbol> {
        self.request(scheme, bits)?;
        let status = self.bus.wait_ready(self.config.poll_budget_cycles)?;
        let raw = self.bus.read_reg(DOUT)? as u8;

        Ok(MappedSymbol {
            symbol: Symbol::unpack(raw),
            bit_count: status.bit_count,
            raw,
        })
    }

    /// Map a bit sequence, one request per full group
    ///
    /// Bits within a group are taken MSB first. A trailing partial group is
    /// not mapped.
    pub fn map_bits(&mut self, scheme: Scheme, bits: &[bool]) -> MapperResult<Vec<MappedSymbol>> {
        let width = scheme.bits_per_symbol() as usize;
        let remainder = bits.len() % width;
        if remainder != 0 {
            tracing::debug!(dropped = remainder, "Ignoring partial trailing group");
        }

        bits.chunks_exact(width)
            .map(|group| {
                let word = group.iter().fold(0u32, |acc, &b| (acc << 1) | b as u32);
                self.map(scheme, word)
            })
            .collect()
    }

    /// Read DOUT if a completed result is available
    pub fn last_symbol(&mut self) -> MapperResult<Symbol> {
        if !self.bus.read_status()?.ready {
            return Err(MapperError::NotReady);
        }
        self.bus.read_symbol()
    }

    /// Register map of the peripheral
    pub fn describe(&self) -> RegisterMap {
        self.bus.register_map()
    }
}
