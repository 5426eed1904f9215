//! Register bus trait definition

use crate::error::{MapperError, MapperResult};
use crate::registers::{BASE, DOUT, STATUS};
use crate::types::{RegisterMap, StatusWord, Symbol};

/// Register-level access to a symbol mapper
///
/// This is everything the host sees of the peripheral: a soft reset,
/// single-register reads and writes, and a way to let clock cycles pass.
/// The software model implements it directly; a hardware backend would
/// forward each call to its bus.
///
/// # Example
///
/// ```rust
/// use symmap_fpga::{RegisterBus, RegisterBusExt, SimulatedMapper};
/// use symmap_fpga::registers::{CTRL, DIN};
///
/// let mut bus = SimulatedMapper::new();
/// bus.reset().unwrap();
/// bus.write_reg(CTRL, 5).unwrap();
/// bus.write_reg(DIN, 0b01).unwrap();
/// bus.wait_ready(20).unwrap();
/// assert_eq!(bus.read_symbol().unwrap().pack(), 0x1F);
/// ```
pub trait RegisterBus: Send {
    /// Reset all registers and state (soft reset)
    fn reset(&mut self) -> MapperResult<()>;

    /// Write a register value
    fn write_reg(&mut self, address: u32, value: u32) -> MapperResult<()>;

    /// Read a register value
    fn read_reg(&mut self, address: u32) -> MapperResult<u32>;

    /// Advance the peripheral clock by `cycles`
    fn clock_cycles(&mut self, cycles: u32) -> MapperResult<()>;

    /// Register map as seen from this bus
    fn register_map(&self) -> RegisterMap {
        RegisterMap::symbol_mapper(BASE)
    }
}

/// Decoded register helpers for any [`RegisterBus`]
pub trait RegisterBusExt: RegisterBus {
    /// Read and decode STATUS
    fn read_status(&mut self) -> MapperResult<StatusWord> {
        Ok(StatusWord::from_bits(self.read_reg(STATUS)?))
    }

    /// Read and decode DOUT (meaningful only when ready)
    fn read_symbol(&mut self) -> MapperResult<Symbol> {
        Ok(Symbol::unpack(self.read_reg(DOUT)? as u8))
    }

    /// Poll STATUS once per cycle until ready, for at most `max_cycles`
    fn wait_ready(&mut self, max_cycles: u32) -> MapperResult<StatusWord> {
        let mut waited = 0;

        loop {
            let status = self.read_status()?;
            if status.ready {
                return Ok(status);
            }

            if waited >= max_cycles {
                tracing::warn!(cycles = waited, "STATUS.ready not set");
                return Err(MapperError::Timeout {
                    address: STATUS,
                    cycles: waited,
                });
            }

            self.clock_cycles(1)?;
            waited += 1;
        }
    }
}

// Blanket implementation
impl<T: RegisterBus + ?Sized> RegisterBusExt for T {}
