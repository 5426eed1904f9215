//! Symbol mapper peripheral model
//!
//! Register-level model and host driver for a small QPSK / 16-QAM symbol
//! mapper. The peripheral takes up to four input bits, maps them through a
//! per-scheme level table and exposes the packed I/Q point plus a ready flag
//! and consumed-bit count through four registers:
//!
//! | Addr | Name   | Access | Fields |
//! |------|--------|--------|--------|
//! | 0x0  | CTRL   | write  | bit0 start, bit1 scheme (0=QPSK, 1=16-QAM), bit2 valid |
//! | 0x1  | STATUS | read   | bit0 ready, bits[4:1] bit count |
//! | 0x2  | DIN    | write  | bits[3:0] input word |
//! | 0x3  | DOUT   | read   | bits[7:4] I, bits[3:0] Q (signed 4-bit) |
//!
//! # Feature Flags
//!
//! - `sim` (default): Software model of the peripheral
//!
//! # Example
//!
//! ```rust
//! use symmap_fpga::{MapperConfig, MapperDriver, Scheme, SimulatedMapper, Symbol};
//!
//! let mut driver = MapperDriver::new(SimulatedMapper::new(), MapperConfig::default());
//! driver.reset().unwrap();
//!
//! let out = driver.map(Scheme::Qam16, 0b1010).unwrap();
//! assert_eq!(out.symbol, Symbol::new(3, 3));
//! assert_eq!(out.raw, 0x33);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod registers;
pub mod traits;
pub mod types;

#[cfg(feature = "sim")]
pub mod sim;

// Re-export main types
pub use config::MapperConfig;
pub use driver::{MappedSymbol, MapperDriver};
pub use error::{MapperError, MapperResult};
pub use traits::{RegisterBus, RegisterBusExt};
pub use types::{
    Axis, ControlWord, InputWord, IQSample, MapperState, PeripheralInfo, RegisterAccess,
    RegisterAddress, RegisterInfo, RegisterMap, Scheme, StatusWord, Symbol, TriggerPolicy,
};

#[cfg(feature = "sim")]
pub use sim::SimulatedMapper;

/// Create a simulated mapper driver with the given configuration
#[cfg(feature = "sim")]
pub fn simulated(config: MapperConfig) -> MapperResult<MapperDriver<SimulatedMapper>> {
    let sim = SimulatedMapper::with_config(config.clone())?;
    MapperDriver::with_config(sim, config)
}
