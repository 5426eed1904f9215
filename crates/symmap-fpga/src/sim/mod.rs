//! Simulated symbol mapper peripheral
//!
//! This module models the peripheral's register file and control/status
//! state machine in software, clock cycle by clock cycle. It is useful for:
//! - Developing host drivers without hardware
//! - Unit testing
//! - Checking captured DOUT values against the reference tables
//!
//! # Timing
//!
//! A CTRL write that satisfies the trigger policy moves the model into
//! `Compute`. The engine runs `compute_latency_cycles` clock cycles later and
//! samples DIN at that moment, so a driver may write CTRL before DIN as long
//! as both land before the latency elapses. The accepted latencies (see
//! [`MIN_LATENCY_CYCLES`](crate::config::MIN_LATENCY_CYCLES) and
//! [`MAX_LATENCY_CYCLES`](crate::config::MAX_LATENCY_CYCLES)) keep both
//! orderings correct for a host that polls STATUS five cycles later.

use crate::config::MapperConfig;
use crate::error::{MapperError, MapperResult};
use crate::mapper;
use crate::traits::RegisterBus;
use crate::types::{
    ControlWord, InputWord, MapperState, PeripheralInfo, RegisterAddress, Scheme, StatusWord,
};

/// Software model of the symbol mapper
///
/// Each instance owns its whole register file, so independent mappers can
/// run side by side.
#[derive(Debug, Clone)]
pub struct SimulatedMapper {
    /// Model configuration
    config: MapperConfig,

    /// State machine state
    state: MapperState,

    /// Scheme selected by the most recent CTRL write
    scheme: Scheme,

    /// Scheme latched by the CTRL write that started the current request
    request_scheme: Scheme,

    /// DIN register
    din: InputWord,

    /// DOUT register
    dout: u8,

    /// STATUS register
    status: StatusWord,

    /// Clock cycles since reset
    cycle: u64,

    /// Mappings completed since reset
    completed: u64,
}

impl SimulatedMapper {
    /// Create a mapper with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(MapperConfig::default())
    }

    /// Create a mapper with a custom configuration
    pub fn with_config(config: MapperConfig) -> MapperResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: MapperConfig) -> Self {
        Self {
            config,
            state: MapperState::Idle,
            scheme: Scheme::Qpsk,
            request_scheme: Scheme::Qpsk,
            din: InputWord::default(),
            dout: 0,
            status: StatusWord::default(),
            cycle: 0,
            completed: 0,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    /// Scheme selected by the most recent CTRL write
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Clock cycles since reset
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Mappings completed since reset
    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn info(&self) -> PeripheralInfo {
        PeripheralInfo {
            name: "Simulated symbol mapper".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            register_count: RegisterAddress::ALL.len(),
            schemes: Scheme::ALL.to_vec(),
        }
    }

    fn write_ctrl(&mut self, ctrl: ControlWord) {
        self.scheme = ctrl.scheme;

        if !ctrl.requests_mapping(self.config.trigger) {
            tracing::debug!(?ctrl, "CTRL write without trigger");
            return;
        }

        // A new request invalidates the previous result
        self.request_scheme = ctrl.scheme;
        self.status = StatusWord::default();
        self.state = MapperState::Compute {
            remaining: self.config.compute_latency_cycles,
        };
        tracing::debug!(scheme = %ctrl.scheme, latency = self.config.compute_latency_cycles, "Mapping requested");
    }

    /// COMPUTE -> DONE: run the engine on the current DIN
    fn complete(&mut self) {
        let scheme = self.request_scheme;
        let symbol = mapper::map_symbol(scheme, self.din);

        self.dout = symbol.pack();
        self.status = StatusWord {
            ready: true,
            bit_count: scheme.bits_per_symbol() as u8,
        };
        self.state = MapperState::Done;
        self.completed += 1;

        tracing::debug!(
            %scheme,
            din = self.din.bits(),
            dout = self.dout,
            %symbol,
            "Mapping complete"
        );
    }

    /// Advance one clock cycle
    fn tick(&mut self) {
        self.cycle += 1;

        if let MapperState::Compute { remaining } = self.state {
            tracing::trace!(cycle = self.cycle, remaining, "Compute tick");
            if remaining <= 1 {
                self.complete();
            } else {
                self.state = MapperState::Compute {
                    remaining: remaining - 1,
                };
            }
        }
    }

    fn unmapped(&self, address: u32) -> MapperResult<()> {
        if self.config.strict_addressing {
            return Err(MapperError::InvalidAddress(address));
        }
        tracing::debug!(address, "Access to unmapped address ignored");
        Ok(())
    }
}

impl Default for SimulatedMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimulatedMapper {
    fn reset(&mut self) -> MapperResult<()> {
        self.state = MapperState::Idle;
        self.scheme = Scheme::Qpsk;
        self.request_scheme = Scheme::Qpsk;
        self.din = InputWord::default();
        self.dout = 0;
        self.status = StatusWord::default();
        self.cycle = 0;
        self.completed = 0;
        tracing::debug!("Mapper reset");
        Ok(())
    }

    fn write_reg(&mut self, address: u32, value: u32) -> MapperResult<()> {
        let register = match RegisterAddress::try_from(address) {
            Ok(register) => register,
            Err(_) => return self.unmapped(address),
        };

        tracing::debug!(register = register.name(), value, "Register write");

        match register {
            RegisterAddress::Ctrl => self.write_ctrl(ControlWord::from_bits(value)),
            RegisterAddress::Din => self.din = InputWord::from_bits(value),
            RegisterAddress::Status | RegisterAddress::Dout => {
                tracing::debug!(register = register.name(), "Write to read-only register ignored");
            }
        }

        Ok(())
    }

    fn read_reg(&mut self, address: u32) -> MapperResult<u32> {
        let register = match RegisterAddress::try_from(address) {
            Ok(register) => register,
            Err(_) => return self.unmapped(address).map(|_| 0),
        };

        let value = match register {
            RegisterAddress::Status => self.status.bits(),
            RegisterAddress::Dout => self.dout as u32,
            // Write-only registers have no read-back
            RegisterAddress::Ctrl | RegisterAddress::Din => 0,
        };

        Ok(value)
    }

    fn clock_cycles(&mut self, cycles: u32) -> MapperResult<()> {
        for _ in 0..cycles {
            self.tick();
        }
        Ok(())
    }
}
