//! Log output for the mapper model and driver
//!
//! The crate emits its events through `tracing` and prints nothing until a
//! subscriber is installed. Events fall into three bands:
//!
//! - `warn`: the driver gave up waiting for STATUS.ready
//! - `debug`: register writes, requests, completions and resets
//! - `trace`: one event per clock cycle while a mapping is in flight
//!
//! [`Verbosity`] picks a band for this crate only; other crates stay at
//! `warn`. `RUST_LOG` overrides the whole filter when set.
//!
//! ```rust
//! use symmap_fpga::logging::{init_logging, LogConfig, Verbosity};
//!
//! init_logging(&LogConfig::default().verbosity(Verbosity::Registers));
//! let mut driver = symmap_fpga::simulated(Default::default()).unwrap();
//! driver.map(symmap_fpga::Scheme::Qpsk, 0b01).unwrap();
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much of the mapper's activity to log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Poll timeouts only
    #[default]
    Warnings,
    /// Register traffic and state transitions
    Registers,
    /// Register traffic plus every compute cycle
    Cycles,
}

impl Verbosity {
    fn level(self) -> &'static str {
        match self {
            Verbosity::Warnings => "warn",
            Verbosity::Registers => "debug",
            Verbosity::Cycles => "trace",
        }
    }

    /// `EnvFilter` directive scoped to this crate
    pub fn directive(self) -> String {
        format!("warn,{}={}", env!("CARGO_CRATE_NAME"), self.level())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub verbosity: Verbosity,

    /// One JSON object per event instead of compact text
    pub json: bool,

    /// Include file:line of the emitting call
    pub source_location: bool,
}

impl LogConfig {
    /// Builder: set verbosity
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Builder: JSON output
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Builder: include source locations
    pub fn with_source_location(mut self) -> Self {
        self.source_location = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.verbosity.directive()))
    }
}

/// Install the global subscriber
///
/// Returns false if a subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_logging(config: &LogConfig) -> bool {
    let json = config.json.then(|| {
        fmt::layer()
            .json()
            .with_file(config.source_location)
            .with_line_number(config.source_location)
    });
    let text = (!config.json).then(|| {
        fmt::layer()
            .compact()
            .with_file(config.source_location)
            .with_line_number(config.source_location)
    });

    tracing_subscriber::registry()
        .with(config.filter())
        .with(json)
        .with(text)
        .try_init()
        .is_ok()
}
