pub mod config;
pub mod error;
pub mod types;

pub use config::{GridInit, PadConfig};
pub use error::{PadError, Result};
pub use types::{Clock, FixedClock, GridPos, StripIndex, SystemClock, Tempo};
