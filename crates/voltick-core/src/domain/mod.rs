//! Domain models shared by the fetch layer and the indicator engine.

mod contract;
mod models;
mod symbol;

pub use contract::{OptionContract, OptionKind};
pub use models::{Bar, PricePoint, PriceSeries, Signal};
pub use symbol::Symbol;
