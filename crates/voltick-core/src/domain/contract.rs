use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Symbol, ValidationError};

const MAX_UNDERLYING_LEN: usize = 6;

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    pub const fn code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl Display for OptionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => f.write_str("call"),
            Self::Put => f.write_str("put"),
        }
    }
}

/// A single option contract on a listed underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub underlying: Symbol,
    pub expiry: Date,
    pub strike: f64,
    pub kind: OptionKind,
}

impl OptionContract {
    pub fn new(
        underlying: Symbol,
        expiry: Date,
        strike: f64,
        kind: OptionKind,
    ) -> Result<Self, ValidationError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(ValidationError::InvalidStrike { value: strike });
        }
        // OCC underlying roots top out at six characters.
        if underlying.as_str().len() > MAX_UNDERLYING_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: underlying.as_str().len(),
                max: MAX_UNDERLYING_LEN,
            });
        }

        Ok(Self {
            underlying,
            expiry,
            strike,
            kind,
        })
    }

    /// OCC-style ticker understood by the aggregates and snapshot endpoints:
    /// `O:<TICKER><YYMMDD><C|P><strike x 1000, zero-padded to 8 digits>`,
    /// e.g. `O:AAPL250425C00200000` for a 200.00 call expiring 2025-04-25.
    pub fn occ_symbol(&self) -> Symbol {
        // Round before widening so 199.999 prices as 200000, not 199999.
        let strike_thousandths = (self.strike * 1000.0).round() as u64;
        let raw = format!(
            "O:{}{:02}{:02}{:02}{}{:08}",
            self.underlying,
            self.expiry.year() % 100,
            u8::from(self.expiry.month()),
            self.expiry.day(),
            self.kind.code(),
            strike_thousandths,
        );
        Symbol::parse(&raw).expect("occ symbol is built from validated parts")
    }
}

impl Display for OptionContract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} @ {:.2}",
            self.underlying, self.expiry, self.kind, self.strike
        )
    }
}
