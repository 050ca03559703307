//! Refinement defaults for oracle sign decisions.
//!
//! Policy
//! - Defaults are fixed constants; callers that need a different budget pass
//!   an explicit `OracleCfg` to the `*_with` entry points.

use serde::Serialize;

/// Maximum number of refinement rounds before a sign is declared indeterminate.
pub(crate) const MAX_ROUNDS: u32 = 64;
/// Fractional bits of the first enclosure.
pub(crate) const INITIAL_BITS: u32 = 32;
/// Fractional bits added per refinement round.
pub(crate) const BITS_PER_ROUND: u32 = 32;

/// Oracle refinement budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OracleCfg {
    pub max_rounds: u32,
    pub initial_bits: u32,
    pub bits_per_round: u32,
}

impl Default for OracleCfg {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            initial_bits: INITIAL_BITS,
            bits_per_round: BITS_PER_ROUND,
        }
    }
}

impl OracleCfg {
    /// Working precision (fractional bits) of round `round`, counted from zero.
    #[inline]
    pub fn bits_for_round(&self, round: u32) -> u32 {
        self.initial_bits
            .saturating_add(round.saturating_mul(self.bits_per_round))
    }
}
