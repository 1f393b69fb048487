// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Unit price market.
//!
//! The suggested unit price relaxes towards the chain minimum: each new block
//! suggests 80% of the price of the last transaction block, never less than
//! the minimum price of the rules in force.

use morpheus_execution_exports::{ChainError, ChainReader, Rules};
use morpheus_models::config::FEE_SCALER;
use tracing::debug;

/// `max(floor(prev * 0.8), min)`, with the float arithmetic every node uses.
///
/// ```
/// use morpheus_execution_worker::damped_unit_price;
///
/// assert_eq!(damped_unit_price(1000, 1), 800);
/// assert_eq!(damped_unit_price(1, 1), 1);
/// assert_eq!(damped_unit_price(0, 5), 5);
/// ```
pub fn damped_unit_price(prev: u64, min: u64) -> u64 {
    let damped = (prev as f64 * FEE_SCALER) as u64;
    damped.max(min)
}

/// Fee charged for `units` compute units at `unit_price`, saturating
pub fn fee_for(units: u64, unit_price: u64) -> u64 {
    units.saturating_mul(unit_price)
}

/// Suggests unit prices from the state of the chain
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeEngine;

impl FeeEngine {
    /// Creates a new `FeeEngine`
    pub const fn new() -> Self {
        FeeEngine
    }

    /// Unit price to suggest to users at `now` (milliseconds)
    ///
    /// # Arguments
    /// * `chain`: access to the preferred block
    /// * `rules`: rules giving the minimum price
    /// * `now`: current time
    pub fn suggested_fee(
        &self,
        chain: &dyn ChainReader,
        rules: &dyn Rules,
        now: i64,
    ) -> Result<u64, ChainError> {
        let preferred = chain.preferred_block()?;
        let last_unit_price = preferred
            .last_tx_block
            .map(|block| block.unit_price)
            .unwrap_or(0);
        let min_unit_price = rules.min_unit_price(now);
        let suggested = damped_unit_price(last_unit_price, min_unit_price);
        debug!(
            "suggested unit price {} (last: {}, min: {})",
            suggested, last_unit_price, min_unit_price
        );
        Ok(suggested)
    }
}
