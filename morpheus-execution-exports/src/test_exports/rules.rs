// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::Rules;
use morpheus_models::ChainId;

/// Rules that never change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRules {
    /// returned by `min_unit_price` at any time
    pub min_unit_price: u64,
    /// id of the network
    pub network_id: u32,
    /// id of the chain
    pub chain_id: ChainId,
}

impl Default for StaticRules {
    fn default() -> Self {
        StaticRules {
            min_unit_price: 1,
            network_id: 1337,
            chain_id: ChainId::from_bytes(&[1; 32]),
        }
    }
}

impl Rules for StaticRules {
    fn min_unit_price(&self, _timestamp: i64) -> u64 {
        self.min_unit_price
    }

    fn network_id(&self) -> u32 {
        self.network_id
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
