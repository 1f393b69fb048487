// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Data types shared by every crate of the execution core:
//! hashes, identities, state keys, chunk accounting, warp envelopes
//! and the protocol constants.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod hash;
pub mod ids;
pub mod public_key;
pub mod state_key;
pub mod warp;

pub use error::ModelsError;
pub use hash::{Hash, HashDeserializer, HashSerializer};
pub use ids::{ChainId, ChainIdDeserializer, ChainIdSerializer, TxId, TxIdDeserializer, TxIdSerializer};
pub use public_key::{PublicKey, PublicKeyDeserializer, PublicKeySerializer};
pub use state_key::{num_chunks, StateKey, BALANCE_PREFIX, OUTGOING_WARP_PREFIX};
pub use warp::{
    OutgoingWarpRecord, OutgoingWarpRecordDeserializer, OutgoingWarpRecordSerializer,
    UnsignedWarpMessage, UnsignedWarpMessageDeserializer, UnsignedWarpMessageSerializer,
    WarpMessage, WarpMessageDeserializer, WarpMessageSerializer,
};
