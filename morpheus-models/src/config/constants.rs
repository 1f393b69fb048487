// Copyright (c) 2022 MASSA LABS <info@massa.net>

/// Size in bytes of a hash, a public key, a transaction id or a chain id
pub const HASH_SIZE_BYTES: usize = 32;
/// Size in bytes of a public key
pub const PUBLIC_KEY_SIZE_BYTES: usize = 32;

/// Storage accounting unit, in bytes
pub const CHUNK_SIZE: usize = 64;

/// Blocks with a timestamp more than this ahead of the local clock are ignored.
/// Must stay well below the proposer window.
pub const FUTURE_BOUND_MILLIS: i64 = 1_000;

/// Maximum size of a warp message payload (256 KiB)
pub const MAX_WARP_MESSAGE_SIZE: usize = 256 * 1024;
/// Maximum number of warp-emitting transactions in a single block
pub const MAX_WARP_MESSAGES: usize = 64;
/// Number of chunks stored for an incoming warp message.
/// Incoming messages are queried by transaction id from the surrounding framework.
pub const MAX_INCOMING_WARP_CHUNKS: u16 = 0;
/// Maximum number of chunks stored for an outgoing warp message.
/// Outgoing records are queried by transaction id across ranges,
/// so this cannot be changed over time.
pub const MAX_OUTGOING_WARP_CHUNKS: u16 = 4;

/// Upper bound for the chunk count declared on a single state key
pub const MAX_KEY_CHUNKS: u16 = 1024;

/// Damping factor applied to the last unit price when suggesting a fee
pub const FEE_SCALER: f64 = 0.8;

/// Maximum size of a warp message signature blob
pub const MAX_WARP_SIGNATURE_SIZE: u32 = 4 * 1024;

/// `valid_range` value meaning "always valid"
pub const ALWAYS_VALID: (i64, i64) = (-1, -1);
