//! Continuous-refill rate limiting.
//!
//! Each direction of flow is bounded by a bucket that refills linearly over
//! its rate duration and is clamped to its limit. Consuming from one
//! direction credits the opposite direction, so round trips do not starve a
//! bucket. All bucket arithmetic is 256-bit wide; amounts are down-converted
//! to local asset widths only at the asset-transfer boundary, after capacity
//! has been checked.
//!
//! The clock is observed once per operation by the calling handler and
//! threaded through; the helpers here never read it themselves.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Event, Storage, Uint256};
use ntt_messages::{bytes32_to_hex, keccak256, keccak256_parts};

use crate::error::ContractError;
use crate::state::BUCKETS;

/// A continuous-refill credit accumulator bounding a directional flow.
#[cw_serde]
pub struct RateLimitBucket {
    /// Maximum capacity; `0 <= capacity <= limit` at all observation times
    pub limit: Uint256,
    /// Capacity stored at the last mutation
    pub capacity_at_last_tx: Uint256,
    /// Seconds over which a fully drained bucket refills; zero freezes the
    /// stored capacity
    pub rate_duration: u64,
    /// Timestamp of the last mutation
    pub last_tx_timestamp: u64,
}

impl RateLimitBucket {
    /// A new bucket starts at full capacity.
    pub fn new(limit: Uint256, rate_duration: u64, now: u64) -> Self {
        Self {
            limit,
            capacity_at_last_tx: limit,
            rate_duration,
            last_tx_timestamp: now,
        }
    }

    /// Capacity at wall-time `now`: the stored capacity plus the linear
    /// refill since the last mutation, clamped to the limit.
    pub fn capacity_at(&self, now: u64) -> Uint256 {
        if self.rate_duration == 0 {
            return self.capacity_at_last_tx.min(self.limit);
        }
        let elapsed = now.saturating_sub(self.last_tx_timestamp);
        let refill = match self.limit.checked_mul(Uint256::from(elapsed)) {
            Ok(product) => product / Uint256::from(self.rate_duration),
            // the mathematical refill already exceeds any representable
            // capacity
            Err(_) => return self.limit,
        };
        self.limit
            .min(self.capacity_at_last_tx.saturating_add(refill))
    }

    /// Consume `amount` of capacity; `false` leaves the bucket untouched.
    pub fn try_consume(&mut self, now: u64, amount: Uint256) -> bool {
        let capacity = self.capacity_at(now);
        if capacity < amount {
            return false;
        }
        self.capacity_at_last_tx = capacity - amount;
        self.last_tx_timestamp = now;
        true
    }

    /// Credit up to `amount` of capacity, discarding what would exceed the
    /// limit. Returns the amount actually credited.
    pub fn fill(&mut self, now: u64, amount: Uint256) -> Uint256 {
        let capacity = self.capacity_at(now);
        let filled = (self.limit - capacity).min(amount);
        self.capacity_at_last_tx = capacity + filled;
        self.last_tx_timestamp = now;
        filled
    }

    /// Change the limit, preserving how much is already consumed: raising the
    /// limit grows the current capacity by the difference, lowering it caps
    /// the current capacity at the new limit.
    pub fn set_limit(&mut self, now: u64, new_limit: Uint256) {
        let capacity = self.capacity_at(now);
        let old_limit = self.limit;
        self.capacity_at_last_tx = if new_limit > old_limit {
            new_limit.min(capacity.saturating_add(new_limit - old_limit))
        } else {
            capacity.min(new_limit)
        };
        self.limit = new_limit;
        self.last_tx_timestamp = now;
    }

    /// Change the refill window, refreshing the stored capacity first.
    pub fn set_duration(&mut self, now: u64, rate_duration: u64) {
        self.capacity_at_last_tx = self.capacity_at(now);
        self.rate_duration = rate_duration;
        self.last_tx_timestamp = now;
    }
}

// ============================================================================
// Bucket Identifiers
// ============================================================================

/// Id of the single outbound bucket.
pub fn outbound_bucket_id() -> [u8; 32] {
    keccak256(b"ntt:bucket:outbound")
}

/// Id of the inbound bucket for a peer chain.
pub fn inbound_bucket_id(chain: u16) -> [u8; 32] {
    keccak256_parts(&[b"ntt:bucket:inbound", &chain.to_be_bytes()])
}

// ============================================================================
// Storage Helpers
// ============================================================================

/// Load a bucket, failing if it was never configured.
pub fn load_bucket(
    storage: &dyn Storage,
    bucket_id: &[u8; 32],
) -> Result<RateLimitBucket, ContractError> {
    BUCKETS
        .may_load(storage, bucket_id)?
        .ok_or(ContractError::UnknownBucket {
            bucket_id: bytes32_to_hex(bucket_id),
        })
}

/// Load a bucket together with its capacity at `now`.
pub fn capacity_of(
    storage: &dyn Storage,
    bucket_id: &[u8; 32],
    now: u64,
) -> Result<(RateLimitBucket, Uint256), ContractError> {
    let bucket = load_bucket(storage, bucket_id)?;
    let capacity = bucket.capacity_at(now);
    Ok((bucket, capacity))
}

/// Consume capacity from a bucket.
pub fn consume_bucket(
    storage: &mut dyn Storage,
    bucket_id: &[u8; 32],
    now: u64,
    amount: Uint256,
) -> Result<Event, ContractError> {
    let mut bucket = load_bucket(storage, bucket_id)?;
    let capacity = bucket.capacity_at(now);
    if !bucket.try_consume(now, amount) {
        return Err(ContractError::InsufficientCapacity { capacity, amount });
    }
    BUCKETS.save(storage, bucket_id, &bucket)?;
    Ok(Event::new("bucket_consumed")
        .add_attribute("bucket_id", bytes32_to_hex(bucket_id))
        .add_attribute("amount", amount.to_string()))
}

/// Credit capacity to a bucket, discarding any excess over its limit.
pub fn fill_bucket(
    storage: &mut dyn Storage,
    bucket_id: &[u8; 32],
    now: u64,
    amount: Uint256,
) -> Result<Event, ContractError> {
    let mut bucket = load_bucket(storage, bucket_id)?;
    let filled = bucket.fill(now, amount);
    BUCKETS.save(storage, bucket_id, &bucket)?;
    Ok(Event::new("bucket_filled")
        .add_attribute("bucket_id", bytes32_to_hex(bucket_id))
        .add_attribute("amount_requested", amount.to_string())
        .add_attribute("amount_filled", filled.to_string()))
}
