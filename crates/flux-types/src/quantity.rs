use std::fmt;

use serde::{Deserialize, Serialize};

/// A stored amount or a transfer request.
///
/// Signed so that a negative request can be observed and rejected by the
/// container instead of being silently unrepresentable.
pub type Amount = i64;

/// Point-in-time view of a container's amount and capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantityState {
    pub amount: Amount,
    pub capacity: Amount,
}

impl QuantityState {
    pub fn new(amount: Amount, capacity: Amount) -> Self {
        Self { amount, capacity }
    }

    /// Free space left before the capacity is reached. Never negative.
    pub fn room(&self) -> Amount {
        self.capacity.saturating_sub(self.amount).max(0)
    }

    /// Returns `true` if `0 <= amount <= capacity`.
    pub fn is_within_bounds(&self) -> bool {
        (0..=self.capacity).contains(&self.amount)
    }

    /// Clamp `value` into `[0, capacity]`.
    pub fn clamp_amount(&self, value: Amount) -> Amount {
        value.clamp(0, self.capacity.max(0))
    }
}

impl fmt::Display for QuantityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.amount, self.capacity)
    }
}

/// Per-operation transfer ceilings of a single facet.
///
/// A limit of zero (or less) disables that direction for the facet. A
/// direction left out when deserializing is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetLimits {
    pub max_insert: Amount,
    pub max_extract: Amount,
}

impl FacetLimits {
    /// Both directions disabled.
    pub const NONE: Self = Self {
        max_insert: 0,
        max_extract: 0,
    };

    /// No per-operation ceiling in either direction.
    pub const UNLIMITED: Self = Self {
        max_insert: Amount::MAX,
        max_extract: Amount::MAX,
    };

    pub const fn new(max_insert: Amount, max_extract: Amount) -> Self {
        Self {
            max_insert,
            max_extract,
        }
    }

    /// Same ceiling for insertion and extraction.
    pub const fn symmetric(limit: Amount) -> Self {
        Self::new(limit, limit)
    }

    pub const fn insert_only(max_insert: Amount) -> Self {
        Self::new(max_insert, 0)
    }

    pub const fn extract_only(max_extract: Amount) -> Self {
        Self::new(0, max_extract)
    }

    pub const fn supports_insertion(&self) -> bool {
        self.max_insert > 0
    }

    pub const fn supports_extraction(&self) -> bool {
        self.max_extract > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_never_negative() {
        assert_eq!(QuantityState::new(3, 10).room(), 7);
        assert_eq!(QuantityState::new(10, 10).room(), 0);
        // Capacity shrank below the stored amount.
        assert_eq!(QuantityState::new(12, 10).room(), 0);
    }

    #[test]
    fn bounds_check() {
        assert!(QuantityState::new(0, 0).is_within_bounds());
        assert!(QuantityState::new(10, 10).is_within_bounds());
        assert!(!QuantityState::new(11, 10).is_within_bounds());
        assert!(!QuantityState::new(-1, 10).is_within_bounds());
    }

    #[test]
    fn clamp_amount_into_range() {
        let state = QuantityState::new(0, 10);
        assert_eq!(state.clamp_amount(-5), 0);
        assert_eq!(state.clamp_amount(5), 5);
        assert_eq!(state.clamp_amount(50), 10);
    }

    #[test]
    fn limit_constructors() {
        assert_eq!(FacetLimits::symmetric(4), FacetLimits::new(4, 4));
        assert!(FacetLimits::insert_only(4).supports_insertion());
        assert!(!FacetLimits::insert_only(4).supports_extraction());
        assert!(!FacetLimits::extract_only(4).supports_insertion());
        assert!(!FacetLimits::NONE.supports_insertion());
        assert!(FacetLimits::UNLIMITED.supports_extraction());
        assert!(!FacetLimits::new(-1, 0).supports_insertion());
    }

    #[test]
    fn display_state() {
        assert_eq!(QuantityState::new(3, 10).to_string(), "3/10");
    }
}
