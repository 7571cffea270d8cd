//! Read-only query interface over stored records.

use crate::bac::BacSample;
use crate::error::DatabaseError;
use crate::model::{Drinker, Keg, PourRecord};

/// Read-only repository the analytics callers load records from.
///
/// Implementations return plain values; any caching is the implementor's
/// concern.
pub trait PourSource {
    /// Look up a drinker by id.
    fn drinker(&self, user_id: i64) -> Result<Option<Drinker>, DatabaseError>;

    /// Valid pours of one drinker, ascending by id.
    fn pours_for_user(&self, user_id: i64) -> Result<Vec<PourRecord>, DatabaseError>;

    /// Valid pours of every drinker, ascending by id.
    fn all_pours(&self) -> Result<Vec<PourRecord>, DatabaseError>;

    /// Most recent BAC sample of one drinker.
    fn latest_sample(&self, user_id: i64) -> Result<Option<BacSample>, DatabaseError>;

    /// Most recent BAC sample of every drinker that has one.
    fn latest_samples(&self) -> Result<Vec<(i64, BacSample)>, DatabaseError>;

    fn kegs(&self) -> Result<Vec<Keg>, DatabaseError>;
}
