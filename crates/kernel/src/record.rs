//! Persisted records and partial-update merging.
//!
//! Every resource is a [`Record`] with an opaque string id and a creation
//! timestamp. Updates arrive as a typed [`Patch`]: each field is an `Option`,
//! present means overwrite, absent means keep. [`merge`] is the only path
//! through which a stored record changes.

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

/// A persisted entity instance.
pub trait Record: Clone + Send + Sync + 'static {
    /// Lowercase singular name used in logs and messages (`"book"`).
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Assign the identity of a record that has none yet.
    fn assign_id(&mut self, id: String);

    /// Copy every field that must never change after creation from `original`.
    fn restore_immutable(&mut self, original: &Self);

    /// Refresh the modification timestamp, for records that keep one.
    fn touch(&mut self, _now: OffsetDateTime) {}
}

/// A partial update for records of type `R`.
pub trait Patch<R: Record> {
    /// Overlay the fields this patch carries onto `record`.
    fn apply(self, record: &mut R);

    /// True when the patch names no field at all.
    fn is_empty(&self) -> bool;
}

/// Produce the record to persist for `patch` applied on top of `existing`.
///
/// Fields absent from the patch keep their value, immutable fields are reset
/// to the ones in `existing` and `updated_at` (if any) becomes `now`.
pub fn merge<R, P>(existing: &R, patch: P, now: OffsetDateTime) -> R
where
    R: Record,
    P: Patch<R>,
{
    let mut merged = existing.clone();
    patch.apply(&mut merged);
    merged.restore_immutable(existing);
    merged.touch(now);
    merged
}

/// Current UTC time truncated to microseconds, the precision PostgreSQL keeps,
/// so a record read back compares equal to the one that was written.
pub fn timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Deserialize a nullable field of a patch, distinguishing `null` from absent.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent gives `None`, `null` gives `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize a required-when-present field of a patch: absent is `None`,
/// a value is `Some`, and `null` is rejected.
///
/// Use with `#[serde(default, deserialize_with = "present")]` on an `Option<T>`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
