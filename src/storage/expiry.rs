//! TTL carrier shared by every value kind
//!
//! Each typed value embeds one [`Expiration`] and exposes it through the
//! [`Expirable`] trait. The trait's provided methods do all the work, so a
//! value kind only has to hand out its carrier.
//!
//! ## Semantics
//!
//! - A value is *expired* iff a deadline is set and the wall clock is
//!   strictly past it.
//! - Deadlines are wall-clock [`SystemTime`]s so that EXPIREAT/PEXPIREAT
//!   can take unix timestamps. If the clock moves backwards, remaining
//!   TTLs grow accordingly; nothing here assumes monotonic time.
//! - There is no background sweeper. Expired values are reaped lazily by
//!   the keyspace on the next lookup.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 9999-12-31T23:59:59Z, used when a deadline would overflow `SystemTime`.
const FAR_FUTURE_SECS: u64 = 253_402_300_799;

/// Optional absolute expiration instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expiration {
    /// When the value expires (None = never expires)
    deadline: Option<SystemTime>,
}

impl Expiration {
    /// A carrier with no deadline.
    pub const fn persistent() -> Self {
        Self { deadline: None }
    }

    /// Returns the absolute deadline, if any.
    pub fn deadline(&self) -> Option<SystemTime> {
        self.deadline
    }

    /// Returns true if a deadline is set.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.deadline.is_some()
    }

    /// Checks if the deadline has passed.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    fn is_expired_at(&self, now: SystemTime) -> bool {
        matches!(self.deadline, Some(deadline) if now > deadline)
    }

    /// Time left until the deadline, clamped at zero. `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_at(SystemTime::now())
    }

    fn remaining_at(&self, now: SystemTime) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.duration_since(now).unwrap_or(Duration::ZERO))
    }

    /// Remaining TTL in whole seconds (floor), or -1 without a deadline.
    pub fn ttl_seconds(&self) -> i64 {
        self.remaining()
            .map(|left| i64::try_from(left.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    /// Remaining TTL in whole milliseconds (floor), or -1 without a deadline.
    pub fn ttl_millis(&self) -> i64 {
        self.remaining()
            .map(|left| i64::try_from(left.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    /// Sets the deadline to `now + millis`.
    ///
    /// Zero or negative values are accepted and leave the value already
    /// expired; the next lookup reaps it.
    pub fn set_ttl(&mut self, millis: i64) {
        self.deadline = Some(offset_millis(SystemTime::now(), millis));
    }

    /// Sets the deadline to an absolute instant.
    pub fn set_expiration_at(&mut self, deadline: SystemTime) {
        self.deadline = Some(deadline);
    }

    /// Removes the deadline. Returns true if one was set.
    pub fn clear(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

/// Converts a unix timestamp in milliseconds into a [`SystemTime`].
///
/// Negative timestamps land before the epoch and are always in the past.
pub fn unix_millis(millis: i64) -> SystemTime {
    offset_millis(UNIX_EPOCH, millis)
}

/// Shifts `base` by a signed number of milliseconds, saturating at the
/// representable range.
fn offset_millis(base: SystemTime, millis: i64) -> SystemTime {
    let delta = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        base.checked_add(delta)
            .unwrap_or(UNIX_EPOCH + Duration::from_secs(FAR_FUTURE_SECS))
    } else {
        base.checked_sub(delta).unwrap_or(UNIX_EPOCH)
    }
}

/// Uniform TTL behaviour for every typed value.
///
/// Implementors only provide access to their embedded [`Expiration`].
/// Payload mutators never touch the carrier and these methods never touch
/// the payload.
pub trait Expirable {
    /// The embedded carrier.
    fn expiration(&self) -> &Expiration;

    /// The embedded carrier, mutably.
    fn expiration_mut(&mut self) -> &mut Expiration;

    /// True iff a deadline is set and has passed.
    fn is_expired(&self) -> bool {
        self.expiration().is_expired()
    }

    /// Remaining seconds (floor), -1 when persistent.
    fn ttl_seconds(&self) -> i64 {
        self.expiration().ttl_seconds()
    }

    /// Remaining milliseconds (floor), -1 when persistent.
    fn ttl_millis(&self) -> i64 {
        self.expiration().ttl_millis()
    }

    /// Expires the value `millis` from now; non-positive means immediately.
    fn set_ttl(&mut self, millis: i64) {
        self.expiration_mut().set_ttl(millis);
    }

    /// Expires the value at an absolute instant.
    fn set_expiration_at(&mut self, deadline: SystemTime) {
        self.expiration_mut().set_expiration_at(deadline);
    }

    /// Makes the value persistent. Returns true if a TTL was removed.
    fn clear_ttl(&mut self) -> bool {
        self.expiration_mut().clear()
    }

    /// True if the value carries a TTL.
    fn has_ttl(&self) -> bool {
        self.expiration().is_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistent_never_expires() {
        let exp = Expiration::persistent();
        assert!(!exp.is_set());
        assert!(!exp.is_expired());
        assert_eq!(exp.ttl_seconds(), -1);
        assert_eq!(exp.ttl_millis(), -1);
    }

    #[test]
    fn test_expired_only_strictly_after_deadline() {
        let deadline = UNIX_EPOCH + Duration::from_secs(1_000);
        let mut exp = Expiration::persistent();
        exp.set_expiration_at(deadline);

        assert!(!exp.is_expired_at(deadline - Duration::from_millis(1)));
        assert!(!exp.is_expired_at(deadline));
        assert!(exp.is_expired_at(deadline + Duration::from_nanos(1)));
    }

    #[test]
    fn test_remaining_is_floored() {
        let now = UNIX_EPOCH + Duration::from_secs(50);
        let mut exp = Expiration::persistent();
        exp.set_expiration_at(now + Duration::from_millis(2_999));

        let left = exp.remaining_at(now).unwrap();
        assert_eq!(left.as_secs(), 2);
        assert_eq!(left.as_millis(), 2_999);

        // past deadlines clamp to zero
        assert_eq!(
            exp.remaining_at(now + Duration::from_secs(10)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_set_ttl() {
        let mut exp = Expiration::persistent();
        exp.set_ttl(10_000);
        assert!(exp.is_set());
        assert!(!exp.is_expired());
        let ttl = exp.ttl_seconds();
        assert!((9..=10).contains(&ttl));
        let pttl = exp.ttl_millis();
        assert!((0..=10_000).contains(&pttl));
    }

    #[test]
    fn test_non_positive_ttl_is_already_expired() {
        let mut exp = Expiration::persistent();
        exp.set_ttl(-1);
        assert!(exp.is_expired());

        exp.set_ttl(0);
        std::thread::sleep(Duration::from_millis(1));
        assert!(exp.is_expired());
    }

    #[test]
    fn test_clear() {
        let mut exp = Expiration::persistent();
        assert!(!exp.clear());
        exp.set_ttl(1_000);
        assert!(exp.clear());
        assert_eq!(exp.ttl_seconds(), -1);
    }

    #[test]
    fn test_unix_millis() {
        assert_eq!(unix_millis(0), UNIX_EPOCH);
        assert_eq!(unix_millis(1_500), UNIX_EPOCH + Duration::from_millis(1_500));
        assert!(unix_millis(-5) <= UNIX_EPOCH);
        assert!(unix_millis(i64::MAX) > SystemTime::now());
    }

    #[test]
    fn test_trait_delegates_to_carrier() {
        struct Probe(Expiration);
        impl Expirable for Probe {
            fn expiration(&self) -> &Expiration {
                &self.0
            }
            fn expiration_mut(&mut self) -> &mut Expiration {
                &mut self.0
            }
        }

        let mut probe = Probe(Expiration::persistent());
        assert!(!probe.has_ttl());
        probe.set_ttl(60_000);
        assert!(probe.has_ttl());
        assert!(probe.ttl_millis() > 0);
        assert!(probe.clear_ttl());
        assert_eq!(probe.ttl_millis(), -1);
    }
}
