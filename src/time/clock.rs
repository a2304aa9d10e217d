use chrono::{DateTime, Utc};

/// A port that provides the **current instant** for the application.
///
/// # Purpose
/// Token issuing and expiry checks read time through this trait so that:
///
/// - Expiry logic does **not** depend on the process wall clock directly
/// - Tests can pin time and check exact expiry boundaries
///
/// # Typical Implementations
/// - `SystemClock`: Uses the OS clock
/// - [`FixedClock`]: Returns a constant instant (for testing)
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// A [`Clock`] that always returns the same instant.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use postboard::time::clock::{Clock, FixedClock};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(FixedClock::new(at).now(), at);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_given_instant() {
        let at = Utc.with_ymd_and_hms(2025, 10, 2, 8, 30, 0).unwrap();
        let clock = FixedClock::new(at);

        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn clock_trait_object_works() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let clock: Box<dyn Clock> = Box::new(FixedClock::new(at));

        assert_eq!(clock.now(), at);
    }
}
