use std::fmt::{Display, Formatter};
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Milliseconds since the UNIX epoch.
///
/// This is the only time representation that ever ends up inside a ticket, so it
/// is kept as a plain integer to make encoding exact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        Self(self.0.saturating_add(millis))
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.0).ok()?;

        DateTime::<Utc>::from_timestamp_millis(millis)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(date) => write!(f, "{}", date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a millisecond timestamp: {0:?}")]
pub struct InvalidTimestamp(pub String);

impl FromStr for Timestamp {
    type Err = InvalidTimestamp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u64's own parser accepts a leading '+', the canonical form is digits only
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTimestamp(s.to_owned()));
        }

        s.parse().map(Self).map_err(|_| InvalidTimestamp(s.to_owned()))
    }
}

/// Source of the current time for every validation point.
///
/// `now` has to be called again at every point where a ticket is checked, a value read
/// once and reused would hide expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    fn elapse(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// A clock starting at this clock's current time whose `elapse` only moves itself.
    fn fork(&self) -> Self
    where
        Self: Sized;
}

/// Wall clock time.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = Utc::now().timestamp_millis();

        Timestamp(u64::try_from(millis).unwrap_or(0))
    }

    async fn elapse(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn fork(&self) -> Self {
        Self
    }
}

/// A clock which only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: AtomicU64::new(start.0),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        // fetch_update never fails with a closure that always returns Some
        let _ = self.millis.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(current.saturating_add(millis))
        });
    }

    pub fn set(&self, time: Timestamp) {
        self.millis.store(time.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.millis.load(Ordering::SeqCst))
    }

    async fn elapse(&self, duration: Duration) {
        self.advance(duration);
    }

    fn fork(&self) -> Self {
        Self::new(self.now())
    }
}
