//! Outbound ports for the Session Authenticator.

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Current Unix time in seconds (UTC).
    fn now(&self) -> i64;
}

/// System time implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or_else(|_| {
                // Clock before Unix epoch - return 0 rather than panic
                0
            })
    }
}

/// Fixed clock, for tests and replay tooling.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub i64);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> i64 {
        self.0
    }
}
