use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::Instant;

/// How long a freshly issued token is trusted.
///
/// Upstream does not report a TTL, so `validity_window` is an assumption and
/// `safety_margin` is subtracted from it to renew ahead of the real expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    validity_window: Duration,
    safety_margin: Duration,
}

impl TokenPolicy {
    /// Fails when the margin would make every token expire on arrival.
    pub fn new(validity_window: Duration, safety_margin: Duration) -> Result<Self> {
        if safety_margin >= validity_window {
            bail!(
                "token safety margin ({}s) must be lower than the validity window ({}s)",
                safety_margin.as_secs_f64(),
                validity_window.as_secs_f64()
            );
        }
        Ok(Self {
            validity_window,
            safety_margin,
        })
    }

    /// Time a token is used before it is renewed.
    pub fn usable_for(&self) -> Duration {
        self.validity_window - self.safety_margin
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub issued_at: Instant,
    pub expires_at: Instant,
}

impl Token {
    pub fn issue(value: String, policy: &TokenPolicy) -> Self {
        let issued_at = Instant::now();
        Self {
            value,
            issued_at,
            expires_at: issued_at + policy.usable_for(),
        }
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_must_be_lower_than_window() {
        assert!(TokenPolicy::new(Duration::from_secs(300), Duration::from_secs(300)).is_err());
        assert!(TokenPolicy::new(Duration::from_secs(300), Duration::from_secs(301)).is_err());
        let policy = TokenPolicy::new(Duration::from_secs(300), Duration::from_secs(15)).unwrap();
        assert_eq!(policy.usable_for(), Duration::from_secs(285));
    }

    #[test]
    fn token_expires_at_window_minus_margin() {
        let policy = TokenPolicy::new(Duration::from_secs(300), Duration::from_secs(15)).unwrap();
        let token = Token::issue("abc".into(), &policy);

        assert_eq!(token.expires_at - token.issued_at, Duration::from_secs(285));
        assert!(token.is_valid_at(token.issued_at + Duration::from_secs(284)));
        // boundary is exclusive
        assert!(!token.is_valid_at(token.expires_at));
        assert!(!token.is_valid_at(token.expires_at + Duration::from_secs(1)));
    }
}
