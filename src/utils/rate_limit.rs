use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

/// Spaces calls at least `min_interval` apart, across every task sharing it.
/// A zero interval disables pacing.
pub struct Pacer {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        let limiter = Quota::with_period(min_interval)
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));
        Self { limiter }
    }

    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    pub fn is_unlimited(&self) -> bool {
        self.limiter.is_none()
    }

    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_calls_are_spaced() {
        let pacer = Pacer::new(Duration::from_millis(50));
        let start = Instant::now();

        pacer.until_ready().await;
        pacer.until_ready().await;
        pacer.until_ready().await;

        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_wait() {
        let pacer = Pacer::new(Duration::ZERO);
        assert!(pacer.is_unlimited());

        let start = Instant::now();
        for _ in 0..10 {
            pacer.until_ready().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
