use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// A single re-armable deadline. Arming replaces any pending deadline.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        Self { period, deadline: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Cancel whatever is pending and fire one period from now.
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.period);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}

/// Resolves at `deadline`, or never when there is none.
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_one_period_after_arming() {
        let mut timer = RefreshTimer::new(Duration::from_secs(300));
        let start = Instant::now();
        timer.arm();

        wait_for(timer.deadline()).await;
        assert_eq!(start.elapsed(), Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_pushes_the_deadline_back() {
        let mut timer = RefreshTimer::new(Duration::from_secs(300));
        let start = Instant::now();
        timer.arm();

        tokio::time::sleep(Duration::from_secs(100)).await;
        timer.arm();

        wait_for(timer.deadline()).await;
        assert_eq!(start.elapsed(), Duration::from_secs(400));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_never_fires() {
        let mut timer = RefreshTimer::new(Duration::from_secs(1));
        timer.arm();
        timer.disarm();
        assert!(!timer.is_armed());

        let fired = tokio::time::timeout(Duration::from_secs(3600), wait_for(timer.deadline())).await;
        assert!(fired.is_err());
    }
}
