use std::time::{Duration, Instant};

use crate::error::OracleError;

/// Cooperative per-call time budget for oracle backends.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    started: Instant,
    budget: Duration,
}

impl TimeBudget {
    #[must_use]
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// # Errors
    /// [`OracleError::Timeout`] once the budget is spent.
    pub fn check(&self) -> Result<(), OracleError> {
        let elapsed = self.elapsed();
        if elapsed > self.budget {
            Err(OracleError::Timeout {
                budget: self.budget,
                elapsed,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_expires() {
        let budget = TimeBudget::start(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(budget.check(), Err(OracleError::Timeout { .. })));
    }

    #[test]
    fn generous_budget_passes() {
        let budget = TimeBudget::start(Duration::from_secs(60));
        assert!(budget.check().is_ok());
    }
}
