//! Gas metering for authorization checks.

use crate::error::AuthError;

/// Tracks the computational budget of one authorization check.
pub trait GasMeter {
    /// Charge `amount` gas, failing once the budget is exhausted.
    fn consume(&mut self, amount: u64, descriptor: &'static str) -> Result<(), AuthError>;

    fn consumed(&self) -> u64;
}

/// Meter with a hard limit.
///
/// A charge that would exceed the limit fails and is not recorded.
#[derive(Clone, Debug)]
pub struct BasicGasMeter {
    limit: u64,
    consumed: u64,
}

impl BasicGasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.consumed
    }
}

impl GasMeter for BasicGasMeter {
    fn consume(&mut self, amount: u64, descriptor: &'static str) -> Result<(), AuthError> {
        match self.consumed.checked_add(amount) {
            Some(next) if next <= self.limit => {
                self.consumed = next;
                tracing::trace!(amount, consumed = next, descriptor, "gas consumed");
                Ok(())
            }
            _ => Err(AuthError::BudgetExceeded {
                descriptor,
                consumed: self.consumed,
                limit: self.limit,
            }),
        }
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }
}

/// Meter that only counts. For trusted contexts such as genesis tooling.
#[derive(Clone, Debug, Default)]
pub struct InfiniteGasMeter {
    consumed: u64,
}

impl InfiniteGasMeter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GasMeter for InfiniteGasMeter {
    fn consume(&mut self, amount: u64, _descriptor: &'static str) -> Result<(), AuthError> {
        self.consumed = self.consumed.saturating_add(amount);
        Ok(())
    }

    fn consumed(&self) -> u64 {
        self.consumed
    }
}
