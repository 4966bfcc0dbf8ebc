//! Call-scoped recursion bookkeeping

use crate::error::{ForecastError, Result};

/// Activation counter and depth guard for exactly one forecast invocation
#[derive(Debug)]
pub struct RecursionContext {
    calls: u64,
    depth: usize,
    peak_depth: usize,
    max_depth: usize,
}

impl RecursionContext {
    /// Create a fresh context allowing `max_depth` nested activations
    pub fn new(max_depth: usize) -> Self {
        Self {
            calls: 0,
            depth: 0,
            peak_depth: 0,
            max_depth,
        }
    }

    /// Record the start of an activation.
    ///
    /// Every activation counts, including ones answered from a cache.
    pub fn enter(&mut self) -> Result<()> {
        self.calls += 1;
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ForecastError::DepthExceeded {
                depth: self.depth,
                limit: self.max_depth,
            });
        }
        self.peak_depth = self.peak_depth.max(self.depth);
        Ok(())
    }

    /// Record the end of an activation
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Activations recorded so far
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Deepest nesting reached so far
    pub fn peak_depth(&self) -> usize {
        self.peak_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_depth() {
        let mut ctx = RecursionContext::new(3);
        ctx.enter().unwrap();
        ctx.enter().unwrap();
        ctx.leave();
        ctx.enter().unwrap();
        ctx.leave();
        ctx.leave();

        assert_eq!(ctx.calls(), 3);
        assert_eq!(ctx.peak_depth(), 2);
    }

    #[test]
    fn test_depth_limit() {
        let mut ctx = RecursionContext::new(2);
        ctx.enter().unwrap();
        ctx.enter().unwrap();

        let err = ctx.enter().unwrap_err();
        assert!(matches!(
            err,
            ForecastError::DepthExceeded { depth: 3, limit: 2 }
        ));
    }
}
