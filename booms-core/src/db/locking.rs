//! Enforces the global lock-acquisition order of spec.md §5:
//!
//!   1. BOOM assets, sorted by id ascending
//!   2. Holdings, sorted by id ascending
//!   3. User balances (real then virtual), sorted by user_id ascending
//!   4. Treasury (singleton, always last)
//!
//! `LockScope` is a simple state machine that a pipeline advances
//! through as it acquires each class of row lock. It does not run
//! queries itself — it only rejects a pipeline that tries to acquire
//! a lock out of order, so a programming mistake fails loudly in
//! tests rather than silently risking a deadlock in production.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Start,
    Booms,
    Holdings,
    Balances,
    Treasury,
}

#[derive(Debug)]
pub struct LockScope {
    stage: Stage,
}

impl Default for LockScope {
    fn default() -> Self {
        Self::new()
    }
}

impl LockScope {
    pub fn new() -> Self {
        Self { stage: Stage::Start }
    }

    fn advance(&mut self, next: Stage) {
        assert!(
            next >= self.stage,
            "lock acquired out of order: attempted {next:?} after {:?}",
            self.stage
        );
        self.stage = next;
    }

    /// Call before locking one or more BOOM rows (sorted by id ascending).
    pub fn enter_booms(&mut self) {
        self.advance(Stage::Booms);
    }

    /// Call before locking one or more Holding rows (sorted by id ascending).
    pub fn enter_holdings(&mut self) {
        self.advance(Stage::Holdings);
    }

    /// Call before locking a user's real/virtual balance rows. When two
    /// users are involved, the caller must lock the lower `user_id` first.
    pub fn enter_balances(&mut self) {
        self.advance(Stage::Balances);
    }

    /// Call before locking the singleton treasury row — always last.
    pub fn enter_treasury(&mut self) {
        self.advance(Stage::Treasury);
    }
}

/// Returns `(first, second)` ordered so that the lower user id is
/// locked first, per spec.md §5's two-user ordering rule.
pub fn ordered_user_ids(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_forward_progress() {
        let mut scope = LockScope::new();
        scope.enter_booms();
        scope.enter_holdings();
        scope.enter_balances();
        scope.enter_treasury();
    }

    #[test]
    fn allows_skipping_unneeded_stages() {
        let mut scope = LockScope::new();
        scope.enter_balances();
        scope.enter_treasury();
    }

    #[test]
    #[should_panic(expected = "lock acquired out of order")]
    fn rejects_backwards_acquisition() {
        let mut scope = LockScope::new();
        scope.enter_balances();
        scope.enter_booms();
    }

    #[test]
    fn orders_two_users_ascending() {
        assert_eq!(ordered_user_ids(5, 2), (2, 5));
        assert_eq!(ordered_user_ids(2, 5), (2, 5));
    }
}
