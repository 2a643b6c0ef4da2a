// vim: tw=80
use std::sync::atomic::{AtomicUsize, Ordering};

/// How many times an expectation may be, and has been, matched.
#[derive(Debug)]
pub(crate) struct Times {
    /// How many times has the expectation already been called?
    count: AtomicUsize,
    min: AtomicUsize,
    max: AtomicUsize,
}

impl Times {
    /// Record one more call.
    pub fn call(&self) -> usize {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn min(&self) -> usize {
        self.min.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::Relaxed)
    }

    /// Allow any number of calls, including none.
    pub fn any(&self) {
        self.min.store(0, Ordering::Relaxed);
        self.max.store(usize::MAX, Ordering::Relaxed);
    }

    /// Has this expectation already been called the maximum allowed number of
    /// times?
    pub fn is_done(&self) -> bool {
        self.count() >= self.max()
    }

    /// Has this expectation already been called the minimum required number of
    /// times?
    pub fn is_satisfied(&self) -> bool {
        self.count() >= self.min()
    }

    pub fn n(&self, n: usize) {
        self.min.store(n, Ordering::Relaxed);
        self.max.store(n, Ordering::Relaxed);
    }

    /// Require at least `n` calls.  An upper bound still at its default of one
    /// is lifted.
    pub fn at_least(&self, n: usize) {
        self.min.store(n, Ordering::Relaxed);
        if self.max() == 1 {
            self.max.store(usize::MAX, Ordering::Relaxed);
        }
    }

    /// Allow at most `n` calls.  A lower bound still at its default of one is
    /// dropped.
    pub fn at_most(&self, n: usize) {
        self.max.store(n, Ordering::Relaxed);
        if self.min() == 1 {
            self.min.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for Times {
    fn default() -> Self {
        // By default, expect exactly one call
        Times {
            count: AtomicUsize::new(0),
            min: AtomicUsize::new(1),
            max: AtomicUsize::new(1),
        }
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn default_is_once() {
        let t = Times::default();
        assert!(!t.is_satisfied());
        assert!(!t.is_done());
        t.call();
        assert!(t.is_satisfied());
        assert!(t.is_done());
    }

    #[test]
    fn at_least_lifts_default_max() {
        let t = Times::default();
        t.at_least(2);
        assert_eq!(usize::MAX, t.max());
        t.n(3);
        t.at_least(1);
        assert_eq!(3, t.max());
    }

    #[test]
    fn at_most_drops_default_min() {
        let t = Times::default();
        t.at_most(4);
        assert_eq!(0, t.min());
        assert!(t.is_satisfied());
        t.n(2);
        t.at_most(3);
        assert_eq!(2, t.min());
    }

    #[test]
    fn never() {
        let t = Times::default();
        t.n(0);
        assert!(t.is_satisfied());
        assert!(t.is_done());
    }
}
