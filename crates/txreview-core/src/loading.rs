//! Scoped loading flags

use std::cell::Cell;

/// A "work in progress" flag with scoped acquisition.
///
/// The flag reads as set while at least one [`LoadingGuard`] is alive, so a
/// stale request finishing early cannot clear the flag of a newer one.
#[derive(Debug, Default)]
pub struct LoadingFlag {
    in_flight: Cell<usize>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark work as started; the flag is released when the guard drops
    pub fn acquire(&self) -> LoadingGuard<'_> {
        self.in_flight.set(self.in_flight.get() + 1);
        LoadingGuard { flag: self }
    }

    pub fn is_set(&self) -> bool {
        self.in_flight.get() > 0
    }
}

/// Releases its [`LoadingFlag`] on drop, on every exit path
#[derive(Debug)]
pub struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let count = self.flag.in_flight.get();
        self.flag.in_flight.set(count.saturating_sub(1));
    }
}
