/// A value that can be changed ahead of its backing write.
///
/// `begin` snapshots the current value and applies the next one. The cell is
/// busy until `commit` keeps the new value or `rollback` restores the
/// snapshot. A second `begin` while busy is refused; there is no queue.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticCell<T> {
    current: T,
    previous: Option<T>,
}

impl<T: Clone> OptimisticCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            previous: None,
        }
    }

    /// The displayed value, optimistic while busy.
    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn is_busy(&self) -> bool {
        self.previous.is_some()
    }

    /// Snapshots and replaces the value. Returns `false` without any change if busy.
    pub fn begin(&mut self, next: T) -> bool {
        if self.is_busy() {
            return false;
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.previous = Some(previous);
        true
    }

    /// The write succeeded: keep the new value.
    pub fn commit(&mut self) {
        self.previous = None;
    }

    /// The write failed: restore the snapshot.
    pub fn rollback(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.current = previous;
        }
    }

    /// Commits on `Ok`, rolls back on `Err`.
    pub fn settle<R, E>(&mut self, result: &Result<R, E>) {
        match result {
            Ok(_) => self.commit(),
            Err(_) => self.rollback(),
        }
    }

    /// Replaces the value outside of a mutation, e.g. when fresh data arrives.
    /// Ignored while busy so the optimistic value stays visible.
    pub fn refresh(&mut self, value: T) {
        if !self.is_busy() {
            self.current = value;
        }
    }
}
