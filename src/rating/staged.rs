//! Committed / staged / scratch value cell
//!
//! A [`Staged`] value separates what is published (`committed`), what a
//! preview has proposed (`staged`), and what is still being computed
//! (`scratch`). Reads never move a value between these slots.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Staged<T> {
    committed: T,
    staged: Option<T>,
    scratch: T,
}

impl<T: Copy + Default> Staged<T> {
    pub fn new(value: T) -> Self {
        Self {
            committed: value,
            staged: None,
            scratch: T::default(),
        }
    }

    /// Read the value; `temporary` prefers a staged value over the committed one
    pub fn get(&self, temporary: bool) -> T {
        if temporary {
            self.staged.unwrap_or(self.committed)
        } else {
            self.committed
        }
    }

    /// Stage a value, and also commit it unless `temporary`
    pub fn set(&mut self, value: T, temporary: bool) {
        if temporary {
            self.staged = Some(value);
        } else {
            self.committed = value;
            self.staged = None;
        }
    }

    /// Promote a pending staged value to committed
    pub fn commit(&mut self) -> bool {
        match self.staged.take() {
            Some(value) => {
                self.committed = value;
                true
            }
            None => false,
        }
    }

    /// Drop a pending staged value
    pub fn discard(&mut self) {
        self.staged = None;
    }

    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub fn scratch(&self) -> T {
        self.scratch
    }

    pub fn set_scratch(&mut self, value: T) {
        self.scratch = value;
    }

    /// Return the scratch value and reset it to `T::default()`
    pub fn take_scratch(&mut self) -> T {
        std::mem::take(&mut self.scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_set_does_not_commit() {
        let mut cell = Staged::new(10.0);
        cell.set(12.0, true);

        assert_eq!(cell.get(false), 10.0);
        assert_eq!(cell.get(true), 12.0);
        assert!(cell.is_staged());
    }

    #[test]
    fn test_permanent_set_commits_and_clears_stage() {
        let mut cell = Staged::new(10.0);
        cell.set(12.0, true);
        cell.set(15.0, false);

        assert_eq!(cell.get(false), 15.0);
        assert_eq!(cell.get(true), 15.0);
        assert!(!cell.is_staged());
    }

    #[test]
    fn test_commit_and_discard() {
        let mut cell = Staged::new(1u32);
        assert!(!cell.commit());

        cell.set(2, true);
        assert!(cell.commit());
        assert_eq!(cell.get(false), 2);

        cell.set(3, true);
        cell.discard();
        assert_eq!(cell.get(true), 2);
    }

    #[test]
    fn test_scratch_is_independent() {
        let mut cell = Staged::new(5.0);
        cell.set_scratch(7.5);

        assert_eq!(cell.get(false), 5.0);
        assert_eq!(cell.get(true), 5.0);
        assert_eq!(cell.take_scratch(), 7.5);
        assert_eq!(cell.scratch(), 0.0);
    }
}
