//! Grouping of page images into fixed-capacity grid pages
//!
//! A small state machine: `Empty -> Filling -> Full` per page, then back
//! to `Empty` once the full page is emitted, and `Flushed` after the
//! final (possibly short) page has been handed out.

/// Fill state of the page currently being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    /// No entries on the current page
    Empty,
    /// Between 1 and capacity - 1 entries
    Filling,
    /// Exactly capacity entries; transient, the page is emitted immediately
    Full,
    /// End of input reached, nothing more is accepted
    Flushed,
}

/// One item assigned to a slot
#[derive(Debug, Clone, PartialEq)]
pub struct GridEntry<T> {
    pub item: T,
    /// Row-major slot index, unique within its page
    pub slot_index: usize,
}

/// A completed grid page
#[derive(Debug, Clone, PartialEq)]
pub struct GridPage<T> {
    /// 1-based page number within its intermediate document
    pub number: usize,
    pub entries: Vec<GridEntry<T>>,
}

impl<T> GridPage<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assigns incoming items to slots and emits pages as they fill up
#[derive(Debug)]
pub struct PageAccumulator<T> {
    capacity: usize,
    state: FillState,
    pending: Vec<GridEntry<T>>,
    next_number: usize,
}

impl<T> PageAccumulator<T> {
    /// Create an accumulator for pages of `capacity` slots (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: FillState::Empty,
            pending: Vec::with_capacity(capacity),
            next_number: 1,
        }
    }

    pub fn state(&self) -> FillState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pages emitted so far
    pub fn emitted(&self) -> usize {
        self.next_number - 1
    }

    /// Place `item` in the next free slot.
    ///
    /// Returns the completed page when this item fills it. Items pushed
    /// after [`finish`](Self::finish) are dropped with a warning.
    pub fn push(&mut self, item: T) -> Option<GridPage<T>> {
        if self.state == FillState::Flushed {
            log::warn!("Grid page accumulator received an item after the final flush");
            return None;
        }

        let slot_index = self.pending.len();
        self.pending.push(GridEntry { item, slot_index });

        if self.pending.len() == self.capacity {
            self.state = FillState::Full;
            let page = self.take_page();
            self.state = FillState::Empty;
            Some(page)
        } else {
            self.state = FillState::Filling;
            None
        }
    }

    /// End of input: emit the short final page, if any, and stop accepting
    /// items.
    pub fn finish(&mut self) -> Option<GridPage<T>> {
        let page = match self.state {
            FillState::Filling => Some(self.take_page()),
            _ => None,
        };
        self.state = FillState::Flushed;
        page
    }

    fn take_page(&mut self) -> GridPage<T> {
        let entries = std::mem::replace(&mut self.pending, Vec::with_capacity(self.capacity));
        let number = self.next_number;
        self.next_number += 1;
        GridPage { number, entries }
    }
}

/// Group `items` into pages of `capacity` slots
pub fn paginate<T>(items: impl IntoIterator<Item = T>, capacity: usize) -> Vec<GridPage<T>> {
    let mut accumulator = PageAccumulator::new(capacity);
    let mut pages: Vec<GridPage<T>> = items
        .into_iter()
        .filter_map(|item| accumulator.push(item))
        .collect();
    pages.extend(accumulator.finish());
    pages
}
