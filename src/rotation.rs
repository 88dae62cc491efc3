//! Round-robin over the loaded predictions.

/// Cycles through a collection, wrapping to the first entry after the last.
#[derive(Clone, Debug)]
pub struct Rotation<T> {
    items: Vec<T>,
    index: usize,
}

impl<T> Default for Rotation<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
        }
    }
}

impl<T> Rotation<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, index: 0 }
    }

    /// Swap in a new collection. The index survives when still in range.
    pub fn replace(&mut self, items: Vec<T>) {
        if self.index >= items.len() {
            self.index = 0;
        }
        self.items = items;
    }

    /// Move to the next entry and return it; `None` while empty.
    pub fn advance(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.items.len();
        self.items.get(self.index)
    }

    pub fn current(&self) -> Option<&T> {
        self.items.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
