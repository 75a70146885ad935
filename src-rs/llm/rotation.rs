/// Round-robin over a fixed list. Indices handed out are 1-based.
#[derive(Clone, Debug)]
pub struct CyclicRotator<T> {
    items: Vec<T>,
    next: usize,
}

impl<T> CyclicRotator<T> {
    /// Returns `None` for an empty list; whether that is fatal is up to the caller.
    pub fn new(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self { items, next: 0 })
    }

    pub fn next(&mut self) -> (usize, &T) {
        let idx = self.next;
        self.next = (idx + 1) % self.items.len();
        (idx + 1, &self.items[idx])
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
