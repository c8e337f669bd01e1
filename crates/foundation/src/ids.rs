/// Monotonic numeric id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(u64);

impl Id {
    pub fn new(n: u64) -> Self {
        Id(n)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out ids starting at 1, never reusing one.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after an existing maximum (e.g. seeded fixtures).
    pub fn starting_after(max: u64) -> Self {
        Self {
            next: max.saturating_add(1),
        }
    }

    pub fn next_id(&mut self) -> Id {
        let id = Id(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::IdSequence;

    #[test]
    fn ids_are_monotonic() {
        let mut seq = IdSequence::starting_after(2);
        assert_eq!(seq.next_id().get(), 3);
        assert_eq!(seq.next_id().get(), 4);
    }
}
