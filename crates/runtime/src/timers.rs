/// Deterministic fire-once timer queue.
///
/// Key properties:
/// - Total ordering on `(due_ms, id)`; timers due at the same instant fire in
///   scheduling order.
/// - Cancellation does not perturb the order of remaining timers.
/// - Time is supplied by the caller (`now_ms`), never read from a clock, so a
///   session can be replayed exactly.
///
/// Vec-backed: a dashboard holds a handful of pending timers at most.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due_ms: u64,
    id: TimerId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due_ms
            .cmp(&other.due_ms)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Item<T> {
    key: Key,
    task: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    items: Vec<Item<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.iter().filter(|i| !i.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schedules `task` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u32, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Item {
            key: Key {
                due_ms: now_ms.saturating_add(u64::from(delay_ms)),
                id,
            },
            task,
            canceled: false,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.key.id == id && !i.canceled)
        {
            item.canceled = true;
            return true;
        }
        false
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<u64> {
        self.items
            .iter()
            .filter(|i| !i.canceled)
            .map(|i| i.key.due_ms)
            .min()
    }

    /// Pops the earliest timer that is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerId, T)> {
        self.items.retain(|i| !i.canceled);

        let mut best_idx: Option<usize> = None;
        for (idx, item) in self.items.iter().enumerate() {
            if item.key.due_ms > now_ms {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if item.key < self.items[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let item = self.items.swap_remove(idx);
        Some((item.key.id, item.task))
    }
}
