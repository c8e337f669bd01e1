/// Generational handle: `(index, generation)`.
///
/// A slot index may be reused once its previous occupant is released; the
/// generation tells a stale handle apart from the live one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u32, u32);

impl Handle {
    pub fn new(index: u32, generation: u32) -> Self {
        Handle(index, generation)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    pub fn generation(&self) -> u32 {
        self.1
    }
}

/// Slot allocator handing out generational handles.
#[derive(Debug, Default, Clone)]
pub struct HandleAllocator {
    generations: Vec<u32>,
    live: Vec<bool>,
    free: Vec<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> Handle {
        if let Some(index) = self.free.pop() {
            let i = index as usize;
            self.generations[i] = self.generations[i].wrapping_add(1);
            self.live[i] = true;
            return Handle::new(index, self.generations[i]);
        }
        let index = self.generations.len() as u32;
        self.generations.push(0);
        self.live.push(true);
        Handle::new(index, 0)
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        let i = handle.index() as usize;
        self.live.get(i).copied().unwrap_or(false) && self.generations[i] == handle.generation()
    }

    /// Releases `handle`. Returns `false` for stale or unknown handles.
    pub fn release(&mut self, handle: Handle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        self.live[handle.index() as usize] = false;
        self.free.push(handle.index());
        true
    }
}
