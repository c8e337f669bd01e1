use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

/// Proof that a request was issued through a [`RequestSlot`].
#[derive(Debug, Clone)]
pub struct Ticket {
    seq: u64,
    token: CancelToken,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

/// Latest-wins request slot.
///
/// Beginning a new request cancels the one in flight, so a late response from
/// a superseded request can be recognised and dropped instead of overwriting
/// fresher content.
#[derive(Debug, Default)]
pub struct RequestSlot {
    next_seq: u64,
    current: Option<Ticket>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> Ticket {
        if let Some(prev) = self.current.take() {
            prev.token.cancel();
        }
        self.next_seq = self.next_seq.wrapping_add(1);
        let ticket = Ticket {
            seq: self.next_seq,
            token: CancelToken::new(),
        };
        self.current = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        !ticket.token.is_canceled()
            && self.current.as_ref().is_some_and(|c| c.seq == ticket.seq)
    }

    /// Completes `ticket`. Returns `true` if it was still the current request.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.current = None;
        true
    }

    pub fn cancel(&mut self) {
        if let Some(prev) = self.current.take() {
            prev.token.cancel();
        }
    }
}
