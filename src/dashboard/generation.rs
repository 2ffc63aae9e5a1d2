//! Request generation tickets.
//!
//! A slot issues a [`Ticket`] when a request starts. When the response
//! arrives, it is applied only if its ticket is still the newest one issued
//! for that slot. Check [`Generation::is_current`] while holding the write
//! lock of the state the response updates.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Generation(AtomicU64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

impl Generation {
    pub(crate) fn issue(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
