use std::collections::HashSet;
use std::sync::{Arc, RwLock};

const EOL: &str = "\r\n";

/// Seats per room, fixed for the lifetime of the process.
pub const SEATS_PER_ROOM: u32 = 20;

/// Outcome of a booking attempt. INVALID dominates NOT_AVAILABLE: an
/// out-of-range index in a batch that would also have collided still
/// reports INVALID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    Accepted,
    NotAvailable,
    Invalid,
}

/// The booking state for one (movie, theater) pair: a fixed-size seat
/// bitmap plus a cached rendered listing of currently-available seats,
/// guarded by its own reader/writer lock so bookings against different
/// rooms never contend with one another.
#[derive(Debug)]
pub struct Room {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    available: [bool; SEATS_PER_ROOM as usize],
    rendered: Arc<str>,
}

impl Inner {
    fn rebuild_cache(&mut self) {
        let mut out = String::new();
        let mut first = true;
        for (idx, is_available) in self.available.iter().enumerate() {
            if *is_available {
                if !first {
                    out.push(',');
                }
                out.push_str(&idx.to_string());
                first = false;
            }
        }
        out.push_str(EOL);
        self.rendered = Arc::from(out);
    }
}

impl Room {
    /// A fresh room with every seat available.
    pub fn new() -> Self {
        let mut inner = Inner { available: [true; SEATS_PER_ROOM as usize], rendered: Arc::from("") };
        inner.rebuild_cache();
        Room { inner: RwLock::new(inner) }
    }

    pub fn available(&self) -> Arc<str> {
        self.inner.read().expect("lock poisoned").rendered.clone()
    }

    /// Books every seat in `seats` or none of them.
    pub fn book(&self, seats: &HashSet<u32>) -> BookingOutcome {
        if seats.is_empty() {
            return BookingOutcome::Accepted;
        }

        let mut guard = self.inner.write().expect("lock poisoned");

        if seats.iter().any(|&s| s >= SEATS_PER_ROOM) {
            return BookingOutcome::Invalid;
        }

        if seats.iter().any(|&s| !guard.available[s as usize]) {
            return BookingOutcome::NotAvailable;
        }

        for &s in seats {
            guard.available[s as usize] = false;
        }
        guard.rebuild_cache();
        BookingOutcome::Accepted
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
