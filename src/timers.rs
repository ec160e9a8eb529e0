//! Virtual-clock timers with round-id cancellation.
//!
//! Every delayed transition is stamped with the [`RoundId`] that was current
//! when it was scheduled. Owners bump their round whenever a question,
//! session or reset makes older callbacks meaningless, and drop anything
//! that comes due carrying a stale round.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoundId(pub u64);

impl RoundId {
    #[inline]
    #[must_use]
    pub fn next(self) -> Self {
        RoundId(self.0 + 1)
    }
}

#[derive(Debug, Clone)]
struct Pending<E> {
    due_ms: u64,
    seq: u64,
    round: RoundId,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now_ms: u64,
    seq: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule(&mut self, delay_ms: u64, round: RoundId, event: E) {
        self.seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms,
            seq: self.seq,
            round,
            event,
        });
    }

    /// Remove and return the earliest event due at or before `until_ms`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(RoundId, E)> {
        let pos = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, _)| i)?;
        let p = self.pending.swap_remove(pos);
        self.now_ms = self.now_ms.max(p.due_ms);
        Some((p.round, p.event))
    }

    /// Pop the next due event whose round matches `current`, silently
    /// discarding stale ones along the way.
    pub fn pop_current(&mut self, until_ms: u64, current: RoundId) -> Option<E> {
        while let Some((round, event)) = self.pop_due(until_ms) {
            if round == current {
                return Some(event);
            }
            debug!("[timers] dropping stale timer from round {} (current {})", round.0, current.0);
        }
        None
    }

    #[inline]
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
