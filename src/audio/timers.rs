#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TimerId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimerId,
    due_ms: f64,
    action: A,
}

/// Delayed actions on a frame-driven clock.
///
/// The clock only moves through [`TimerPool::advance`]. Due timers are drained one at a time with
/// [`TimerPool::pop_due`] in `(due, id)` order, so actions scheduled while draining still fire in
/// the same frame when they are already due.
#[derive(Debug)]
pub(crate) struct TimerPool<A> {
    now_ms: f64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for TimerPool<A> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> TimerPool<A> {
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn schedule(&mut self, delay_ms: f64, action: A) -> TimerId {
        self.schedule_at(self.now_ms + delay_ms.max(0.0), action)
    }

    pub(crate) fn schedule_at(&mut self, due_ms: f64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due_ms, action });
        id
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub(crate) fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub(crate) fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms.max(0.0);
    }

    pub(crate) fn pop_due(&mut self) -> Option<(TimerId, f64, A)> {
        let now = self.now_ms;
        let pos = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= now)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let p = self.pending.swap_remove(pos);
        Some((p.id, p.due_ms, p.action))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/timers.rs"]
mod tests;
