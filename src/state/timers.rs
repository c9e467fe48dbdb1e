use super::booster::AttemptId;

/// Scheduled task handles grouped by booster attempt. Dropping a handle is
/// what cancels it (gloo's `Timeout` clears the browser timer on drop).
pub struct TimerSlots<H> {
    slots: Vec<(AttemptId, Vec<H>)>,
}

impl<H> Default for TimerSlots<H> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<H> TimerSlots<H> {
    /// Installs the tasks for `attempt`; anything scheduled for another
    /// attempt is superseded and cancelled.
    pub fn schedule(&mut self, attempt: AttemptId, handles: Vec<H>) {
        self.slots.retain(|(id, _)| *id == attempt);
        match self.slots.iter_mut().find(|(id, _)| *id == attempt) {
            Some((_, existing)) => existing.extend(handles),
            None => self.slots.push((attempt, handles)),
        }
    }

    pub fn cancel(&mut self, attempt: AttemptId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(id, _)| *id != attempt);
        self.slots.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
impl<H> TimerSlots<H> {
    fn is_scheduled(&self, attempt: AttemptId) -> bool {
        self.slots.iter().any(|(id, _)| *id == attempt)
    }

    fn pending(&self) -> usize {
        self.slots.iter().map(|(_, h)| h.len()).sum()
    }
}
