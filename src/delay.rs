#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(Ticket, T)>,
    generation: u64,
}

impl<T: Clone> Debounced<T> {
    pub fn new(value: T) -> Self {
        Self {
            settled: value,
            pending: None,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn propose(&mut self, value: T) -> Ticket {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.pending = Some((ticket, value));
        ticket
    }

    /// Applies the pending value if `ticket` is still the latest proposal.
    pub fn settle(&mut self, ticket: Ticket) -> Option<T> {
        match self.pending.take() {
            Some((pending, value)) if pending == ticket => {
                self.settled = value.clone();
                Some(value)
            }
            other => {
                self.pending = other;
                None
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverTransition {
    pub ticket: Ticket,
    pub delay_ms: u32,
}

#[derive(Clone, Debug)]
pub struct HoverIntent {
    hovered: bool,
    pending: Option<(Ticket, bool)>,
    generation: u64,
    enter_delay_ms: u32,
    leave_delay_ms: u32,
}

impl HoverIntent {
    pub fn new(enter_delay_ms: u32, leave_delay_ms: u32) -> Self {
        Self {
            hovered: false,
            pending: None,
            generation: 0,
            enter_delay_ms,
            leave_delay_ms,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn enter(&mut self) -> HoverTransition {
        self.schedule(true, self.enter_delay_ms)
    }

    pub fn leave(&mut self) -> HoverTransition {
        self.schedule(false, self.leave_delay_ms)
    }

    fn schedule(&mut self, hovered: bool, delay_ms: u32) -> HoverTransition {
        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.pending = Some((ticket, hovered));
        HoverTransition { ticket, delay_ms }
    }

    /// Returns the new hover state when `ticket` is the latest transition and
    /// it actually flips the state.
    pub fn settle(&mut self, ticket: Ticket) -> Option<bool> {
        let (pending, hovered) = self.pending?;
        if pending != ticket {
            return None;
        }

        self.pending = None;
        if hovered == self.hovered {
            return None;
        }

        self.hovered = hovered;
        Some(hovered)
    }
}
