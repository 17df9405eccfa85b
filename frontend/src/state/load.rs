/// Identifies one in-flight load of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u32);

/// Tracks which load is current so late results can be discarded.
///
/// Every `begin` supersedes the previous ticket. Once the owning view is
/// disposed no ticket is accepted again.
#[derive(Debug, Default)]
pub struct LoadGuard {
    generation: u32,
    in_flight: bool,
    disposed: bool,
}

impl LoadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = true;
        LoadTicket(self.generation)
    }

    /// Returns true when the result for `ticket` should be applied.
    pub fn accept(&mut self, ticket: LoadTicket) -> bool {
        if self.disposed || ticket.0 != self.generation {
            log::debug!("Discarding stale load result {:?}", ticket);
            return false;
        }
        self.in_flight = false;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight && !self.disposed
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.in_flight = false;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
