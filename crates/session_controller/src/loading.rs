/// Tracks in-flight exchanges. Active while at least one is in flight.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadingIndicator {
    in_flight: usize,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new exchange. Returns true when the indicator turned on.
    pub fn begin(&mut self) -> bool {
        self.in_flight += 1;
        self.in_flight == 1
    }

    /// Record a settled exchange. Returns true when the indicator turned off.
    pub fn end(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        self.in_flight -= 1;
        self.in_flight == 0
    }

    pub fn is_active(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
