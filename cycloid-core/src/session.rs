//! Drawing-session state machine
//!
//! Tracks whether a physical drawing motion is in progress. The state
//! machine is explicit, finite, and deterministic; external mode
//! loops poll [`DrawState::is_drawing`] to avoid issuing overlapping
//! commands.

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawState {
    /// No motion in progress; new commands accepted
    #[default]
    Idle,
    /// A move is being planned (speeds computed, axes configured)
    Planning,
    /// Both axes are being driven toward their targets
    Running,
    /// Emergency stop in progress; axes braking to zero
    Stopping,
}

/// Events that can trigger session transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawEvent {
    /// A caller asked for a move; planning begins
    MoveRequested,
    /// Axes are configured and motion polling begins
    MoveStarted,
    /// Both axes reached their targets and were re-homed
    MoveCompleted,
    /// Emergency stop requested
    StopRequested,
    /// Emergency stop finished; axes re-homed and disabled
    StopCompleted,
}

impl DrawState {
    /// Whether a drawing motion is in progress
    ///
    /// True from the moment a move is requested until completion or
    /// the end of an emergency stop.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self,
            DrawState::Planning | DrawState::Running | DrawState::Stopping
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: DrawEvent) -> Self {
        use DrawEvent::*;
        use DrawState::*;

        match (self, event) {
            // A new request re-enters planning, also when retargeting
            // a move already in flight
            (Idle, MoveRequested) => Planning,
            (Running, MoveRequested) => Planning,

            (Planning, MoveStarted) => Running,
            (Running, MoveCompleted) => Idle,

            // The stop path wins from anywhere except a stop already
            // in flight
            (Idle, StopRequested) => Stopping,
            (Planning, StopRequested) => Stopping,
            (Running, StopRequested) => Stopping,
            (Stopping, StopCompleted) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
