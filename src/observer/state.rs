// Match-to-event state machine
use super::events::ObserverEvent;
use crate::template_matching::{Location, MatchResult};

/// Whether the template was seen on the previous tick, and where
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Absent,
    Present(Location),
}

impl Presence {
    pub fn last_found(&self) -> Option<Location> {
        match *self {
            Presence::Absent => None,
            Presence::Present(loc) => Some(loc),
        }
    }

    /// Classify one tick's result against this state.
    ///
    /// Returns the next state and at most one event:
    /// - Absent + found      -> FOUND(new), Present(new)
    /// - Present + same spot -> nothing
    /// - Present + new spot  -> MOVED(new), Present(new)
    /// - Present + not found -> LOST(last), Absent
    /// - Absent + not found  -> nothing
    pub fn advance(self, result: &MatchResult, threshold: f64) -> (Presence, Option<ObserverEvent>) {
        let found = result.similarity >= threshold;

        match (self, found) {
            (Presence::Absent, true) => (
                Presence::Present(result.location),
                Some(ObserverEvent::Found(result.location)),
            ),
            (Presence::Present(last), true) if last == result.location => (self, None),
            (Presence::Present(_), true) => (
                Presence::Present(result.location),
                Some(ObserverEvent::Moved(result.location)),
            ),
            (Presence::Present(last), false) => (Presence::Absent, Some(ObserverEvent::Lost(last))),
            (Presence::Absent, false) => (Presence::Absent, None),
        }
    }
}
