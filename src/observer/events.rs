// Event kinds and events fired by the observer
use crate::error::ObserverError;
use crate::template_matching::Location;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Found,
    Lost,
    Moved,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Found, EventKind::Lost, EventKind::Moved];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Found => "found",
            EventKind::Lost => "lost",
            EventKind::Moved => "moved",
        };
        f.write_str(name)
    }
}

impl FromStr for EventKind {
    type Err = ObserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "found" | "on_found" => Ok(EventKind::Found),
            "lost" | "on_lost" => Ok(EventKind::Lost),
            "moved" | "move" | "on_move" => Ok(EventKind::Moved),
            _ => Err(ObserverError::UnknownEventKind {
                name: s.to_string(),
            }),
        }
    }
}

/// A state change, carrying the location listeners receive.
///
/// `Lost` carries the last location the template was seen at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverEvent {
    Found(Location),
    Moved(Location),
    Lost(Location),
}

impl ObserverEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ObserverEvent::Found(_) => EventKind::Found,
            ObserverEvent::Moved(_) => EventKind::Moved,
            ObserverEvent::Lost(_) => EventKind::Lost,
        }
    }

    pub fn location(&self) -> Location {
        match *self {
            ObserverEvent::Found(loc) | ObserverEvent::Moved(loc) | ObserverEvent::Lost(loc) => {
                loc
            }
        }
    }
}

impl fmt::Display for ObserverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.location())
    }
}
