// Observer module
// Converts per-tick match results into found/moved/lost events for registered
// listeners, either on demand or from a background polling task.

pub mod config;
pub mod events;
pub mod registry;
mod runner;
pub mod state;
mod watcher;


// Re-export the main types for easy access
pub use config::{ObserverConfig, strict_config};
pub use events::{EventKind, ObserverEvent};
pub use registry::{Listener, ListenerRegistry, listener};
pub use state::Presence;
pub use watcher::Observer;
