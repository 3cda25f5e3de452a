// Observer: template + frame source + matcher, turned into found/moved/lost events
use super::config::ObserverConfig;
use super::events::{EventKind, ObserverEvent};
use super::registry::{Listener, ListenerRegistry, listener};
use super::runner::RunHandle;
use super::state::Presence;
use crate::capture::FrameSource;
use crate::error::{ObserverError, ObserverResult};
use crate::template_matching::{
    DEGENERATE_LOCATION, Location, MatchResult, SqDiffMatcher, Template, TemplateMatcher,
    normalize_similarity,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Duration;

/// Everything one tick needs. Reached by the foreground only while stopped and by
/// the polling task only while running, so there is only ever one writer of `presence`.
pub(crate) struct Tracker {
    template: Template,
    config: ObserverConfig,
    source: Box<dyn FrameSource>,
    matcher: Box<dyn TemplateMatcher>,
    registry: Arc<ListenerRegistry>,
    presence: Presence,
}

impl Tracker {
    /// Capture, match and normalize; no state change
    pub(crate) fn check(&self) -> ObserverResult<MatchResult> {
        if self.template.is_degenerate() {
            return Ok(MatchResult::new(DEGENERATE_LOCATION, 1.0));
        }

        let frame = self.source.grab(self.config.region.as_ref())?;
        let raw = self.matcher.find_best(&frame, &self.template)?;
        let similarity = normalize_similarity(raw.raw_distance, self.template.sq_alpha());

        Ok(MatchResult::new(raw.location, similarity))
    }

    /// One check-and-classify cycle; fires at most one event
    pub(crate) fn tick(&mut self) -> ObserverResult<Option<ObserverEvent>> {
        let result = self.check()?;
        log::debug!(
            "🔍 {}: best match {} (threshold {:.2})",
            self.template.display_name(),
            result.describe(),
            self.config.threshold
        );

        let (next, event) = self.presence.advance(&result, self.config.threshold);
        // State first, so a failing listener cannot leave it stale
        self.presence = next;

        if let Some(event) = &event {
            log::info!("🎯 {}: {}", self.template.display_name(), event);
            self.registry.dispatch(event);
        }

        Ok(event)
    }
}

/// Shared cell holding the tick state
pub(crate) type TrackerCell = Arc<Mutex<Tracker>>;

/// Lock the tick state; a tick that panicked leaves it usable
pub(crate) fn lock_tracker(cell: &TrackerCell) -> MutexGuard<'_, Tracker> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Watches a frame source for a template and notifies listeners on state changes.
///
/// `tick()` checks once, synchronously. `start()` hands the tick state to a
/// background tokio task that ticks once per period until `stop()`. While the
/// task runs, `tick()` and `check()` fail with [`ObserverError::AlreadyRunning`].
/// Listeners may be registered and unregistered at any time.
pub struct Observer {
    registry: Arc<ListenerRegistry>,
    tracker: TrackerCell,
    run: Option<RunHandle>,
}

impl Observer {
    /// Observer using the default [`SqDiffMatcher`]
    pub fn new(
        template: Template,
        config: ObserverConfig,
        source: impl FrameSource + 'static,
    ) -> Self {
        Self::with_matcher(template, config, source, SqDiffMatcher::new())
    }

    pub fn with_matcher(
        template: Template,
        config: ObserverConfig,
        source: impl FrameSource + 'static,
        matcher: impl TemplateMatcher + 'static,
    ) -> Self {
        if template.is_degenerate() {
            log::warn!(
                "⚠️ Template {} has no visible pixels; it will always match at {}",
                template.display_name(),
                DEGENERATE_LOCATION
            );
        }

        let registry = Arc::new(ListenerRegistry::new());
        let tracker = Tracker {
            template,
            config,
            source: Box::new(source),
            matcher: Box::new(matcher),
            registry: registry.clone(),
            presence: Presence::Absent,
        };
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            registry,
            run: None,
        }
    }

    pub fn register(&self, listener: Listener, kind: EventKind) {
        self.registry.register(listener, kind);
    }

    /// Register a closure and get back its handle for a later `unregister`
    pub fn subscribe<F>(&self, kind: EventKind, f: F) -> Listener
    where
        F: Fn(Location) + Send + Sync + 'static,
    {
        let handle = listener(f);
        self.registry.register(handle.clone(), kind);
        handle
    }

    pub fn unregister(&self, listener: &Listener, kind: EventKind) -> ObserverResult<()> {
        self.registry.unregister(listener, kind)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry.count(kind)
    }

    /// Tick state, only while no polling task owns it
    fn stopped_tracker(&self) -> ObserverResult<MutexGuard<'_, Tracker>> {
        if self.run.is_some() {
            return Err(ObserverError::AlreadyRunning);
        }
        Ok(lock_tracker(&self.tracker))
    }

    /// Search the current frame without changing state or firing events
    pub fn check(&self) -> ObserverResult<MatchResult> {
        self.stopped_tracker()?.check()
    }

    /// Search the current frame and fire the listeners for the resulting transition
    pub fn tick(&mut self) -> ObserverResult<Option<ObserverEvent>> {
        self.stopped_tracker()?.tick()
    }

    /// Location of the last match, `None` when not found (or while running)
    pub fn last_found(&self) -> Option<Location> {
        self.stopped_tracker()
            .ok()
            .and_then(|t| t.presence.last_found())
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Start polling every `period` on the current tokio runtime.
    ///
    /// Returns immediately; the first tick happens one full period later.
    pub fn start(&mut self, period: Duration) -> ObserverResult<()> {
        if self.run.is_some() {
            return Err(ObserverError::AlreadyRunning);
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ObserverError::NoRuntime);
        }

        self.run = Some(RunHandle::spawn(self.tracker.clone(), period));
        log::info!("🚀 Observer started (period: {:?})", period);
        Ok(())
    }

    /// Stop polling and wait until the task has exited; no tick fires after this returns.
    ///
    /// The handle is cleared even when the task failed to join (e.g. its runtime shut
    /// down), so the observer can be ticked or started again afterwards.
    pub async fn stop(&mut self) -> ObserverResult<()> {
        let run = self.run.take().ok_or(ObserverError::NotRunning)?;
        let joined = run.cancel().await;
        log::info!("⏹️ Observer stopped");
        joined.map_err(ObserverError::from)
    }
}
