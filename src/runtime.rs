//! Async driver for a navigator.
//!
//! The `Navigator` owns the controller, the surface and the backend. Events
//! arrive from [`NavigatorHandle`]s; commands returned by the controller run
//! as tokio tasks whose results come back as events. All state mutation
//! happens on the task running the navigator loop.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::api::NavigatorBackend;
use crate::config::NavigatorConfig;
use crate::controller::{NavCommand, NavEvent, VisualizationController};
use crate::surface::DisplaySurface;

/// Sends events to a running navigator. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NavigatorHandle {
    tx: mpsc::UnboundedSender<NavEvent>,
}

impl NavigatorHandle {
    /// Queue an event. Returns false when the navigator has stopped.
    pub fn send(&self, event: NavEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

pub struct Navigator<S: DisplaySurface> {
    controller: VisualizationController,
    backend: Arc<dyn NavigatorBackend>,
    surface: S,
    events: mpsc::UnboundedReceiver<NavEvent>,
    events_open: bool,
    tasks: JoinSet<NavEvent>,
}

impl<S: DisplaySurface> Navigator<S> {
    pub fn new(
        config: &NavigatorConfig,
        backend: Arc<dyn NavigatorBackend>,
        surface: S,
    ) -> (Self, NavigatorHandle) {
        let (tx, events) = mpsc::unbounded_channel();
        let navigator = Self {
            controller: VisualizationController::new(config),
            backend,
            surface,
            events,
            events_open: true,
            tasks: JoinSet::new(),
        };
        (navigator, NavigatorHandle { tx })
    }

    pub fn controller(&self) -> &VisualizationController {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Requests still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Apply one event, redraw and launch the resulting commands.
    pub fn dispatch(&mut self, event: NavEvent) {
        let outcome = self.controller.handle_event(event);
        if !outcome.effects.is_empty() {
            self.surface.apply(&self.controller, outcome.effects);
        }
        for command in outcome.commands {
            self.spawn(command);
        }
    }

    fn spawn(&mut self, command: NavCommand) {
        let backend = Arc::clone(&self.backend);
        match command {
            NavCommand::FetchDiagram { token, request } => {
                self.tasks.spawn(async move {
                    let result = backend.fetch_diagram(&request).await;
                    NavEvent::DiagramLoaded { token, result }
                });
            }
            NavCommand::FetchFilterOptions => {
                self.tasks.spawn(async move {
                    NavEvent::FilterOptionsLoaded(backend.fetch_filter_options().await)
                });
            }
            NavCommand::FetchUnitProblems {
                token,
                unit,
                filters,
            } => {
                self.tasks.spawn(async move {
                    let result = backend.fetch_unit_problems(&unit, &filters).await;
                    NavEvent::UnitProblemsLoaded {
                        token,
                        unit,
                        result,
                    }
                });
            }
            NavCommand::ClearServerCache => {
                self.tasks.spawn(async move {
                    NavEvent::CacheCleared(backend.clear_server_cache().await)
                });
            }
        }
    }

    /// Take every queued handle event without waiting.
    fn drain_queued(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
        }
    }

    /// Wait for the next finished request and apply its result.
    ///
    /// Returns false when nothing is in flight.
    pub async fn next_result(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(Ok(event)) => {
                self.dispatch(event);
                true
            }
            Some(Err(e)) => {
                tracing::error!("Navigator request task failed: {}", e);
                true
            }
            None => false,
        }
    }

    /// Process queued events and in-flight requests until both are empty.
    pub async fn settle(&mut self) {
        loop {
            self.drain_queued();
            if !self.next_result().await {
                break;
            }
        }
        self.drain_queued();
    }

    /// Start the navigator and run until every handle is dropped and all
    /// requests have finished. Returns the navigator for inspection.
    pub async fn run(mut self) -> Self {
        tracing::info!("Navigator started");
        self.dispatch(NavEvent::Start);

        loop {
            if !self.events_open && self.tasks.is_empty() {
                break;
            }

            tokio::select! {
                event = self.events.recv(), if self.events_open => match event {
                    Some(event) => self.dispatch(event),
                    None => {
                        tracing::debug!("All navigator handles dropped");
                        self.events_open = false;
                    }
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => match joined {
                    Ok(event) => self.dispatch(event),
                    Err(e) => tracing::error!("Navigator request task failed: {}", e),
                },
                else => break,
            }
        }

        tracing::info!("Navigator stopped");
        self
    }
}
