// Panel controller - User-facing transitions over panel state, polling and persistence
use crate::application::drag_controller::DragController;
use crate::application::poll_scheduler::{PollOutcome, PollScheduler};
use crate::application::state_store::PersistenceStore;
use crate::domain::geometry::{PanelSize, Point, Position, Rect, Viewport};
use crate::domain::panel::{PanelState, PollInterval};
use crate::domain::view::{PanelView, ViewInput, render};

/// Where the panel gets drawn. Implementations own the actual widgets.
pub trait PanelSurface: Send {
    fn set_visible(&mut self, visible: bool);

    fn set_minimized(&mut self, minimized: bool);

    fn place(&mut self, position: Position);

    fn set_poll_interval(&mut self, interval: PollInterval);

    fn render(&mut self, view: &PanelView);

    /// Detach the panel for good
    fn remove(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub viewport: Viewport,
    pub panel: PanelSize,
    pub header_height: f64,
    pub anchor_margin: f64,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(1280.0, 800.0),
            panel: PanelSize::new(320.0, 240.0),
            header_height: 44.0,
            anchor_margin: 20.0,
        }
    }
}

pub struct PanelController {
    state: PanelState,
    layout: PanelLayout,
    scheduler: PollScheduler,
    store: PersistenceStore,
    surface: Box<dyn PanelSurface>,
    drag: DragController,
    last_rendered: Option<u64>,
}

impl PanelController {
    /// Restores persisted state and resumes polling if the panel was left open.
    pub fn new(
        scheduler: PollScheduler,
        store: PersistenceStore,
        surface: Box<dyn PanelSurface>,
        layout: PanelLayout,
    ) -> Self {
        let mut state = store.load();
        // The viewport may have shrunk since the position was saved
        state.position = state
            .position
            .map(|p| p.clamp_to(layout.viewport, layout.panel));

        let mut controller = Self {
            state,
            layout,
            scheduler,
            store,
            surface,
            drag: DragController::new(),
            last_rendered: None,
        };

        let origin = controller.origin();
        controller.surface.place(origin);
        controller.surface.set_minimized(state.minimized);
        controller.surface.set_poll_interval(state.poll_interval);
        controller.surface.render(&render(ViewInput::Loading));
        controller.surface.set_visible(state.is_visible());
        if state.is_visible() {
            controller.scheduler.start(state.poll_interval);
        }

        tracing::info!(
            "Panel initialised (visible: {}, minimized: {}, every {}ms)",
            state.is_visible(),
            state.minimized,
            state.poll_interval.as_millis()
        );
        controller
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn show(&mut self) {
        self.state.show();
        self.store.save(&self.state);
        self.surface.set_visible(true);
        if !self.scheduler.is_running() {
            self.scheduler.start(self.state.poll_interval);
        }
        tracing::info!("Panel shown");
    }

    pub fn hide(&mut self) {
        self.state.hide();
        self.store.save(&self.state);
        self.surface.set_visible(false);
        self.scheduler.stop();
        if self.drag.is_dragging() {
            self.drag.finish();
            tracing::debug!("Drag cancelled by hide");
        }
        tracing::info!("Panel hidden");
    }

    pub fn toggle_visibility(&mut self) {
        if self.state.is_visible() {
            self.hide();
        } else {
            self.show();
        }
    }

    /// Minimizing only collapses the body; polling keeps running.
    pub fn toggle_minimize(&mut self) {
        let minimized = self.state.toggle_minimized();
        self.store.save(&self.state);
        self.surface.set_minimized(minimized);
        tracing::debug!("Panel minimized: {}", minimized);
    }

    /// Out-of-set values are clamped to the nearest offered interval.
    pub fn set_poll_interval(&mut self, ms: i64) -> PollInterval {
        let interval = PollInterval::from_millis(ms).unwrap_or_else(|e| {
            let nearest = PollInterval::nearest(ms);
            tracing::warn!("Rejected {}, using {}ms", e, nearest.as_millis());
            nearest
        });

        self.state.set_poll_interval(interval);
        self.store.save(&self.state);
        self.surface.set_poll_interval(interval);
        if let Some(previous) = self.scheduler.interval() {
            self.scheduler.restart(interval);
            tracing::debug!(
                "Polling every {}ms (was {}ms)",
                interval.as_millis(),
                previous.as_millis()
            );
        }
        interval
    }

    /// Places the panel explicitly, clamped so it stays fully on screen.
    pub fn set_position(&mut self, left: f64, top: f64) -> Position {
        let position = self.move_panel(Position::new(left, top));
        self.store.save(&self.state);
        position
    }

    /// Manual refresh; ignored while hidden.
    pub fn refresh(&mut self) {
        if self.state.is_visible() {
            self.scheduler.fetch_once();
        }
    }

    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        if !self.state.is_visible() {
            return false;
        }
        let header = Rect::new(self.origin(), self.layout.panel.width, self.layout.header_height);
        self.drag.begin(pointer, header)
    }

    /// Display-only move; the position is persisted on release.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Position> {
        let target = self.drag.update(pointer)?;
        Some(self.move_panel(target))
    }

    pub fn pointer_up(&mut self) {
        if self.drag.finish() {
            self.store.save(&self.state);
            tracing::debug!("Panel dropped at {:?}", self.state.position);
        }
    }

    /// Re-clamps an explicit position against the new viewport.
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        self.layout.viewport = viewport;
        match self.state.position {
            Some(position) => {
                let clamped = position.clamp_to(viewport, self.layout.panel);
                if clamped != position {
                    self.set_position(clamped.left, clamped.top);
                }
            }
            None => {
                let origin = self.origin();
                self.surface.place(origin);
            }
        }
    }

    /// Feeds a finished fetch into the view, dropping anything stale.
    pub fn apply_outcome(&mut self, outcome: PollOutcome) {
        if !self.state.is_visible() {
            tracing::debug!("Absorbed fetch {} while hidden", outcome.request_id);
            return;
        }
        if outcome.epoch != self.scheduler.epoch() {
            tracing::debug!(
                "Dropped fetch {} from finished epoch {}",
                outcome.request_id,
                outcome.epoch
            );
            return;
        }
        if self.last_rendered.is_some_and(|last| outcome.request_id <= last) {
            tracing::debug!("Dropped out-of-order fetch {}", outcome.request_id);
            return;
        }

        self.last_rendered = Some(outcome.request_id);
        self.surface.render(&render(ViewInput::Result(&outcome.result)));
    }

    /// Stops polling and removes the panel.
    pub fn destroy(mut self) {
        self.scheduler.stop();
        self.surface.remove();
        tracing::info!("Panel destroyed");
    }

    fn origin(&self) -> Position {
        self.state.position.unwrap_or_else(|| {
            Position::default_anchor(
                self.layout.viewport,
                self.layout.panel,
                self.layout.anchor_margin,
            )
        })
    }

    fn move_panel(&mut self, target: Position) -> Position {
        let position = target.clamp_to(self.layout.viewport, self.layout.panel);
        self.state.set_position(position);
        self.surface.place(position);
        position
    }
}
