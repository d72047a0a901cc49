//! Per-session navigation controller joining the carousel to week loading.

use std::sync::Arc;
use tracing::debug;

use crate::agenda::DaySlot;
use crate::controller::{WeekController, WeekView};
use crate::error::AgendaError;
use crate::navigator::{Direction, EdgePolicy, NavigationState, SlideNavigator, Step};

/// One dashboard session: the week controller plus the carousel showing it.
///
/// UI events are forwarded here as method calls; navigation state only
/// changes once a week transition has actually completed.
pub struct Dashboard {
    controller: Arc<WeekController>,
    navigator: SlideNavigator,
    week: Option<WeekView>,
    slots: Vec<DaySlot>,
}

impl Dashboard {
    pub fn new(controller: Arc<WeekController>, width: u32, policy: EdgePolicy) -> Self {
        Self {
            controller,
            navigator: SlideNavigator::new(width, policy),
            week: None,
            slots: Vec::new(),
        }
    }

    /// Initial load of the current week.
    pub async fn open(&mut self) -> Result<(), AgendaError> {
        let view = self.controller.load_week(0).await?;
        self.show(view);
        Ok(())
    }

    /// "Next" button or swipe.
    pub async fn next(&mut self) -> Result<Step, AgendaError> {
        let step = self.navigator.advance();
        self.follow(step).await
    }

    /// "Previous" button or swipe.
    pub async fn prev(&mut self) -> Result<Step, AgendaError> {
        let step = self.navigator.retreat();
        self.follow(step).await
    }

    pub fn resize(&mut self, width: u32) {
        self.navigator.resize(width);
        debug!(
            width,
            slides_per_view = self.navigator.state().slides_per_view,
            offset_percent = self.navigator.visual_offset_percent(),
            "Viewport resized"
        );
    }

    pub fn state(&self) -> NavigationState {
        self.navigator.state()
    }

    pub fn week(&self) -> Option<&WeekView> {
        self.week.as_ref()
    }

    pub fn slots(&self) -> &[DaySlot] {
        &self.slots
    }

    /// Day columns currently inside the viewport.
    pub fn visible_slots(&self) -> &[DaySlot] {
        &self.slots[self.navigator.visible_range()]
    }

    pub fn visual_offset_percent(&self) -> f64 {
        self.navigator.visual_offset_percent()
    }

    pub fn controller(&self) -> &Arc<WeekController> {
        &self.controller
    }

    async fn follow(&mut self, step: Step) -> Result<Step, AgendaError> {
        if let Step::Week(direction) = step {
            let view = match direction {
                Direction::Next => self.controller.go_to_next_week().await?,
                Direction::Prev => self.controller.go_to_prev_week().await?,
            };
            self.show(view);
        }
        Ok(step)
    }

    fn show(&mut self, view: WeekView) {
        let slots = view.slots();
        self.navigator.week_loaded(view.offset, slots.len());
        debug!(offset = view.offset, slots = slots.len(), "Week on screen");
        self.slots = slots;
        self.week = Some(view);
    }
}
