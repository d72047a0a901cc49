//! Carousel index arithmetic: slide within a week or move to another week.

/// `(max width, slides per view)` pairs, narrowest first.
const BREAKPOINTS: [(u32, usize); 4] = [(420, 1), (600, 2), (800, 3), (1000, 4)];

/// Slides shown when the viewport is wider than every breakpoint.
const MAX_SLIDES_PER_VIEW: usize = 5;

/// Number of day columns that fit in a viewport `width` pixels wide.
pub fn slides_per_view_for_width(width: u32) -> usize {
    BREAKPOINTS
        .iter()
        .find(|(max_width, _)| width <= *max_width)
        .map(|(_, slides)| *slides)
        .unwrap_or(MAX_SLIDES_PER_VIEW)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Outcome of a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Scrolled within the current week; carries the new slide index.
    Slide(usize),
    /// The current week is exhausted; load the adjacent one.
    Week(Direction),
}

/// How navigation behaves once the carousel reaches the first or last slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Pushing past the edge moves to the adjacent week.
    #[default]
    CrossAtEdge,
    /// Weeks only change when every day fits on screen; otherwise the
    /// carousel stays clamped at its edge.
    Confined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub week_offset: i64,
    pub slide_index: usize,
    pub slides_per_view: usize,
}

/// Tracks the carousel position for the week on screen.
#[derive(Debug, Clone)]
pub struct SlideNavigator {
    state: NavigationState,
    total_slots: usize,
    policy: EdgePolicy,
}

impl SlideNavigator {
    pub fn new(width: u32, policy: EdgePolicy) -> Self {
        Self {
            state: NavigationState {
                week_offset: 0,
                slide_index: 0,
                slides_per_view: slides_per_view_for_width(width),
            },
            total_slots: 0,
            policy,
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// Highest slide index that still fills the viewport.
    pub fn max_index(&self) -> usize {
        self.total_slots.saturating_sub(self.state.slides_per_view)
    }

    fn overflows(&self) -> bool {
        self.total_slots > self.state.slides_per_view
    }

    /// Handle a "next" intent.
    pub fn advance(&mut self) -> Step {
        let at_edge = self.state.slide_index >= self.max_index();
        let slide = match self.policy {
            EdgePolicy::CrossAtEdge => self.overflows() && !at_edge,
            EdgePolicy::Confined => self.overflows(),
        };

        if slide {
            self.state.slide_index = (self.state.slide_index + 1).min(self.max_index());
            Step::Slide(self.state.slide_index)
        } else {
            Step::Week(Direction::Next)
        }
    }

    /// Handle a "previous" intent.
    pub fn retreat(&mut self) -> Step {
        let at_edge = self.state.slide_index == 0;
        let slide = match self.policy {
            EdgePolicy::CrossAtEdge => self.overflows() && !at_edge,
            EdgePolicy::Confined => self.overflows(),
        };

        if slide {
            self.state.slide_index = self.state.slide_index.saturating_sub(1);
            Step::Slide(self.state.slide_index)
        } else {
            Step::Week(Direction::Prev)
        }
    }

    /// Viewport changed width: recompute capacity and pull the index back in range.
    pub fn resize(&mut self, width: u32) {
        self.state.slides_per_view = slides_per_view_for_width(width);
        self.state.slide_index = self.state.slide_index.min(self.max_index());
    }

    /// A week transition completed; show its first day.
    pub fn week_loaded(&mut self, week_offset: i64, total_slots: usize) {
        self.state.week_offset = week_offset;
        self.state.slide_index = 0;
        self.total_slots = total_slots;
    }

    /// Horizontal translation of the slide track, in percent of the viewport.
    pub fn visual_offset_percent(&self) -> f64 {
        -(self.state.slide_index as f64 * 100.0 / self.state.slides_per_view as f64)
    }

    /// Range of slot indices currently on screen.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = self.state.slide_index.min(self.total_slots);
        let end = (start + self.state.slides_per_view).min(self.total_slots);
        start..end
    }
}
