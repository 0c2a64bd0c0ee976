/// Visible window of a scrolling container, in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub height: f32,
}

/// Vertical extent of one step element, in the same space as the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepGeometry {
    pub top: f32,
    pub bottom: f32,
}

/// Spacing of a story's steps inside a scroll area of a given height.
///
/// The lead puts the first step's top on the trigger line while the story is
/// unscrolled, so later steps are only entered by scrolling. The tail lets the
/// last step reach the trigger line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoryLayout {
    pub lead: f32,
    pub gap: f32,
    pub tail: f32,
}

impl StoryLayout {
    pub fn new(height: f32, offset: f32) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        Self {
            lead: height * offset,
            gap: height * 0.3,
            tail: height * (1.0 - offset),
        }
    }

    /// Geometry of steps of the given heights stacked below `content_top`.
    pub fn place(&self, content_top: f32, heights: &[f32]) -> Vec<StepGeometry> {
        let mut top = content_top + self.lead;
        heights
            .iter()
            .map(|height| {
                let step = StepGeometry {
                    top,
                    bottom: top + height,
                };
                top = step.bottom + self.gap;
                step
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// A step crossed the trigger line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepEvent {
    pub index: usize,
    pub direction: Direction,
}

pub type StepHandler = Box<dyn FnMut(StepEvent) + Send>;
pub type ResizeHandler = Box<dyn FnMut(Viewport) + Send>;

/// Subscription interface of a scroll observer.
pub trait ScrollObserver {
    /// Called whenever a different step becomes active.
    fn on_step_enter(&mut self, handler: StepHandler);
    /// Called when the viewport height changes.
    fn on_resize(&mut self, handler: ResizeHandler);
}

/// Decides which step is active from step geometry and the viewport.
///
/// A step is active once its top edge has passed the trigger line at
/// `offset × viewport height`; the last such step wins. Scrolling above the
/// first step keeps the current step.
pub struct StepTracker {
    offset: f32,
    viewport: Option<Viewport>,
    current: Option<usize>,
    step_handlers: Vec<StepHandler>,
    resize_handlers: Vec<ResizeHandler>,
}

impl StepTracker {
    pub fn new(offset: f32) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            viewport: None,
            current: None,
            step_handlers: Vec::new(),
            resize_handlers: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Record a step activated outside of scrolling, without notifying.
    pub fn set_current(&mut self, index: usize) {
        self.current = Some(index);
    }

    /// Screen position of the trigger line.
    pub fn trigger_line(&self, viewport: Viewport) -> f32 {
        viewport.top + viewport.height * self.offset
    }

    /// Process one frame of scroll geometry.
    pub fn observe(&mut self, viewport: Viewport, steps: &[StepGeometry]) {
        if let Some(previous) = self.viewport {
            if (previous.height - viewport.height).abs() > 0.5 {
                for handler in &mut self.resize_handlers {
                    handler(viewport);
                }
            }
        }
        self.viewport = Some(viewport);

        if matches!(self.current, Some(current) if current >= steps.len()) {
            self.current = None;
        }

        let trigger = self.trigger_line(viewport);
        let Some(candidate) = steps.iter().rposition(|s| s.top <= trigger) else {
            return;
        };
        if self.current == Some(candidate) {
            return;
        }

        let direction = match self.current {
            Some(current) if candidate < current => Direction::Up,
            _ => Direction::Down,
        };
        self.current = Some(candidate);

        let event = StepEvent {
            index: candidate,
            direction,
        };
        for handler in &mut self.step_handlers {
            handler(event);
        }
    }
}

impl ScrollObserver for StepTracker {
    fn on_step_enter(&mut self, handler: StepHandler) {
        self.step_handlers.push(handler);
    }

    fn on_resize(&mut self, handler: ResizeHandler) {
        self.resize_handlers.push(handler);
    }
}
