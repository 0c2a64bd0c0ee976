//! # Scroll Narrative
//!
//! Two independent stories walk through the commit history one step per
//! commit. As a step crosses the trigger line (a fraction of the viewport
//! height) it becomes active and the visible set is recomputed as every commit
//! at or before that step's commit.
//!
//! [`StepTracker`] plays the role of the scroll observer: it is fed step
//! geometry each frame and notifies subscribers through the
//! [`ScrollObserver`] interface.

mod steps;
mod tracker;


pub use steps::{files_step_text, scatter_step_text, CommitLink, StepLine, StoryStep};
pub use tracker::{Direction, ScrollObserver, StepEvent, StepGeometry, StepTracker, StoryLayout, Viewport};

use std::sync::{Arc, Mutex};

use crate::analysis::CommitHistory;

/// The two narrative tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    /// Drives the scatter plot, summary stats and language pie
    Scatter,
    /// Drives the file view
    Files,
}

/// A step transition the viewer must push into its renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrativeUpdate {
    pub track: Track,
    pub step: usize,
    /// Ids of the visible set, in chronological order
    pub visible: Vec<String>,
}

/// One track: its step texts, its scroll tracker and its active step.
pub struct NarrativeTrack {
    track: Track,
    steps: Vec<StoryStep>,
    tracker: StepTracker,
    active: Option<usize>,
    pending: Arc<Mutex<Vec<StepEvent>>>,
    resized: Arc<Mutex<bool>>,
}

impl NarrativeTrack {
    fn new(track: Track, steps: Vec<StoryStep>, trigger_offset: f32) -> Self {
        let mut tracker = StepTracker::new(trigger_offset);
        let pending = Arc::new(Mutex::new(Vec::new()));
        let resized = Arc::new(Mutex::new(false));

        let sink = Arc::clone(&pending);
        tracker.on_step_enter(Box::new(move |event| {
            if let Ok(mut queue) = sink.lock() {
                queue.push(event);
            }
        }));
        let flag = Arc::clone(&resized);
        tracker.on_resize(Box::new(move |_| {
            if let Ok(mut resized) = flag.lock() {
                *resized = true;
            }
        }));

        Self {
            track,
            steps,
            tracker,
            active: None,
            pending,
            resized,
        }
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn steps(&self) -> &[StoryStep] {
        &self.steps
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Activate a step. Exactly one step per track is active at a time.
    fn activate(&mut self, step: usize, history: &CommitHistory) -> Option<NarrativeUpdate> {
        if step >= self.steps.len() {
            return None;
        }
        self.active = Some(step);
        self.tracker.set_current(step);
        let visible = history
            .visible_at(step)
            .into_iter()
            .map(|c| c.id.clone())
            .collect::<Vec<_>>();
        log::debug!(
            "{:?} narrative entered step {} ({} commits visible)",
            self.track,
            step,
            visible.len()
        );
        Some(NarrativeUpdate {
            track: self.track,
            step,
            visible,
        })
    }

    /// Feed this frame's geometry and apply any step the tracker entered.
    fn observe(
        &mut self,
        viewport: Viewport,
        steps: &[StepGeometry],
        history: &CommitHistory,
    ) -> Vec<NarrativeUpdate> {
        self.tracker.observe(viewport, steps);

        let resized = self
            .resized
            .lock()
            .map(|mut flag| std::mem::take(&mut *flag))
            .unwrap_or(false);
        if resized {
            log::debug!("{:?} narrative trigger geometry recomputed", self.track);
        }

        let events: Vec<StepEvent> = self
            .pending
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default();
        events
            .into_iter()
            .filter_map(|event| self.activate(event.index, history))
            .collect()
    }
}

/// Controller owning both narrative tracks.
pub struct Narrative {
    scatter: NarrativeTrack,
    files: NarrativeTrack,
}

impl Narrative {
    pub fn new(history: &CommitHistory, trigger_offset: f32) -> Self {
        let total = history.commits().len();
        let scatter_steps = history
            .commits()
            .iter()
            .enumerate()
            .map(|(i, c)| scatter_step_text(i, total, c, history.lines_of(&c.id)))
            .collect();
        let files_steps = history
            .commits()
            .iter()
            .enumerate()
            .map(|(i, c)| files_step_text(i, c, history.lines_of(&c.id)))
            .collect();

        Self {
            scatter: NarrativeTrack::new(Track::Scatter, scatter_steps, trigger_offset),
            files: NarrativeTrack::new(Track::Files, files_steps, trigger_offset),
        }
    }

    pub fn track(&self, track: Track) -> &NarrativeTrack {
        match track {
            Track::Scatter => &self.scatter,
            Track::Files => &self.files,
        }
    }

    fn track_mut(&mut self, track: Track) -> &mut NarrativeTrack {
        match track {
            Track::Scatter => &mut self.scatter,
            Track::Files => &mut self.files,
        }
    }

    /// Activate step 0 of both tracks without waiting for a scroll, so the
    /// charts are never blank. Does nothing when there are no commits.
    pub fn start(&mut self, history: &CommitHistory) -> Vec<NarrativeUpdate> {
        [Track::Scatter, Track::Files]
            .into_iter()
            .filter_map(|track| self.track_mut(track).activate(0, history))
            .collect()
    }

    /// Jump a track to a step directly.
    pub fn enter(&mut self, track: Track, step: usize, history: &CommitHistory) -> Option<NarrativeUpdate> {
        self.track_mut(track).activate(step, history)
    }

    /// Feed one track's scroll geometry for this frame.
    pub fn observe(
        &mut self,
        track: Track,
        viewport: Viewport,
        steps: &[StepGeometry],
        history: &CommitHistory,
    ) -> Vec<NarrativeUpdate> {
        self.track_mut(track).observe(viewport, steps, history)
    }
}
