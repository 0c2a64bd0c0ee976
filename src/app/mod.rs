//! The egui viewer.
//!
//! [`App`] holds the renderer contexts and the narrative; [`AppWrapper`] hands
//! it to eframe behind a mutex. Panels whose data source failed to load are
//! left out rather than treated as fatal.

mod preferences;
mod state;
mod ui;

pub use preferences::PreferenceStore;
pub use state::{App, AppWrapper, MetaView, ProjectsView};
