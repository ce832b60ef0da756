use std::sync::{Arc, Mutex};

use face_sorter_core::pipeline::face_sorter::FaceSorter;

use crate::workspace::Workspace;

/// Shared server state.
///
/// Every request touching the workspace holds `sorter`'s lock for its whole
/// duration, so uploads, registration and sorting never interleave.
pub struct AppState {
    pub sorter: Mutex<FaceSorter>,
    pub workspace: Workspace,
}

impl AppState {
    pub fn new(sorter: FaceSorter, workspace: Workspace) -> Arc<Self> {
        Arc::new(Self {
            sorter: Mutex::new(sorter),
            workspace,
        })
    }
}
