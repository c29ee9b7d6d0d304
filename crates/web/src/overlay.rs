use std::sync::Mutex;

use log::debug;
use planner::{MapOverlay, OverlayCommand, OverlayState};

/// Keeps what a map client would currently show, so HTTP clients can poll it.
pub struct InMemoryOverlay {
    state: Mutex<OverlayState>,
}

impl InMemoryOverlay {
    pub fn new(markers_visible: bool) -> Self {
        Self {
            state: Mutex::new(OverlayState::new(markers_visible)),
        }
    }

    pub fn state(&self) -> OverlayState {
        match self.state.lock() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MapOverlay for InMemoryOverlay {
    fn apply(&self, commands: Vec<OverlayCommand>) {
        debug!("Applying {} overlay commands.", commands.len());
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.apply(&commands);
    }
}
