//! Cross-panel synchronization: several independent surfaces (tab label,
//! color-coded badge, duplicated status selectors) each hold their own copy
//! of the current status. A committed change is broadcast to every
//! registered surface so none of them needs a re-fetch to stay consistent.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{ApplicantId, ReviewStatus};

/// Names one independently-rendered display of the shared status.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub String);

#[derive(Debug)]
struct PanelState {
    applicant: ApplicantId,
    status: ReviewStatus,
}

/// Publish/subscribe registry keyed by surface identifier and applicant id.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    surfaces: Mutex<BTreeMap<SurfaceId, PanelState>>,
}

impl PanelRegistry {
    /// Mount a surface showing `status` for `applicant`. Re-registering an
    /// existing surface simply overwrites its copy.
    pub fn register(&self, surface: SurfaceId, applicant: ApplicantId, status: ReviewStatus) {
        let mut guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        guard.insert(surface, PanelState { applicant, status });
    }

    /// Unmount a surface. Unknown identifiers are ignored.
    pub fn unregister(&self, surface: &SurfaceId) {
        let mut guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        guard.remove(surface);
    }

    /// Drop every mounted surface (the review surface closed).
    pub fn clear(&self) {
        let mut guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        guard.clear();
    }

    /// Rewrite every surface showing `applicant` to `new_status`. Surfaces
    /// bound to another applicant are skipped: a broadcast that outlived its
    /// applicant must not touch what is open now. Returns how many surfaces
    /// were updated.
    pub fn broadcast(&self, applicant: &ApplicantId, new_status: ReviewStatus) -> usize {
        let mut guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        let mut updated = 0;
        for (surface, state) in guard.iter_mut() {
            if &state.applicant != applicant {
                debug!(surface = %surface.0, "skipping surface bound to another applicant");
                continue;
            }
            state.status = new_status;
            updated += 1;
        }
        updated
    }

    /// What one surface currently displays, if it is mounted.
    pub fn shown_status(&self, surface: &SurfaceId) -> Option<ReviewStatus> {
        let guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        guard.get(surface).map(|state| state.status)
    }

    pub fn mounted(&self) -> usize {
        let guard = self.surfaces.lock().expect("panel registry mutex poisoned");
        guard.len()
    }
}
