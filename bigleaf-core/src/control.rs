//! Run control for the sub-daily canopy loop.

use serde::{Deserialize, Serialize};

/// Photosynthetic biochemistry pathway.
///
/// Only [`PhotosynthesisPathway::C3`] is implemented; configuring
/// [`PhotosynthesisPathway::C4`] is rejected before any leaf solve runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotosynthesisPathway {
    C3,
    C4,
}

/// Control settings for iterating the half-hours of one simulated day.
///
/// `hour_idx` is the global half-hour cursor into the forcing arrays. It is
/// shared across the whole run (not reset per day): the orchestrator advances
/// it by one per processed slot, so successive days continue where the
/// previous day stopped. Holding it here keeps the day loop free of
/// process-wide mutable state and lets callers inspect or rewind it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubDailyControl {
    /// Number of half-hour slots per simulated day.
    pub num_half_hours: usize,

    /// Global half-hour cursor into the forcing arrays.
    pub hour_idx: usize,

    /// Slot at which the pre-dawn soil water potential is evaluated
    /// (index 10 is ~05:00 for 48 half-hour slots).
    pub pre_dawn_idx: usize,

    /// Configured photosynthetic pathway.
    pub ps_pathway: PhotosynthesisPathway,
}

impl Default for SubDailyControl {
    fn default() -> Self {
        Self {
            num_half_hours: 48,
            hour_idx: 0,
            pre_dawn_idx: 10,
            ps_pathway: PhotosynthesisPathway::C3,
        }
    }
}
