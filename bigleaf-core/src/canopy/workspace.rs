//! Working state for the two-leaf canopy representation.
//!
//! The canopy is a single layer with two big leaves (sunlit and shaded),
//! following Wang & Leuning (1998) and De Pury & Farquhar (1997). The leaf
//! count is a structural constant of the model, so per-leaf quantities are
//! fixed-size records indexed by [`Leaf`] rather than general collections.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Leaf class of the big-leaf canopy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leaf {
    Sunlit,
    Shaded,
}

impl Leaf {
    /// Both leaf classes, in processing order.
    pub const ALL: [Leaf; 2] = [Leaf::Sunlit, Leaf::Shaded];
}

/// A quantity resolved separately for the sunlit and shaded leaf.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerLeaf<T>(pub [T; 2]);

impl<T> Index<Leaf> for PerLeaf<T> {
    type Output = T;

    fn index(&self, leaf: Leaf) -> &T {
        &self.0[leaf as usize]
    }
}

impl<T> IndexMut<Leaf> for PerLeaf<T> {
    fn index_mut(&mut self, leaf: Leaf) -> &mut T {
        &mut self.0[leaf as usize]
    }
}

impl PerLeaf<f64> {
    /// Sum over both leaf classes.
    pub fn total(&self) -> f64 {
        self.0[0] + self.0[1]
    }

    /// Arithmetic mean of both leaf classes.
    pub fn mean(&self) -> f64 {
        0.5 * (self.0[0] + self.0[1])
    }
}

/// Mutable working state owned by the day orchestrator for one simulated day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanopyWorkspace {
    /// Net assimilation per leaf (umol m-2 s-1).
    pub an_leaf: PerLeaf<f64>,
    /// Stomatal conductance to CO2 per leaf (mol m-2 s-1).
    pub gsc_leaf: PerLeaf<f64>,
    /// Transpiration per leaf (mol m-2 s-1).
    pub trans_leaf: PerLeaf<f64>,
    /// Isothermal net radiation per leaf (W m-2).
    pub rnet_leaf: PerLeaf<f64>,
    /// Absorbed PAR per leaf (umol m-2 s-1).
    pub apar_leaf: PerLeaf<f64>,
    /// Decoupling coefficient per leaf (dimensionless).
    pub omega_leaf: PerLeaf<f64>,

    /// Current leaf temperature estimate (deg C).
    pub tleaf: f64,
    /// Candidate leaf temperature from the latest energy-balance step (deg C).
    pub tleaf_new: f64,
    /// CO2 mole fraction at the leaf surface (umol mol-1).
    pub cs: f64,
    /// Vapour pressure deficit at the leaf surface (Pa).
    pub dleaf: f64,

    /// Solar elevation angle (deg).
    pub elevation: f64,
    /// Diffuse fraction of incident radiation (dimensionless).
    pub diffuse_frac: f64,
    /// Nitrogen content at the top of the canopy (g N m-2).
    pub n0: f64,

    /// Canopy-level sums/mean from the latest call to [`scale_to_canopy`].
    ///
    /// [`scale_to_canopy`]: CanopyWorkspace::scale_to_canopy
    pub an_canopy: f64,
    pub gsc_canopy: f64,
    pub apar_canopy: f64,
    pub trans_canopy: f64,
    pub omega_canopy: f64,
    pub rnet_canopy: f64,
}

impl CanopyWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all per-leaf quantities for a slot with no leaf activity.
    pub fn zero_half_hourly(&mut self) {
        self.an_leaf = PerLeaf::default();
        self.gsc_leaf = PerLeaf::default();
        self.trans_leaf = PerLeaf::default();
        self.rnet_leaf = PerLeaf::default();
        self.apar_leaf = PerLeaf::default();
        self.omega_leaf = PerLeaf::default();
    }

    /// Aggregate the two leaf classes to canopy level.
    ///
    /// Fluxes and conductances sum over the leaf classes; the decoupling
    /// coefficient is averaged.
    pub fn scale_to_canopy(&mut self) {
        self.an_canopy = self.an_leaf.total();
        self.gsc_canopy = self.gsc_leaf.total();
        self.apar_canopy = self.apar_leaf.total();
        self.trans_canopy = self.trans_leaf.total();
        self.omega_canopy = self.omega_leaf.mean();
        self.rnet_canopy = self.rnet_leaf.total();
    }
}
