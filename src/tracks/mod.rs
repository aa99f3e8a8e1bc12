//! Residue-level annotations for the 2D feature-track widget and structure
//! coloring.
//!
//! - [`amino_acid`]: the twenty standard residues and their functional
//!   groups.
//! - [`feature`]: track builders reading a [`ChainModel`](crate::source::ChainModel).
//! - [`color`]: value scales and color ramps for per-residue coloring.

pub mod amino_acid;
pub mod color;
pub mod feature;

pub use amino_acid::{AminoAcid, FunctionalGroup};
pub use color::{ColorRamp, FeatureScale};
pub use feature::{FeaturePoint, FeatureTrack, TrackKind};
