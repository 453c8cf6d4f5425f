//! Stage taxonomy and per-stage algorithm selectors.
//!
//! The stage set and the legal algorithm variants are a fixed, closed
//! vocabulary: a run configuration picks at most one variant per stage
//! and the composer derives the graph from those picks. An absent
//! selector is expressed as `Option::None` on the configuration, never
//! as an extra enum variant.

use serde::{Deserialize, Serialize};

/// The conceptual stages a composed workflow draws its nodes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Workflow input and output boundaries.
    Io,
    /// Phase unwrapping.
    Unwrapping,
    /// Phase-to-frequency conversion.
    Frequency,
    /// Background-field removal.
    BfRemoval,
    /// Dipole inversion producing the susceptibility map.
    Inversion,
}

impl Stage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Io => "I/O",
            Stage::Unwrapping => "Phase unwrapping",
            Stage::Frequency => "Phase to frequency",
            Stage::BfRemoval => "Background-field removal",
            Stage::Inversion => "Dipole inversion",
        }
    }

    pub fn all() -> &'static [Stage] {
        &[
            Stage::Io,
            Stage::Unwrapping,
            Stage::Frequency,
            Stage::BfRemoval,
            Stage::Inversion,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Phase-unwrapping algorithm variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnwrappingAlgorithm {
    /// Laplacian-based unwrapping over phase and mask.
    Laplacian,
    /// ROMEO unwrapping guided by magnitude images.
    Romeo,
}

impl UnwrappingAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            UnwrappingAlgorithm::Laplacian => "laplacian",
            UnwrappingAlgorithm::Romeo => "romeo",
        }
    }

    pub fn all() -> &'static [UnwrappingAlgorithm] {
        &[UnwrappingAlgorithm::Laplacian, UnwrappingAlgorithm::Romeo]
    }
}

impl std::fmt::Display for UnwrappingAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Background-field removal algorithm variants. Only consulted when the
/// inversion is two-step (RTS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BfRemovalAlgorithm {
    /// V-SHARP; produces tissue frequency plus a refined (eroded) mask.
    #[default]
    Vsharp,
    /// Projection onto dipole fields; produces tissue frequency only.
    Pdf,
}

impl BfRemovalAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            BfRemovalAlgorithm::Vsharp => "vsharp",
            BfRemovalAlgorithm::Pdf => "pdf",
        }
    }

    pub fn all() -> &'static [BfRemovalAlgorithm] {
        &[BfRemovalAlgorithm::Vsharp, BfRemovalAlgorithm::Pdf]
    }
}

impl std::fmt::Display for BfRemovalAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dipole-inversion algorithm variants. Exactly one must be selected
/// for a composition to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QsmAlgorithm {
    /// Deep-learning inversion operating on frequency maps.
    Nextqsm,
    /// Rapid two-step inversion; requires background-field removal.
    Rts,
    /// Total generalized variation; single-step from unwrapped phase.
    Tgv,
}

impl QsmAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            QsmAlgorithm::Nextqsm => "nextqsm",
            QsmAlgorithm::Rts => "rts",
            QsmAlgorithm::Tgv => "tgv",
        }
    }

    pub fn all() -> &'static [QsmAlgorithm] {
        &[QsmAlgorithm::Nextqsm, QsmAlgorithm::Rts, QsmAlgorithm::Tgv]
    }

    /// Whether this inversion consumes frequency maps (and therefore
    /// needs the frequency stage composed upstream).
    pub fn needs_frequency(&self) -> bool {
        matches!(self, QsmAlgorithm::Nextqsm | QsmAlgorithm::Rts)
    }

    /// Whether this inversion consumes tissue frequency (and therefore
    /// needs background-field removal composed upstream).
    pub fn needs_bf_removal(&self) -> bool {
        matches!(self, QsmAlgorithm::Rts)
    }
}

impl std::fmt::Display for QsmAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
