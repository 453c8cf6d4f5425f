//! Configuration for workflow composition.
//!
//! A [`WorkflowConfig`] is the single input to the composer: algorithm
//! selections, declared input artifacts, acquisition parameters, the
//! process budget, solver tuning, and optional cluster submission
//! settings. Loaded from and saved to TOML.

use crate::error::{QsmFlowError, Result};
use crate::workflow::stage::{BfRemovalAlgorithm, QsmAlgorithm, UnwrappingAlgorithm};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default walltime requested per cluster job
pub const DEFAULT_WALLTIME: &str = "01:00:00";

/// Default TGV solver iteration count
pub const DEFAULT_TGV_ITERATIONS: u32 = 1000;

/// Default TGV regularization weights
pub const DEFAULT_TGV_ALPHAS: [f64; 2] = [0.0015, 0.0005];

/// Default TGV mask erosion count
pub const DEFAULT_TGV_EROSIONS: u32 = 5;

/// Default main field strength in tesla
pub const DEFAULT_FIELD_STRENGTH: f64 = 3.0;

/// Default main field direction (scanner z axis)
pub const DEFAULT_FIELD_DIRECTION: [f64; 3] = [0.0, 0.0, 1.0];

/// Default voxel size in millimetres
pub const DEFAULT_VOXEL_SIZE: [f64; 3] = [1.0, 1.0, 1.0];

fn default_true() -> bool {
    true
}

fn default_processes() -> u32 {
    1
}

fn default_field_strength() -> f64 {
    DEFAULT_FIELD_STRENGTH
}

fn default_field_direction() -> [f64; 3] {
    DEFAULT_FIELD_DIRECTION
}

fn default_voxel_size() -> [f64; 3] {
    DEFAULT_VOXEL_SIZE
}

fn default_tgv_iterations() -> u32 {
    DEFAULT_TGV_ITERATIONS
}

fn default_tgv_alphas() -> [f64; 2] {
    DEFAULT_TGV_ALPHAS
}

fn default_tgv_erosions() -> u32 {
    DEFAULT_TGV_EROSIONS
}

fn default_walltime() -> String {
    DEFAULT_WALLTIME.to_string()
}

// ==================== Input Availability ====================

/// Which optional input artifacts the dataset provides.
///
/// Phase and mask volumes are always assumed present; these flags gate
/// the artifacts only some stage selections depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Magnitude volumes are available (required by ROMEO unwrapping)
    #[serde(default = "default_true")]
    pub magnitude: bool,

    /// A precomputed frequency map is available
    pub frequency: bool,

    /// A precomputed unwrapped-phase volume is available
    pub phase_unwrapped: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            magnitude: true,
            frequency: false,
            phase_unwrapped: false,
        }
    }
}

// ==================== Acquisition Parameters ====================

/// Scan acquisition parameters forwarded to processing nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Echo time in seconds for single-echo acquisitions
    pub echo_time: Option<f64>,

    /// Echo times in seconds, one per echo. Takes precedence over
    /// `echo_time` when non-empty.
    pub echo_times: Vec<f64>,

    /// Main field strength in tesla
    #[serde(default = "default_field_strength")]
    pub field_strength: f64,

    /// Unit vector of the main field in scanner coordinates
    #[serde(default = "default_field_direction")]
    pub field_direction: [f64; 3],

    /// Voxel size in millimetres
    #[serde(default = "default_voxel_size")]
    pub voxel_size: [f64; 3],
}

impl AcquisitionConfig {
    /// Echo times as a list, promoting a lone `echo_time` to a
    /// single-element list. Empty when neither field is set.
    pub fn effective_echo_times(&self) -> Vec<f64> {
        if !self.echo_times.is_empty() {
            self.echo_times.clone()
        } else if let Some(te) = self.echo_time {
            vec![te]
        } else {
            Vec::new()
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            echo_time: None,
            echo_times: Vec::new(),
            field_strength: default_field_strength(),
            field_direction: default_field_direction(),
            voxel_size: default_voxel_size(),
        }
    }
}

// ==================== Process Budget ====================

/// Process budget used when planning node thread counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of worker processes available to the run
    #[serde(default = "default_processes")]
    pub processes: u32,

    /// Whether nodes may spread across the full process budget
    pub multiproc: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            processes: default_processes(),
            multiproc: false,
        }
    }
}

// ==================== Solver Tuning ====================

/// Tuning parameters for the TGV inversion solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TgvConfig {
    /// Solver iteration count
    #[serde(default = "default_tgv_iterations")]
    pub iterations: u32,

    /// Regularization weights
    #[serde(default = "default_tgv_alphas")]
    pub alphas: [f64; 2],

    /// Mask erosion count
    #[serde(default = "default_tgv_erosions")]
    pub erosions: u32,
}

impl Default for TgvConfig {
    fn default() -> Self {
        Self {
            iterations: default_tgv_iterations(),
            alphas: default_tgv_alphas(),
            erosions: default_tgv_erosions(),
        }
    }
}

// ==================== Cluster Submission ====================

/// Batch scheduler settings. Present only when the run targets a
/// cluster; work nodes then carry a submission directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Queue or account identifier jobs are submitted under
    pub queue: String,

    /// Walltime requested per job
    #[serde(default = "default_walltime")]
    pub walltime: String,
}

impl SchedulerConfig {
    /// Create scheduler settings for a queue with the default walltime.
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            walltime: default_walltime(),
        }
    }
}

// ==================== Workflow Config ====================

/// Complete description of one reconstruction run.
///
/// This is the sole input to [`WorkflowComposer`]; two identical
/// configurations compose identical graphs.
///
/// [`WorkflowComposer`]: crate::workflow::compose::WorkflowComposer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Phase unwrapping algorithm. `None` skips the stage.
    pub unwrapping: Option<UnwrappingAlgorithm>,

    /// Dipole inversion algorithm. Required for composition.
    pub qsm_algorithm: Option<QsmAlgorithm>,

    /// Background-field removal algorithm, consulted only when the
    /// selected inversion needs the stage
    pub bf_algorithm: BfRemovalAlgorithm,

    /// Phase volumes were already combined across echoes upstream
    pub combine_phase: bool,

    /// Optional input artifact availability
    pub inputs: InputConfig,

    /// Scan acquisition parameters
    pub acquisition: AcquisitionConfig,

    /// Process budget
    pub parallel: ParallelConfig,

    /// TGV solver tuning
    pub tgv: TgvConfig,

    /// Cluster submission settings
    pub scheduler: Option<SchedulerConfig>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            unwrapping: None,
            qsm_algorithm: None,
            bf_algorithm: BfRemovalAlgorithm::default(),
            combine_phase: false,
            inputs: InputConfig::default(),
            acquisition: AcquisitionConfig::default(),
            parallel: ParallelConfig::default(),
            tgv: TgvConfig::default(),
            scheduler: None,
        }
    }
}

impl WorkflowConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QsmFlowError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            QsmFlowError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| QsmFlowError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            QsmFlowError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}

// ==================== Tests ====================
