//! Static catalog of node interfaces.
//!
//! Every node the composer can place is described here: its name, the
//! stage it belongs to, its ports, whether it is an identity junction,
//! and its resource policies. The composer never invents ports or
//! names at runtime; it only instantiates entries from this catalog.
//!
//! # Naming
//!
//! Work-node names carry the toolbox prefix of the command they stand
//! for (`qsmjl_` for the Julia toolbox, `mrt_` for MriResearchTools),
//! so exported descriptions line up with the engine's job names.

use crate::workflow::artifact::ArtifactKind;
use crate::workflow::port::PortDescriptor;
use crate::workflow::resources::{MemoryPolicy, ThreadPolicy, JUNCTION_MEM_GB};
use crate::workflow::stage::Stage;

/// Filename suffix the TGV solver appends to its output
pub const TGV_OUT_SUFFIX: &str = "_tgv";

/// Fixed extra arguments passed to the TGV solver
pub const TGV_EXTRA_ARGUMENTS: &str = "--ignore-orientation --no-resampling";

/// Static description of one node kind.
#[derive(Debug, PartialEq)]
pub struct InterfaceSpec {
    /// Node name, unique within a composed graph
    pub name: &'static str,

    /// Stage the node belongs to
    pub stage: Stage,

    /// All ports, inputs and outputs
    pub ports: &'static [PortDescriptor],

    /// Identity nodes pass data through unchanged (workflow
    /// boundaries and junctions)
    pub identity: bool,

    /// Thread planning policy
    pub threads: ThreadPolicy,

    /// Memory planning policy
    pub memory: MemoryPolicy,

    /// Cluster submission reserves this much instead of the runtime
    /// figure, when set
    pub scheduler_mem_gb: Option<f64>,
}

impl InterfaceSpec {
    /// Look up an input port by name.
    pub fn input(&self, name: &str) -> Option<&'static PortDescriptor> {
        self.ports.iter().find(|p| p.is_input() && p.name == name)
    }

    /// Look up an output port by name.
    pub fn output(&self, name: &str) -> Option<&'static PortDescriptor> {
        self.ports.iter().find(|p| p.is_output() && p.name == name)
    }

    /// Names of iterated inputs, in declaration order.
    pub fn iterfields(&self) -> Vec<&'static str> {
        self.ports
            .iter()
            .filter(|p| p.iterfield)
            .map(|p| p.name)
            .collect()
    }

    /// Whether the node expands element-wise over its iterated inputs.
    /// Map nodes emit lists even where their outputs declare element
    /// kinds.
    pub fn is_map(&self) -> bool {
        self.ports.iter().any(|p| p.iterfield)
    }
}

// ==================== Workflow Boundaries ====================

/// Workflow input boundary fanning the dataset out to every stage.
pub static WORKFLOW_INPUTS: InterfaceSpec = InterfaceSpec {
    name: "qsm_inputs",
    stage: Stage::Io,
    ports: &[
        PortDescriptor::output("phase", ArtifactKind::VolumeList),
        PortDescriptor::output("phase_unwrapped", ArtifactKind::VolumeList),
        PortDescriptor::output("frequency", ArtifactKind::VolumeList),
        PortDescriptor::output("magnitude", ArtifactKind::VolumeList),
        PortDescriptor::output("mask", ArtifactKind::VolumeList),
        PortDescriptor::output("TE", ArtifactKind::ScalarList),
        PortDescriptor::output("b0_strength", ArtifactKind::Scalar),
        PortDescriptor::output("b0_direction", ArtifactKind::ScalarList),
        PortDescriptor::output("vsz", ArtifactKind::ScalarList),
    ],
    identity: true,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(JUNCTION_MEM_GB),
    scheduler_mem_gb: None,
};

/// Workflow output boundary collecting the susceptibility maps.
pub static WORKFLOW_OUTPUTS: InterfaceSpec = InterfaceSpec {
    name: "qsm_outputs",
    stage: Stage::Io,
    ports: &[PortDescriptor::input("qsm", ArtifactKind::VolumeList)],
    identity: true,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(JUNCTION_MEM_GB),
    scheduler_mem_gb: None,
};

// ==================== Junctions ====================

/// Junction collecting unwrapped phase, whichever algorithm (or
/// upstream input) produced it.
pub static UNWRAPPED_PHASE_JUNCTION: InterfaceSpec = InterfaceSpec {
    name: "phase-unwrapping",
    stage: Stage::Unwrapping,
    ports: &[
        PortDescriptor::input("phase_unwrapped", ArtifactKind::VolumeList),
        PortDescriptor::output("phase_unwrapped", ArtifactKind::VolumeList),
    ],
    identity: true,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(JUNCTION_MEM_GB),
    scheduler_mem_gb: None,
};

/// Junction collecting frequency maps, computed or precomputed.
pub static FREQUENCY_JUNCTION: InterfaceSpec = InterfaceSpec {
    name: "frequency-inputs",
    stage: Stage::Frequency,
    ports: &[
        PortDescriptor::input("frequency", ArtifactKind::VolumeList),
        PortDescriptor::output("frequency", ArtifactKind::VolumeList),
    ],
    identity: true,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(JUNCTION_MEM_GB),
    scheduler_mem_gb: None,
};

/// Junction pairing tissue frequency with the mask downstream
/// inversion should use. Expands element-wise so the pairing stays
/// echo-aligned.
pub static BF_JUNCTION: InterfaceSpec = InterfaceSpec {
    name: "bf-removal",
    stage: Stage::BfRemoval,
    ports: &[
        PortDescriptor::iter_input("tissue_frequency", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::output("tissue_frequency", ArtifactKind::Volume),
        PortDescriptor::output("mask", ArtifactKind::Volume),
    ],
    identity: true,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(JUNCTION_MEM_GB),
    scheduler_mem_gb: None,
};

// ==================== Phase Unwrapping ====================

/// Laplacian unwrapping, one expansion per echo.
pub static LAPLACIAN_UNWRAPPING: InterfaceSpec = InterfaceSpec {
    name: "qsmjl_laplacian-unwrapping",
    stage: Stage::Unwrapping,
    ports: &[
        PortDescriptor::iter_input("phase", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::output("phase_unwrapped", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Capped(2),
    memory: MemoryPolicy::FixedGb(3.0),
    scheduler_mem_gb: None,
};

/// ROMEO unwrapping guided by magnitude images.
pub static ROMEO_UNWRAPPING: InterfaceSpec = InterfaceSpec {
    name: "mrt_romeo",
    stage: Stage::Unwrapping,
    ports: &[
        PortDescriptor::iter_input("phase", ArtifactKind::Volume),
        PortDescriptor::iter_input("magnitude", ArtifactKind::Volume),
        PortDescriptor::output("phase_unwrapped", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::FixedGb(3.0),
    scheduler_mem_gb: None,
};

// ==================== Frequency ====================

/// Unwrapped phase to frequency conversion, scaled per echo time.
pub static PHASE_TO_FREQUENCY: InterfaceSpec = InterfaceSpec {
    name: "qsmjl_phase-to-freq",
    stage: Stage::Frequency,
    ports: &[
        PortDescriptor::iter_input("phase", ArtifactKind::Volume),
        PortDescriptor::iter_input("TE", ArtifactKind::Scalar),
        PortDescriptor::input("vsz", ArtifactKind::ScalarList),
        PortDescriptor::input("b0_strength", ArtifactKind::Scalar),
        PortDescriptor::output("frequency", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Capped(2),
    memory: MemoryPolicy::FixedGb(3.0),
    scheduler_mem_gb: None,
};

// ==================== Background-Field Removal ====================

/// V-SHARP removal. Also emits the eroded mask the inversion should
/// use in place of the original.
pub static VSHARP_BF_REMOVAL: InterfaceSpec = InterfaceSpec {
    name: "qsmjl_vsharp",
    stage: Stage::BfRemoval,
    ports: &[
        PortDescriptor::iter_input("frequency", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::input("vsz", ArtifactKind::ScalarList),
        PortDescriptor::output("tissue_frequency", ArtifactKind::Volume),
        PortDescriptor::output("vsharp_mask", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Capped(2),
    memory: MemoryPolicy::FixedGb(3.0),
    scheduler_mem_gb: None,
};

/// Projection-onto-dipole-fields removal. Heavier than V-SHARP and
/// submitted with extra headroom on clusters.
pub static PDF_BF_REMOVAL: InterfaceSpec = InterfaceSpec {
    name: "qsmjl_pdf",
    stage: Stage::BfRemoval,
    ports: &[
        PortDescriptor::iter_input("frequency", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::input("vsz", ArtifactKind::ScalarList),
        PortDescriptor::output("tissue_frequency", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::FullBudgetOr(8),
    memory: MemoryPolicy::FixedGb(5.0),
    scheduler_mem_gb: Some(8.0),
};

// ==================== Dipole Inversion ====================

/// Deep-learning inversion over frequency maps. Memory follows free
/// host memory because the model is loaded whole.
pub static NEXTQSM_INVERSION: InterfaceSpec = InterfaceSpec {
    name: "nextqsm",
    stage: Stage::Inversion,
    ports: &[
        PortDescriptor::iter_input("phase", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::output("qsm", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Single,
    memory: MemoryPolicy::AvailableShare { cap_gb: 13.0 },
    scheduler_mem_gb: None,
};

/// Rapid two-step inversion over tissue frequency.
pub static RTS_INVERSION: InterfaceSpec = InterfaceSpec {
    name: "qsmjl_rts",
    stage: Stage::Inversion,
    ports: &[
        PortDescriptor::iter_input("tissue_frequency", ArtifactKind::Volume),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::input("vsz", ArtifactKind::ScalarList),
        PortDescriptor::input("b0_direction", ArtifactKind::ScalarList),
        PortDescriptor::output("qsm", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Capped(2),
    memory: MemoryPolicy::FixedGb(5.0),
    scheduler_mem_gb: None,
};

/// Total generalized variation inversion, single-step from unwrapped
/// (or raw) phase.
pub static TGV_INVERSION: InterfaceSpec = InterfaceSpec {
    name: "tgv",
    stage: Stage::Inversion,
    ports: &[
        PortDescriptor::iter_input("phase", ArtifactKind::Volume),
        PortDescriptor::iter_input("TE", ArtifactKind::Scalar),
        PortDescriptor::iter_input("mask", ArtifactKind::Volume),
        PortDescriptor::input("b0_strength", ArtifactKind::Scalar),
        PortDescriptor::output("qsm", ArtifactKind::Volume),
    ],
    identity: false,
    threads: ThreadPolicy::Capped(6),
    memory: MemoryPolicy::FixedGb(6.0),
    scheduler_mem_gb: None,
};

static CATALOG: [&InterfaceSpec; 13] = [
    &WORKFLOW_INPUTS,
    &WORKFLOW_OUTPUTS,
    &UNWRAPPED_PHASE_JUNCTION,
    &FREQUENCY_JUNCTION,
    &BF_JUNCTION,
    &LAPLACIAN_UNWRAPPING,
    &ROMEO_UNWRAPPING,
    &PHASE_TO_FREQUENCY,
    &VSHARP_BF_REMOVAL,
    &PDF_BF_REMOVAL,
    &NEXTQSM_INVERSION,
    &RTS_INVERSION,
    &TGV_INVERSION,
];

/// Every interface in the catalog.
pub fn all() -> &'static [&'static InterfaceSpec] {
    &CATALOG
}
