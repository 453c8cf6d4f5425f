//! Resource planning for workflow nodes.
//!
//! Every node carries a thread count, a memory reservation, and (for
//! cluster runs) a submission directive. Interfaces declare *policies*
//! describing how these figures relate to the run's process budget and
//! to free host memory; the [`ResourcePlanner`] resolves policies into
//! concrete [`ResourceSpec`]s at composition time.

use crate::config::{ParallelConfig, SchedulerConfig};
use crate::workflow::interfaces::InterfaceSpec;
use serde::Serialize;

/// Fraction of free host memory a memory-adaptive node may claim
pub const AVAILABLE_MEMORY_SHARE: f64 = 0.9;

/// Memory reserved for identity junctions, in gigabytes
pub const JUNCTION_MEM_GB: f64 = 0.2;

/// How a node's thread count follows from the process budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPolicy {
    /// Always one thread
    Single,
    /// At most the cap; never more than the budget when
    /// multiprocessing is on
    Capped(u32),
    /// The whole budget when multiprocessing is on, otherwise the
    /// given fallback
    FullBudgetOr(u32),
}

/// How a node's memory reservation is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemoryPolicy {
    /// Fixed reservation in gigabytes
    FixedGb(f64),
    /// A share of currently free host memory, capped
    AvailableShare { cap_gb: f64 },
}

/// Concrete resources planned for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSpec {
    /// Threads the node may use
    pub threads: u32,

    /// Memory reservation in gigabytes
    pub mem_gb: f64,

    /// Cluster submission directive, absent for local runs and for
    /// identity junctions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<String>,
}

/// Resolves interface resource policies against one run's budget.
///
/// Free host memory is probed once at construction so that every node
/// planned for the same run sees the same figure.
#[derive(Debug, Clone)]
pub struct ResourcePlanner {
    budget: ParallelConfig,
    scheduler: Option<SchedulerConfig>,
    available_mem_gb: f64,
}

impl ResourcePlanner {
    /// Create a planner, probing free host memory.
    pub fn new(budget: ParallelConfig, scheduler: Option<SchedulerConfig>) -> Self {
        Self::with_available_memory(budget, scheduler, probe_available_memory_gb())
    }

    /// Create a planner with a fixed free-memory figure. Used by tests
    /// and anywhere reproducible plans are needed.
    pub fn with_available_memory(
        budget: ParallelConfig,
        scheduler: Option<SchedulerConfig>,
        available_mem_gb: f64,
    ) -> Self {
        Self {
            budget,
            scheduler,
            available_mem_gb,
        }
    }

    /// The free-memory figure this planner resolves against, in GB.
    pub fn available_memory_gb(&self) -> f64 {
        self.available_mem_gb
    }

    /// Resolve a thread policy against the process budget.
    pub fn threads(&self, policy: ThreadPolicy) -> u32 {
        match policy {
            ThreadPolicy::Single => 1,
            ThreadPolicy::Capped(cap) => {
                if self.budget.multiproc {
                    cap.min(self.budget.processes)
                } else {
                    cap
                }
            }
            ThreadPolicy::FullBudgetOr(fallback) => {
                if self.budget.multiproc {
                    self.budget.processes
                } else {
                    fallback
                }
            }
        }
    }

    /// Resolve a memory policy against free host memory.
    pub fn memory_gb(&self, policy: MemoryPolicy) -> f64 {
        match policy {
            MemoryPolicy::FixedGb(gb) => gb,
            MemoryPolicy::AvailableShare { cap_gb } => {
                cap_gb.min(self.available_mem_gb * AVAILABLE_MEMORY_SHARE)
            }
        }
    }

    /// Plan concrete resources for one interface.
    ///
    /// Identity junctions never receive a submission directive; they
    /// run inline wherever the engine places them.
    pub fn plan(&self, interface: &InterfaceSpec) -> ResourceSpec {
        let threads = self.threads(interface.threads);
        let mem_gb = self.memory_gb(interface.memory);

        let submission = if interface.identity {
            None
        } else {
            self.scheduler.as_ref().map(|scheduler| {
                // Submission may reserve more than the runtime figure,
                // e.g. PDF runs in 5 GB but is submitted with 8.
                let submit_gb = interface.scheduler_mem_gb.unwrap_or(mem_gb);
                format!(
                    "queue={} walltime={} select=1:ncpus={}:mem={}gb",
                    scheduler.queue,
                    scheduler.walltime,
                    threads,
                    submit_gb.ceil() as u64
                )
            })
        };

        ResourceSpec {
            threads,
            mem_gb,
            submission,
        }
    }
}

/// Probe free host memory in gigabytes.
fn probe_available_memory_gb() -> f64 {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    system.available_memory() as f64 / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::interfaces;

    fn planner(processes: u32, multiproc: bool) -> ResourcePlanner {
        ResourcePlanner::with_available_memory(
            ParallelConfig {
                processes,
                multiproc,
            },
            None,
            32.0,
        )
    }

    #[test]
    fn test_capped_threads_respect_budget() {
        assert_eq!(planner(1, true).threads(ThreadPolicy::Capped(2)), 1);
        assert_eq!(planner(8, true).threads(ThreadPolicy::Capped(2)), 2);
        // Without multiprocessing the cap is taken as-is.
        assert_eq!(planner(1, false).threads(ThreadPolicy::Capped(2)), 2);
    }

    #[test]
    fn test_full_budget_threads() {
        assert_eq!(planner(4, true).threads(ThreadPolicy::FullBudgetOr(8)), 4);
        assert_eq!(planner(4, false).threads(ThreadPolicy::FullBudgetOr(8)), 8);
    }

    #[test]
    fn test_memory_share_is_capped() {
        let plenty = planner(1, false);
        assert_eq!(
            plenty.memory_gb(MemoryPolicy::AvailableShare { cap_gb: 13.0 }),
            13.0
        );

        let tight = ResourcePlanner::with_available_memory(ParallelConfig::default(), None, 8.0);
        let got = tight.memory_gb(MemoryPolicy::AvailableShare { cap_gb: 13.0 });
        assert!((got - 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_submission_without_scheduler() {
        let spec = planner(1, false).plan(&interfaces::TGV_INVERSION);
        assert!(spec.submission.is_none());
    }

    #[test]
    fn test_junctions_never_submitted() {
        let planner = ResourcePlanner::with_available_memory(
            ParallelConfig::default(),
            Some(SchedulerConfig::new("a12345")),
            32.0,
        );
        let spec = planner.plan(&interfaces::BF_JUNCTION);
        assert!(spec.submission.is_none());
        assert_eq!(spec.threads, 1);
        assert_eq!(spec.mem_gb, JUNCTION_MEM_GB);
    }

    #[test]
    fn test_submission_directive_format() {
        let planner = ResourcePlanner::with_available_memory(
            ParallelConfig {
                processes: 1,
                multiproc: false,
            },
            Some(SchedulerConfig::new("a12345")),
            32.0,
        );
        let spec = planner.plan(&interfaces::TGV_INVERSION);
        assert_eq!(
            spec.submission.as_deref(),
            Some("queue=a12345 walltime=01:00:00 select=1:ncpus=6:mem=6gb")
        );
    }

    #[test]
    fn test_submission_memory_override() {
        let planner = ResourcePlanner::with_available_memory(
            ParallelConfig::default(),
            Some(SchedulerConfig::new("a12345")),
            32.0,
        );
        // PDF reserves 5 GB at runtime but is submitted with 8.
        let spec = planner.plan(&interfaces::PDF_BF_REMOVAL);
        assert_eq!(spec.mem_gb, 5.0);
        assert!(spec.submission.as_deref().unwrap().ends_with("mem=8gb"));
    }
}
