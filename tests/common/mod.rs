//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use qsmflow_rs::config::WorkflowConfig;
use qsmflow_rs::workflow::ResourcePlanner;

/// Free-memory figure used by test planners so plans are reproducible.
pub const TEST_AVAILABLE_MEM_GB: f64 = 32.0;

/// Planner resolving against a fixed free-memory figure.
pub fn fixed_planner(config: &WorkflowConfig) -> ResourcePlanner {
    ResourcePlanner::with_available_memory(
        config.parallel,
        config.scheduler.clone(),
        TEST_AVAILABLE_MEM_GB,
    )
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
