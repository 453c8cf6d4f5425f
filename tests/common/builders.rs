//! Test data builders for run configurations

use qsmflow_rs::config::{SchedulerConfig, WorkflowConfig};
use qsmflow_rs::workflow::{BfRemovalAlgorithm, QsmAlgorithm, UnwrappingAlgorithm};

/// Builder for test run configurations.
///
/// Starts from a two-echo acquisition with the default inputs, which
/// most compositions accept; tests knock out exactly what they need.
pub struct ConfigBuilder {
    config: WorkflowConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        let mut config = WorkflowConfig::default();
        config.acquisition.echo_times = vec![0.004, 0.012];
        Self { config }
    }

    pub fn unwrapping(mut self, algorithm: UnwrappingAlgorithm) -> Self {
        self.config.unwrapping = Some(algorithm);
        self
    }

    pub fn inversion(mut self, algorithm: QsmAlgorithm) -> Self {
        self.config.qsm_algorithm = Some(algorithm);
        self
    }

    pub fn bf_algorithm(mut self, algorithm: BfRemovalAlgorithm) -> Self {
        self.config.bf_algorithm = algorithm;
        self
    }

    pub fn combine_phase(mut self) -> Self {
        self.config.combine_phase = true;
        self
    }

    pub fn budget(mut self, processes: u32, multiproc: bool) -> Self {
        self.config.parallel.processes = processes;
        self.config.parallel.multiproc = multiproc;
        self
    }

    pub fn echo_times(mut self, echo_times: &[f64]) -> Self {
        self.config.acquisition.echo_times = echo_times.to_vec();
        self
    }

    pub fn single_echo(mut self, echo_time: f64) -> Self {
        self.config.acquisition.echo_times.clear();
        self.config.acquisition.echo_time = Some(echo_time);
        self
    }

    pub fn no_echo_times(mut self) -> Self {
        self.config.acquisition.echo_times.clear();
        self.config.acquisition.echo_time = None;
        self
    }

    pub fn without_magnitude(mut self) -> Self {
        self.config.inputs.magnitude = false;
        self
    }

    pub fn with_frequency_input(mut self) -> Self {
        self.config.inputs.frequency = true;
        self
    }

    pub fn with_unwrapped_phase_input(mut self) -> Self {
        self.config.inputs.phase_unwrapped = true;
        self
    }

    pub fn scheduler(mut self, queue: &str) -> Self {
        self.config.scheduler = Some(SchedulerConfig::new(queue));
        self
    }

    pub fn build(self) -> WorkflowConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .unwrapping(UnwrappingAlgorithm::Romeo)
            .inversion(QsmAlgorithm::Rts)
            .budget(4, true)
            .build();

        assert_eq!(config.unwrapping, Some(UnwrappingAlgorithm::Romeo));
        assert_eq!(config.qsm_algorithm, Some(QsmAlgorithm::Rts));
        assert_eq!(config.parallel.processes, 4);
        assert!(config.parallel.multiproc);
        assert_eq!(config.acquisition.echo_times.len(), 2);
    }
}
