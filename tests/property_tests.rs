//! Property-based tests over the whole configuration space.
//!
//! Every optional input is declared available so that only genuinely
//! impossible selections (a frequency-based inversion with no
//! unwrapping path) fail to compose; everything that composes must
//! uphold the structural guarantees below.

mod common;

use common::fixed_planner;
use proptest::option;
use proptest::prelude::*;
use qsmflow_rs::config::WorkflowConfig;
use qsmflow_rs::workflow::{
    validate, BfRemovalAlgorithm, QsmAlgorithm, Stage, UnwrappingAlgorithm, WorkflowComposer,
};

fn unwrapping_strategy() -> impl Strategy<Value = Option<UnwrappingAlgorithm>> {
    option::of(prop_oneof![
        Just(UnwrappingAlgorithm::Laplacian),
        Just(UnwrappingAlgorithm::Romeo),
    ])
}

fn inversion_strategy() -> impl Strategy<Value = QsmAlgorithm> {
    prop_oneof![
        Just(QsmAlgorithm::Nextqsm),
        Just(QsmAlgorithm::Rts),
        Just(QsmAlgorithm::Tgv),
    ]
}

fn bf_strategy() -> impl Strategy<Value = BfRemovalAlgorithm> {
    prop_oneof![
        Just(BfRemovalAlgorithm::Vsharp),
        Just(BfRemovalAlgorithm::Pdf),
    ]
}

prop_compose! {
    fn config_strategy()(
        unwrapping in unwrapping_strategy(),
        inversion in inversion_strategy(),
        bf_algorithm in bf_strategy(),
        combine_phase in any::<bool>(),
        processes in 1u32..=32,
        multiproc in any::<bool>(),
    ) -> WorkflowConfig {
        let mut config = WorkflowConfig::default();
        config.unwrapping = unwrapping;
        config.qsm_algorithm = Some(inversion);
        config.bf_algorithm = bf_algorithm;
        config.combine_phase = combine_phase;
        config.parallel.processes = processes;
        config.parallel.multiproc = multiproc;
        config.inputs.frequency = true;
        config.inputs.phase_unwrapped = true;
        config.acquisition.echo_times = vec![0.004, 0.012];
        config
    }
}

proptest! {
    #[test]
    fn test_composition_is_deterministic(config in config_strategy()) {
        let planner = fixed_planner(&config);
        let first = WorkflowComposer::compose_with_planner(&config, &planner);
        let second = WorkflowComposer::compose_with_planner(&config, &planner);

        // Property: composing the same configuration twice yields the
        // same graph (or the same error).
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_composed_graphs_validate(config in config_strategy()) {
        if let Ok(graph) = WorkflowComposer::compose_with_planner(&config, &fixed_planner(&config)) {
            // Property: anything the composer hands out passes the
            // structural validator.
            prop_assert!(validate(&graph).is_ok());
        }
    }

    #[test]
    fn test_bf_removal_exists_iff_rts(config in config_strategy()) {
        if let Ok(graph) = WorkflowComposer::compose_with_planner(&config, &fixed_planner(&config)) {
            let work = graph
                .stage_nodes(Stage::BfRemoval)
                .filter(|n| !n.is_identity())
                .count();

            // Property: exactly one background-field removal node for
            // RTS, none for the algorithms that work on other inputs.
            let expected = if config.qsm_algorithm == Some(QsmAlgorithm::Rts) { 1 } else { 0 };
            prop_assert_eq!(work, expected);
        }
    }

    #[test]
    fn test_threads_respect_multiproc_budget(config in config_strategy()) {
        if let Ok(graph) = WorkflowComposer::compose_with_planner(&config, &fixed_planner(&config)) {
            for node in graph.nodes() {
                // Property: every node gets at least one thread, and
                // never more than the budget when multiprocessing.
                prop_assert!(node.resources().threads >= 1);
                if config.parallel.multiproc {
                    prop_assert!(
                        node.resources().threads <= config.parallel.processes,
                        "{} exceeds the budget",
                        node.name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_frequency_stage_exists_iff_needed(config in config_strategy()) {
        if let Ok(graph) = WorkflowComposer::compose_with_planner(&config, &fixed_planner(&config)) {
            let needed = config
                .qsm_algorithm
                .map(|a| a.needs_frequency())
                .unwrap_or(false);

            // Property: the frequency junction appears exactly when the
            // selected inversion consumes a frequency map.
            prop_assert_eq!(graph.find_node("frequency-inputs").is_some(), needed);
        }
    }
}
