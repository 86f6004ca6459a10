// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the full runner pipeline.

use weigher_search::monitor::Violation;
use weigher_search::{BoardProfile, RunConfig, RunSize, TestRunner};

fn small_run(size: RunSize) -> RunConfig {
    RunConfig {
        trials_per_pair: 10,
        ..RunConfig::new(size)
    }
}

#[test]
fn test_quick_run_covers_all_pairs() {
    let monitor = TestRunner::new(small_run(RunSize::Quick)).run();
    let pairs: Vec<_> = monitor.pairs().collect();
    assert_eq!(pairs.len(), 18);
    for ((generator, algorithm), metrics) in monitor.pairs() {
        assert_eq!(
            metrics.trials(),
            10,
            "{}_{} ran the wrong trial count",
            generator.id(),
            algorithm.id()
        );
    }
}

#[test]
fn test_benchmark_run_covers_algorithm_head_to_head() {
    let monitor = TestRunner::new(small_run(RunSize::Benchmark)).run();
    assert_eq!(monitor.pairs().count(), 3);
    assert_eq!(monitor.total_trials(), 30);
}

#[test]
fn test_default_board_runs_clean() {
    // On the default board no pair should time out or blow the stack;
    // the greedy and sampling strategies fit comfortably.
    let monitor = TestRunner::new(small_run(RunSize::Quick)).run();
    for ((generator, algorithm), metrics) in monitor.pairs() {
        let violations = metrics.violations();
        assert_eq!(
            violations.get(Violation::Timeout),
            0,
            "{}_{} timed out",
            generator.id(),
            algorithm.id()
        );
        assert_eq!(violations.get(Violation::StackOverflow), 0);
        assert_eq!(violations.get(Violation::TrialPanic), 0);
    }
}

#[test]
fn test_constrained_board_degrades_but_completes() {
    // A 256-byte board forces the DP fallback every trial; the run must
    // still complete with every pair recorded.
    let mut config = small_run(RunSize::Benchmark);
    config.profile = BoardProfile {
        sram_bytes: 256,
        system_reserve_bytes: 0,
        ..Default::default()
    };
    let monitor = TestRunner::new(config).run();
    assert_eq!(monitor.total_trials(), 30);

    let dp_metrics = monitor
        .metrics(
            weigher_search::GeneratorKind::XorShift32,
            weigher_search::AlgorithmKind::DynamicProgramming,
        )
        .unwrap();
    assert_eq!(dp_metrics.violations().get(Violation::MemoryExceeded), 10);
    assert!(!dp_metrics.board_compatible(monitor.profile()));
}

#[test]
fn test_success_rates_are_plausible() {
    // Uniform batches nearly always contain a valid combination, so every
    // algorithm should do well on the xorshift generator. The operator
    // models produce harder batches and get no per-pair floor.
    let monitor = TestRunner::new(small_run(RunSize::Benchmark)).run();
    for ((generator, algorithm), metrics) in monitor.pairs() {
        assert!(
            metrics.success_rate() > 0.5,
            "{}_{} success rate {} implausibly low",
            generator.id(),
            algorithm.id(),
            metrics.success_rate()
        );
    }
}
