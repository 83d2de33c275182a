//! Tests for learning rate schedules
//!
//! This file tests the cyclical schedule including:
//! - Bounds of the triangle wave
//! - Period and phase of the oscillation
//! - Linear decay over the run
//! - Scheduler trait behaviour (step/reset)

use approx::assert_relative_eq;
use digit_ensemble::utils::{ConstantLR, CyclicalLR, LRScheduler};

// ============================================================================
// Bounds Tests
// ============================================================================

mod bounds_tests {
    use super::*;

    #[test]
    fn test_raw_rate_within_bounds() {
        for &(mean, oscillation, step_size, cycles) in
            &[(0.6, 0.4, 4, 5), (0.5, 0.25, 2, 3), (0.1, 0.1, 7, 2), (1.0, 0.0, 3, 1)]
        {
            let scheduler = CyclicalLR::new(mean, oscillation, step_size, cycles);
            for epoch in 0..scheduler.iterations() {
                let rate = scheduler.cyclical_rate(epoch);
                assert!(
                    rate >= scheduler.min_lr() - 1e-12 && rate <= scheduler.max_lr() + 1e-12,
                    "epoch {} rate {} outside [{}, {}]",
                    epoch,
                    rate,
                    scheduler.min_lr(),
                    scheduler.max_lr()
                );
            }
        }
    }

    #[test]
    fn test_decayed_rate_never_exceeds_raw_after_first_epoch() {
        let scheduler = CyclicalLR::new(0.6, 0.4, 4, 5);
        for epoch in 1..scheduler.iterations() {
            assert!(scheduler.rate_at(epoch) <= scheduler.cyclical_rate(epoch) + 1e-12);
            assert!(scheduler.rate_at(epoch) > 0.0);
        }
    }

    #[test]
    fn test_first_epoch_decay_factor() {
        let scheduler = CyclicalLR::new(0.6, 0.4, 4, 5);
        let iterations = scheduler.iterations() as f64;
        assert_relative_eq!(
            scheduler.rate_at(0),
            1.0 * (iterations + 1.0) / iterations
        );
    }
}

// ============================================================================
// Oscillation Tests
// ============================================================================

mod oscillation_tests {
    use super::*;

    #[test]
    fn test_period_is_two_step_sizes() {
        let scheduler = CyclicalLR::new(0.5, 0.2, 3, 4);
        for epoch in 0..scheduler.iterations() - 6 {
            assert_relative_eq!(
                scheduler.cyclical_rate(epoch),
                scheduler.cyclical_rate(epoch + 6),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_crest_and_trough() {
        let scheduler = CyclicalLR::new(0.5, 0.2, 3, 4);
        assert_relative_eq!(scheduler.cyclical_rate(0), 0.7, epsilon = 1e-12);
        assert_relative_eq!(scheduler.cyclical_rate(3), 0.3, epsilon = 1e-12);
        assert_relative_eq!(scheduler.cyclical_rate(6), 0.7, epsilon = 1e-12);
        // Linear in between.
        assert_relative_eq!(scheduler.cyclical_rate(1), 0.7 - 0.4 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_run_ends_near_minimum() {
        let scheduler = CyclicalLR::new(0.6, 0.4, 4, 5);
        let last = scheduler.iterations() - 1;
        assert_relative_eq!(scheduler.cyclical_rate(last), scheduler.min_lr(), epsilon = 1e-12);
        assert!(scheduler.rate_at(last) < scheduler.rate_at(0));
    }
}

// ============================================================================
// Trait Behaviour Tests
// ============================================================================

mod trait_tests {
    use super::*;

    #[test]
    fn test_step_walks_rate_at() {
        let reference = CyclicalLR::new(0.4, 0.3, 2, 2);
        let mut scheduler: Box<dyn LRScheduler> = Box::new(reference.clone());
        for epoch in 0..reference.iterations() {
            assert_relative_eq!(scheduler.get_lr(), reference.rate_at(epoch));
            scheduler.step();
        }
        scheduler.reset();
        assert_relative_eq!(scheduler.get_lr(), reference.rate_at(0));
    }

    #[test]
    fn test_constant_never_changes() {
        let mut scheduler = ConstantLR::new(0.25);
        for _ in 0..10 {
            assert_eq!(scheduler.get_lr(), 0.25);
            scheduler.step();
        }
    }
}
