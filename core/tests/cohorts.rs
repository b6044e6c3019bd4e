//! Cohort classification.

use kiosk_core::{
    cohort::{Cohort, CohortClassifier},
    config::GeneratorConfig,
    registry::{RegistryGenerator, User},
    rng::{RngBank, StreamSlot},
};
use std::collections::HashMap;

fn users(n: usize, seed: u64) -> Vec<User> {
    let config = GeneratorConfig::default();
    let mut rng = RngBank::new(seed).for_stream(StreamSlot::Registry);
    RegistryGenerator::new(&config).generate_users(n, &mut rng)
}

#[test]
fn ten_users_at_five_percent_yield_one_abusive_user() {
    let users = users(10, 1);
    let mut rng = RngBank::new(1).for_stream(StreamSlot::Cohort);
    let cohorts = CohortClassifier::new(0.05).classify(&users, &mut rng);
    assert_eq!(cohorts.abusive_count(), 1);
    assert_eq!(
        users
            .iter()
            .filter(|u| cohorts.cohort_of(&u.user_id) == Cohort::Abusive)
            .count(),
        1
    );
}

#[test]
fn abusive_size_matches_floor_formula() {
    let mut rng = RngBank::new(2).for_stream(StreamSlot::Cohort);
    for n in [1usize, 19, 20, 50, 77, 100] {
        let users = users(n, n as u64);
        let cohorts = CohortClassifier::new(0.05).classify(&users, &mut rng);
        let expected = ((n as f64 * 0.05).floor() as usize).max(1);
        assert_eq!(cohorts.abusive_count(), expected, "n={n}");
        assert!(cohorts.abusive_users().all(|id| users.iter().any(|u| &u.user_id == id)));
    }
}

#[test]
fn empty_kiosk_has_no_abusive_users() {
    let mut rng = RngBank::new(3).for_stream(StreamSlot::Cohort);
    let cohorts = CohortClassifier::new(0.05).classify(&[], &mut rng);
    assert_eq!(cohorts.abusive_count(), 0);
}

#[test]
fn selection_is_roughly_uniform() {
    let users = users(10, 4);
    let mut rng = RngBank::new(4).for_stream(StreamSlot::Cohort);
    let classifier = CohortClassifier::new(0.05);
    let mut hits: HashMap<String, usize> = HashMap::new();
    const TRIALS: usize = 10_000;
    for _ in 0..TRIALS {
        for id in classifier.classify(&users, &mut rng).abusive_users() {
            *hits.entry(id.clone()).or_default() += 1;
        }
    }
    // Expected 1000 each; allow a wide margin.
    assert_eq!(hits.len(), 10);
    assert!(hits.values().all(|&h| (800..=1200).contains(&h)), "{hits:?}");
}

#[test]
fn planned_transactions_follow_cohort_ranges() {
    let config = GeneratorConfig::default();
    let mut rng = RngBank::new(5).for_stream(StreamSlot::Transaction);
    for _ in 0..1000 {
        let n = Cohort::Normal.planned_transactions(&config, &mut rng);
        assert!((2..=4).contains(&n), "normal planned {n}");
        let a = Cohort::Abusive.planned_transactions(&config, &mut rng);
        assert!((5..=7).contains(&a), "abusive planned {a}");
    }

    let wide = GeneratorConfig {
        normal_tx_base: 1,
        normal_tx_variance: 3,
        ..GeneratorConfig::default()
    };
    for _ in 0..1000 {
        let n = Cohort::Normal.planned_transactions(&wide, &mut rng);
        assert!((1..=4).contains(&n), "floored plan {n}");
    }
}
