use codonsoup::config::MutationConfig;
use codonsoup::engines::generation::genome::{Genome, MAX_GENOME_LENGTH, MIN_GENOME_LENGTH};
use codonsoup::engines::generation::MutationEngine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_genome(rng: &mut StdRng, len: usize) -> Genome {
    Genome::new((0..len).map(|_| rng.gen::<f64>()).collect()).unwrap()
}

#[test]
fn test_point_mutation_rate_matches_configuration() {
    let engine = MutationEngine::new(MutationConfig::point_only(0.02));
    let mut rng = StdRng::seed_from_u64(7);

    let (mut changed, mut total) = (0usize, 0usize);
    for _ in 0..50 {
        let parent = random_genome(&mut rng, 200);
        let (child, report) = engine.mutate(&parent, &mut rng);
        assert_eq!(child.len(), parent.len());

        let diff = parent
            .iter()
            .zip(child.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(diff, report.point);
        changed += diff;
        total += parent.len();
    }

    let rate = changed as f64 / total as f64;
    assert!((rate - 0.02).abs() < 0.006, "observed point rate {}", rate);
}

#[test]
fn test_growth_is_skipped_at_maximum_length() {
    let engine = MutationEngine::new(MutationConfig {
        point_rate: 0.0,
        insertion_rate: 1.0,
        deletion_rate: 0.0,
        duplication_rate: 1.0,
        ..MutationConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(8);
    let parent = random_genome(&mut rng, MAX_GENOME_LENGTH);

    for _ in 0..100 {
        let (child, report) = engine.mutate(&parent, &mut rng);
        assert_eq!(child.len(), MAX_GENOME_LENGTH);
        assert_eq!(report.inserted + report.duplicated, 0);
        assert!(report.skipped > 0);
    }
}

#[test]
fn test_shrinking_is_skipped_at_minimum_length() {
    let engine = MutationEngine::new(MutationConfig {
        point_rate: 0.0,
        insertion_rate: 0.0,
        deletion_rate: 1.0,
        duplication_rate: 0.0,
        ..MutationConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(9);
    let parent = random_genome(&mut rng, MIN_GENOME_LENGTH);

    for _ in 0..100 {
        let (child, report) = engine.mutate(&parent, &mut rng);
        assert_eq!(child, parent);
        assert_eq!(report.deleted, 0);
        assert_eq!(report.skipped, MIN_GENOME_LENGTH);
    }
}

#[test]
fn test_lineage_stays_within_bounds() {
    let engine = MutationEngine::new(MutationConfig {
        point_rate: 0.05,
        insertion_rate: 0.04,
        deletion_rate: 0.04,
        duplication_rate: 0.5,
        ..MutationConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(10);
    let mut genome = random_genome(&mut rng, 120);

    for _ in 0..2000 {
        let (child, _) = engine.mutate(&genome, &mut rng);
        assert!((MIN_GENOME_LENGTH..=MAX_GENOME_LENGTH).contains(&child.len()));
        assert!(child.iter().all(|v| (0.0..=1.0).contains(v)));
        genome = child;
    }
}

#[test]
fn test_parent_is_not_modified() {
    let engine = MutationEngine::default();
    let mut rng = StdRng::seed_from_u64(11);
    let parent = random_genome(&mut rng, 100);
    let before = parent.clone();

    for _ in 0..20 {
        let _ = engine.mutate(&parent, &mut rng);
    }
    assert_eq!(parent, before);
}
