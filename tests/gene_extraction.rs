use codonsoup::engines::expression::{extract_genes, interpret_codons, ExpressionEngine};
use codonsoup::types::{PhenotypeVector, Trait, MAX_SPEED, MAX_TURN_RATE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_no_genes_without_start_and_stop() {
    assert!(extract_genes(&[0.5; 80]).is_empty());

    let mut only_start = vec![0.5; 80];
    only_start[10] = 0.99;
    assert!(extract_genes(&only_start).is_empty());

    let mut only_stop = vec![0.5; 80];
    only_stop[10] = 0.01;
    assert!(extract_genes(&only_stop).is_empty());
}

#[test]
fn test_single_gene_between_start_and_stop() {
    let genome = [0.5, 0.96, 0.4, 0.5, 0.6, 0.04, 0.5];
    let genes = extract_genes(&genome);

    assert_eq!(genes.len(), 1);
    assert_eq!(genes[0].start, 1);
    assert_eq!(genes[0].end, 5);
    assert_eq!(genes[0].content, vec![0.4, 0.5, 0.6]);
}

#[test]
fn test_two_starts_share_one_stop() {
    let mut genome = vec![0.5; 12];
    genome[1] = 0.96;
    genome[2] = 0.97;
    genome[3] = 0.4;
    genome[5] = 0.6;
    genome[6] = 0.04;

    let genes = extract_genes(&genome);
    assert_eq!(genes.len(), 2);
    assert_eq!((genes[0].start, genes[0].end), (1, 6));
    assert_eq!(genes[0].content, vec![0.97, 0.4, 0.5, 0.6]);
    assert_eq!((genes[1].start, genes[1].end), (2, 6));
    assert_eq!(genes[1].content, vec![0.4, 0.5, 0.6]);
}

#[test]
fn test_gene_length_bounds() {
    let gene_with = |inner: usize| {
        let mut genome = vec![0.5; 60];
        genome[5] = 0.96;
        genome[5 + inner + 1] = 0.04;
        extract_genes(&genome)
    };

    assert!(gene_with(2).is_empty());
    assert_eq!(gene_with(3).len(), 1);
    assert_eq!(gene_with(20).len(), 1);
    assert!(gene_with(21).is_empty());
}

#[test]
fn test_saturated_genome_terminates_with_no_genes() {
    assert!(extract_genes(&[0.99; 200]).is_empty());
    assert!(extract_genes(&[0.01; 200]).is_empty());
}

#[test]
fn test_interpretation_is_pure() {
    let content = [0.31, 0.62, 0.77, 0.45];
    let a = interpret_codons(&content);
    let b = interpret_codons(&content.to_vec());
    assert_eq!(a, b);
}

#[test]
fn test_expression_is_deterministic_and_in_range() {
    let engine = ExpressionEngine::default();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..200 {
        let len = rng.gen_range(50..=200);
        let genome: Vec<f64> = (0..len).map(|_| rng.gen::<f64>()).collect();

        let first = engine.express(&genome);
        let second = engine.express(&genome);
        assert_eq!(first, second);

        let p = first.phenotype;
        assert!((0.0..=MAX_SPEED).contains(&p.speed));
        assert!((0.0..=MAX_TURN_RATE).contains(&p.turn_rate));
        assert!((-1.0..=1.0).contains(&p.phototaxis));
        assert!((0.0..=1.0).contains(&p.efficiency));
        assert!(first.passes >= 1 && first.passes <= engine.config().max_passes);
    }
}

#[test]
fn test_neutral_genome_expresses_trait_midpoints() {
    let expression = ExpressionEngine::default().express(&[0.5; 100]);
    assert!(expression.genes.is_empty());
    assert_eq!(expression.passes, 1);
    assert_eq!(expression.phenotype, PhenotypeVector::default());
    assert_eq!(expression.phenotype.get(Trait::Speed), MAX_SPEED / 2.0);
}
