use codonsoup::config::{PoolConfig, SelectionPolicy};
use codonsoup::engines::generation::genome::{starter_genome, Genome};
use codonsoup::pool::{GenePool, GenomePayload, LocalPoolService, PoolService};
use codonsoup::SyncError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;

fn genome(fill: f64) -> Genome {
    Genome::new(vec![fill; 64]).unwrap()
}

#[test]
fn test_concurrent_inserts_keep_top_entries() {
    const CAPACITY: usize = 25;
    const THREADS: usize = 8;
    const PER_THREAD: usize = 40;

    let pool = Arc::new(GenePool::with_capacity(CAPACITY));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let fitness = (i * THREADS + t) as f64;
                    pool.insert(genome(0.5), fitness, format!("client-{}", t));
                    assert!(pool.len() <= CAPACITY);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS * PER_THREAD;
    let fitnesses: Vec<f64> = pool.snapshot().iter().map(|e| e.fitness).collect();
    let expected: Vec<f64> = (total - CAPACITY..total).rev().map(|f| f as f64).collect();

    assert_eq!(pool.len(), CAPACITY.min(total));
    assert_eq!(fitnesses, expected);
}

#[test]
fn test_concurrent_reads_alongside_writes() {
    let pool = Arc::new(GenePool::with_capacity(10));
    pool.insert(starter_genome(), 1.0, "seed");

    let writer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            for i in 0..200 {
                pool.insert(genome(0.3), i as f64, "writer");
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|r| {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(r);
                for _ in 0..200 {
                    assert!(pool.select_immigrant(&mut rng).is_some());
                    let status = pool.pool_status();
                    assert!(status.total_genomes <= 10);
                    assert!(status.top_fitness >= status.avg_fitness);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(pool.len(), 10);
}

#[test]
fn test_under_capacity_nothing_is_evicted() {
    let pool = GenePool::with_capacity(100);
    for i in 0..30 {
        pool.insert(genome(0.5), i as f64, "c");
    }
    assert_eq!(pool.len(), 30);
}

#[test]
fn test_fitness_weighted_selection_favours_fit_genomes() {
    let pool = GenePool::new(&PoolConfig {
        capacity: 10,
        selection_policy: SelectionPolicy::FitnessWeighted,
        ..PoolConfig::default()
    });
    pool.insert(genome(0.2), 1.0, "weak");
    pool.insert(genome(0.8), 99.0, "strong");

    let mut rng = StdRng::seed_from_u64(5);
    let strong = (0..1000)
        .filter(|_| pool.select_immigrant(&mut rng).unwrap()[0] == 0.8)
        .count();
    assert!(strong > 950, "strong genome drawn {} times", strong);
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_service_treats_invalid_payloads_as_rejections() {
    let service = LocalPoolService::new(Arc::new(GenePool::with_capacity(5)));

    let short = GenomePayload {
        genome: vec![0.5; 49],
        fitness: 1.0,
        client_id: "c".to_string(),
    };
    let out_of_range = GenomePayload {
        genome: vec![1.2; 60],
        fitness: 1.0,
        client_id: "c".to_string(),
    };

    for payload in [short, out_of_range] {
        match service.submit(&payload) {
            Err(SyncError::Rejected(_)) => {}
            other => panic!("expected rejection, got {:?}", other),
        }
    }
    assert_eq!(service.pool_status().unwrap().total_genomes, 0);
}

#[test]
fn test_gene_stats_only_sample_top_genomes() {
    let pool = GenePool::new(&PoolConfig {
        capacity: 10,
        gene_stats_sample: 1,
        ..PoolConfig::default()
    });
    pool.insert(starter_genome(), 10.0, "best");
    pool.insert(genome(0.5), 1.0, "junk");

    let stats = pool.gene_stats();
    assert_eq!(stats.genomes_analyzed, 1);
    assert_eq!(stats.by_length[&3].count, 1);
    assert_eq!(stats.by_length[&3].avg_fitness, 10.0);
}
