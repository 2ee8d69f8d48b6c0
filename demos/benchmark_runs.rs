//! Benchmark Runs
//!
//! This example runs a batch of GA attempts on every catalog function and
//! prints how the runs ended. Set `RUST_LOG=sbx_evo=debug` to follow each
//! generation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sbx_evo::prelude::*;
use tracing_subscriber::EnvFilter;

const RUNS_PER_FUNCTION: usize = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== SBX GA on the benchmark catalog ===\n");

    let mut rng = StdRng::seed_from_u64(42);

    for benchmark in Benchmark::catalog() {
        let config = RunConfig::for_benchmark(&benchmark).with_epsilons(1e-3, 1e-3);
        let engine = Evolution::new(config, &benchmark)?;
        let tally = engine.run_batch(RUNS_PER_FUNCTION, &mut rng)?;

        println!("{:<24} {}", benchmark.name(), tally);
    }

    // Watch a single run and report its fitness curve
    println!("\n--- One observed run on the V function ---\n");
    let v = Benchmark::new(BenchmarkKind::V);
    let engine = Evolution::new(RunConfig::for_benchmark(&v), &v)?;
    let report = engine.run_observed(&mut rng, &mut NoObserver)?;

    println!("Status: {:?}", report.status);
    println!("Generations: {}", report.generations);
    println!("Best point: {:?}", report.best.point());
    for record in report.history.records().iter().step_by(10) {
        println!(
            "  gen {:>4}: max fitness {:>8.3}, min value {:.6}",
            record.generation, record.fitness_max, record.value_min
        );
    }

    #[cfg(feature = "parallel")]
    {
        println!("\n--- Parallel batch on De Jong 2 ---\n");
        let rosenbrock = Benchmark::new(BenchmarkKind::DeJong2);
        let engine = Evolution::new(RunConfig::for_benchmark(&rosenbrock), &rosenbrock)?;
        let report = engine.run_batch_parallel(100, 7, &StopFlag::new())?;
        println!("{}", report.tally);
    }

    Ok(())
}
