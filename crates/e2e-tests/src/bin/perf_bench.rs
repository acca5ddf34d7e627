use std::collections::BTreeMap;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use e2e_tests::{random_graph, RandomGraph, TestHarness};
use suggest_service::{SuggestHandler, SuggestRequest};
use suggest_types::{SuggestConfig, TopicId};

const DEFAULT_ITERATIONS: usize = 20;

#[derive(Parser, Debug)]
#[command(name = "perf_bench", about = "Topic suggestion latency benchmark")]
struct Args {
    #[arg(long, value_enum, default_value = "small")]
    tier: DatasetTier,
    #[arg(long, value_enum, default_value = "cold")]
    mode: RunMode,
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    #[arg(long, default_value_t = 42)]
    rng_seed: u64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum DatasetTier {
    Small,
    Medium,
}

impl DatasetTier {
    fn shape(self) -> RandomGraph {
        match self {
            DatasetTier::Small => RandomGraph::default(),
            DatasetTier::Medium => RandomGraph {
                topics: 300,
                links: 4_000,
                categories: 60,
                max_category_size: 30,
            },
        }
    }
}

/// Cold mode builds a fresh handler per query; warm mode reuses one so the
/// relatedness cache is shared.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum RunMode {
    Cold,
    Warm,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StepMetrics {
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
    samples: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct BenchmarkOutput {
    tier: DatasetTier,
    mode: RunMode,
    iterations: usize,
    steps: BTreeMap<String, StepMetrics>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.rng_seed);
    let shape = args.tier.shape();

    let start = Instant::now();
    let harness = TestHarness::new(&random_graph(&mut rng, shape));
    let load_ms = start.elapsed().as_secs_f64() * 1000.0;

    let warm_handler = harness.handler_with(SuggestConfig::default());
    let mut single = Vec::with_capacity(args.iterations);
    let mut multi = Vec::with_capacity(args.iterations);

    for _ in 0..args.iterations {
        for (samples, seed_count) in [(&mut single, 1), (&mut multi, 3)] {
            let seeds: Vec<TopicId> = (0..seed_count)
                .map(|_| rng.random_range(1..=shape.topics))
                .collect();
            let handler = match args.mode {
                RunMode::Cold => harness.handler(),
                RunMode::Warm => warm_handler.clone(),
            };
            samples.push(time_query(&handler, seeds).await?);
        }
    }

    let mut steps = BTreeMap::new();
    steps.insert("load_snapshot".to_string(), metrics(vec![load_ms]));
    steps.insert("query_single".to_string(), metrics(single));
    steps.insert("query_multi".to_string(), metrics(multi));

    let output = BenchmarkOutput {
        tier: args.tier,
        mode: args.mode,
        iterations: args.iterations,
        steps,
    };

    println!("{}", render_table(&output));
    let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
    println!("\n{}", json);
    Ok(())
}

async fn time_query(handler: &SuggestHandler, seeds: Vec<TopicId>) -> Result<f64, String> {
    let start = Instant::now();
    handler
        .suggest(&SuggestRequest::new(seeds))
        .await
        .map_err(|e| format!("Query failed: {e}"))?;
    Ok(start.elapsed().as_secs_f64() * 1000.0)
}

fn metrics(mut samples: Vec<f64>) -> StepMetrics {
    samples.sort_by(f64::total_cmp);
    StepMetrics {
        p50_ms: percentile(&samples, 50.0),
        p90_ms: percentile(&samples, 90.0),
        p99_ms: percentile(&samples, 99.0),
        samples: samples.len(),
    }
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let rank = (percentile / 100.0) * (values.len() as f64 - 1.0);
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high {
        values[low]
    } else {
        let weight = rank - low as f64;
        values[low] + (values[high] - values[low]) * weight
    }
}

fn render_table(output: &BenchmarkOutput) -> String {
    let mut lines = vec![
        format!(
            "Benchmark Results (tier={:?}, mode={:?}, iterations={})",
            output.tier, output.mode, output.iterations
        ),
        format!(
            "{:<16} {:>10} {:>10} {:>10} {:>8}",
            "step", "p50_ms", "p90_ms", "p99_ms", "samples"
        ),
    ];
    for (step, m) in &output.steps {
        lines.push(format!(
            "{:<16} {:>10.3} {:>10.3} {:>10.3} {:>8}",
            step, m.p50_ms, m.p90_ms, m.p99_ms, m.samples
        ));
    }
    lines.join("\n")
}
