//! Minimal timing harness for the `benches/` targets, which run with
//! `harness = false`.

use std::fs;
use std::io::{self, stdout, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{info, warn};

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n.max(1),
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    pub fn run(&self) -> BenchmarkResult {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        BenchmarkResult {
            name: self.name.clone(),
            iterations: self.iterations,
            total: start.elapsed(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkResult {
    pub name: String,
    pub iterations: usize,
    pub total: Duration,
}

impl BenchmarkResult {
    pub fn per_call(&self) -> Duration {
        self.total / self.iterations as u32
    }

    fn csv_line(&self) -> String {
        format!(
            "{},{},{},{}",
            self.name,
            self.per_call().as_micros(),
            self.iterations,
            self.total.as_millis()
        )
    }
}

pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            benches: vec![],
            results: vec![],
        }
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: &[Benchmark]) -> Self {
        let mut this = Self::new();
        for bench in benches {
            this.add_bench(bench.clone());
        }
        this
    }

    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }

    pub fn run(&mut self) {
        let mut out = stdout();
        for bench in &self.benches {
            self.results.push(bench.run());
            print!(".");
            let _ = out.flush();
        }
        println!("\n");
    }

    pub fn show(&self) {
        for r in &self.results {
            println!(
                "{}\n  per call: {}μs\n  total: {}ms\n",
                r.name,
                r.per_call().as_micros(),
                r.total.as_millis()
            )
        }
    }

    pub fn write_csv(&self, path: &PathBuf) -> io::Result<()> {
        let mut lines = vec!["benchmark,per_call_us,iterations,total_ms".to_string()];
        lines.extend(self.results.iter().map(BenchmarkResult::csv_line));
        lines.push(String::new());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, lines.join("\n"))
    }

    /// Run, print, and save `target/bench-<name>.csv`.
    pub fn report(&mut self, name: &str) {
        self.run();
        self.show();
        let path = PathBuf::from("target").join(format!("bench-{}.csv", name));
        match self.write_csv(&path) {
            Ok(()) => info!("wrote {}", path.display()),
            Err(e) => warn!("could not write {}: {}", path.display(), e),
        }
    }
}
