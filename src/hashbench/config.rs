use super::error::BenchError;
use super::workload::{DEFAULT_SEED, Pattern};

/// One fixed-configuration comparison of every hashing strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    pub count: usize,
    pub spread: i32,
    pub trials: usize,
    pub seed: u64,
    pub pattern: Pattern,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            count: 200_000,
            spread: 4096,
            trials: 5,
            seed: DEFAULT_SEED,
            pattern: Pattern::Random,
        }
    }
}

impl BenchConfig {
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn spread(mut self, spread: i32) -> Self {
        self.spread = spread;
        self
    }

    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        validate(self.count, self.spread, self.trials)
    }
}

/// Cross product of counts and spreads, run for every pattern and strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub counts: Vec<usize>,
    pub spreads: Vec<i32>,
    pub trials: usize,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            counts: vec![50_000, 100_000, 200_000, 500_000, 1_000_000],
            spreads: vec![512, 1024, 2048, 4096, 8192, 16384],
            trials: 5,
            seed: DEFAULT_SEED,
        }
    }
}

impl SweepConfig {
    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        for &count in &self.counts {
            for &spread in &self.spreads {
                validate(count, spread, self.trials)?;
            }
        }
        Ok(())
    }
}

fn validate(count: usize, spread: i32, trials: usize) -> Result<(), BenchError> {
    if trials == 0 {
        return Err(BenchError::NoTrials);
    }
    if count == 0 {
        return Err(BenchError::EmptyWorkload);
    }
    if spread < 0 {
        return Err(BenchError::NegativeSpread(spread));
    }
    Ok(())
}
