//! Candidate sweeps: generate, evaluate, and optionally rank many designs.
//!
//! A [`Sweep`] is an iterator that produces one evaluated candidate per
//! `next()` call, so the host regains control between candidates (to
//! repaint, report progress, or simply stop pulling). All sweep state
//! lives in an owned [`BatchContext`]; nothing is shared between sweeps.
//!
//! Two ranking modes:
//!
//! - [`RankMode::Off`] keeps every candidate in generation order.
//! - [`RankMode::On`] keeps only the `retain` highest-scoring candidates,
//!   sorted best first. Every discarded candidate scores no higher than
//!   the lowest retained one.
//!
//! ```
//! use tinyhouse_logic::batch::{run_batch, BatchConfig, RankMode, SeedPlan};
//! use tinyhouse_logic::params::DesignParameters;
//! use tinyhouse_logic::tables::AnalyticsTables;
//!
//! let config = BatchConfig {
//!     count: 20,
//!     rank: RankMode::On { retain: 3 },
//!     seeds: SeedPlan::Sequence { base: 7 },
//! };
//! let tables = AnalyticsTables::default();
//! let result = run_batch(&DesignParameters::default(), None, &tables, &config);
//! assert_eq!(result.evaluated, 20);
//! assert_eq!(result.candidates.len(), 3);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::analytics::{compute_analytics, Analytics};
use crate::layout::{generate_layout, Design};
use crate::params::DesignParameters;
use crate::site::SiteContext;
use crate::tables::AnalyticsTables;

/// How candidates are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMode {
    /// Keep all candidates in generation order.
    Off,
    /// Keep the top `retain` candidates by score.
    On { retain: usize },
}

/// Where layout seeds come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedPlan {
    /// Reproducible seed stream derived from `base` (ChaCha8, stable
    /// across platforms and rand releases).
    Sequence { base: u64 },
    /// Fresh entropy for every candidate.
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub count: usize,
    pub rank: RankMode,
    pub seeds: SeedPlan,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 12,
            rank: RankMode::On { retain: 4 },
            seeds: SeedPlan::Random,
        }
    }
}

/// One evaluated design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub design: Design,
    pub analytics: Analytics,
}

impl Candidate {
    pub fn evaluate(
        seed: u32,
        params: &DesignParameters,
        site: Option<&SiteContext>,
        tables: &AnalyticsTables,
    ) -> Self {
        let design = generate_layout(seed, params);
        let analytics = compute_analytics(&design, site, tables);
        Self { design, analytics }
    }

    pub fn score(&self) -> f64 {
        self.analytics.score()
    }
}

// ============================================================================
// ACCUMULATOR
// ============================================================================

/// Running sweep statistics plus the retained candidate set.
#[derive(Debug, Clone)]
pub struct BatchContext {
    rank: RankMode,
    evaluated: usize,
    score_sum: f64,
    best_score: Option<f64>,
    retained: Vec<Candidate>,
}

impl BatchContext {
    pub fn new(rank: RankMode) -> Self {
        Self {
            rank,
            evaluated: 0,
            score_sum: 0.0,
            best_score: None,
            retained: Vec::new(),
        }
    }

    /// Fold a candidate into the statistics. Returns whether it was retained.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        let score = candidate.score();
        self.evaluated += 1;
        self.score_sum += score;
        self.best_score = Some(self.best_score.map_or(score, |best| best.max(score)));

        match self.rank {
            RankMode::Off => {
                self.retained.push(candidate);
                true
            }
            RankMode::On { retain } => {
                // Ties go after existing entries, so earlier candidates win.
                let at = self.retained.partition_point(|c| c.score() >= score);
                if at >= retain {
                    return false;
                }
                self.retained.insert(at, candidate);
                self.retained.truncate(retain);
                true
            }
        }
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    pub fn average_score(&self) -> Option<f64> {
        (self.evaluated > 0).then(|| self.score_sum / self.evaluated as f64)
    }

    /// Retained candidates; best first when ranking.
    pub fn retained(&self) -> &[Candidate] {
        &self.retained
    }

    pub fn finish(self) -> BatchResult {
        BatchResult {
            average_score: self.average_score(),
            best_score: self.best_score,
            evaluated: self.evaluated,
            candidates: self.retained,
        }
    }
}

/// Outcome of a completed sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub candidates: Vec<Candidate>,
    pub evaluated: usize,
    pub best_score: Option<f64>,
    pub average_score: Option<f64>,
}

impl BatchResult {
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .max_by(|a, b| a.score().total_cmp(&b.score()))
    }
}

// ============================================================================
// SWEEP
// ============================================================================

enum SeedSource {
    Sequence(ChaCha8Rng),
    Random,
}

impl SeedSource {
    fn new(plan: SeedPlan) -> Self {
        match plan {
            SeedPlan::Sequence { base } => Self::Sequence(ChaCha8Rng::seed_from_u64(base)),
            SeedPlan::Random => Self::Random,
        }
    }

    fn next_seed(&mut self) -> u32 {
        match self {
            Self::Sequence(rng) => rng.gen(),
            Self::Random => rand::random(),
        }
    }
}

/// Progress report yielded after each candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepStep {
    /// 1-based position in the sweep.
    pub index: usize,
    pub total: usize,
    pub seed: u32,
    pub score: f64,
    pub retained: bool,
    pub best_score: f64,
    pub average_score: f64,
}

/// Lazy candidate sweep. Each `next()` generates and scores one design.
pub struct Sweep<'a> {
    params: &'a DesignParameters,
    site: Option<&'a SiteContext>,
    tables: &'a AnalyticsTables,
    seeds: SeedSource,
    total: usize,
    context: BatchContext,
}

impl<'a> Sweep<'a> {
    pub fn new(
        params: &'a DesignParameters,
        site: Option<&'a SiteContext>,
        tables: &'a AnalyticsTables,
        config: &BatchConfig,
    ) -> Self {
        if config.count == 0 {
            log::warn!("Sweep requested with zero candidates");
        } else {
            log::info!(
                "Sweep started: {} candidates, rank {:?}, seeds {:?}",
                config.count,
                config.rank,
                config.seeds
            );
        }
        Self {
            params,
            site,
            tables,
            seeds: SeedSource::new(config.seeds),
            total: config.count,
            context: BatchContext::new(config.rank),
        }
    }

    pub fn context(&self) -> &BatchContext {
        &self.context
    }

    /// Drain any remaining candidates and return the result.
    pub fn finish(mut self) -> BatchResult {
        for _ in self.by_ref() {}
        let result = self.context.finish();
        if result.evaluated > 0 {
            log::info!(
                "Sweep finished: {} evaluated, {} retained, best {:.1}, avg {:.1}",
                result.evaluated,
                result.candidates.len(),
                result.best_score.unwrap_or(0.0),
                result.average_score.unwrap_or(0.0)
            );
        }
        result
    }
}

impl Iterator for Sweep<'_> {
    type Item = SweepStep;

    fn next(&mut self) -> Option<SweepStep> {
        if self.context.evaluated() >= self.total {
            return None;
        }
        let seed = self.seeds.next_seed();
        let candidate = Candidate::evaluate(seed, self.params, self.site, self.tables);
        let score = candidate.score();
        let retained = self.context.push(candidate);

        let step = SweepStep {
            index: self.context.evaluated(),
            total: self.total,
            seed,
            score,
            retained,
            best_score: self.context.best_score().unwrap_or(score),
            average_score: self.context.average_score().unwrap_or(score),
        };
        log::debug!(
            "Candidate {}/{} seed {} scored {:.1}{}",
            step.index,
            step.total,
            seed,
            score,
            if retained { "" } else { " (culled)" }
        );
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.context.evaluated();
        (left, Some(left))
    }
}

/// Run a whole sweep without observing intermediate steps.
pub fn run_batch(
    params: &DesignParameters,
    site: Option<&SiteContext>,
    tables: &AnalyticsTables,
    config: &BatchConfig,
) -> BatchResult {
    Sweep::new(params, site, tables, config).finish()
}
