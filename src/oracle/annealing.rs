use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::OracleError;
use crate::qubo::{Assignment, QuboModel};

use super::OptimizationOracle;
use super::budget::TimeBudget;

const FINAL_TEMPERATURE_RATIO: f64 = 1e-4;

/// Simulated annealing on the penalised energy
/// `objective + penalties + λ · violation`.
///
/// Moves are single-bit flips and, when possible, swaps of one selected and
/// one unselected variable (which keep the edge count unchanged). The RNG is
/// seeded once per oracle, so repeated calls explore differently while a whole
/// run stays reproducible.
#[derive(Debug, Clone)]
pub struct AnnealingOracle {
    rng: StdRng,
    sweeps: usize,
    restarts: usize,
    timeout: Duration,
}

impl AnnealingOracle {
    #[must_use]
    pub fn new(seed: u64, sweeps: usize, restarts: usize, timeout: Duration) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sweeps: sweeps.max(1),
            restarts: restarts.max(1),
            timeout,
        }
    }

    fn anneal(
        &mut self,
        model: &QuboModel,
        penalty_weight: f64,
        budget: &TimeBudget,
    ) -> Result<(Vec<bool>, f64), OracleError> {
        let variables = model.variable_count();
        let mut current: Vec<bool> = (0..variables).map(|_| self.rng.random_bool(0.5)).collect();
        let mut current_energy = model.penalized_energy(&current, penalty_weight);
        let mut best = current.clone();
        let mut best_energy = current_energy;

        let steps = self.sweeps.saturating_mul(variables);
        let initial_temperature = penalty_weight.max(1.0);
        let cooling = FINAL_TEMPERATURE_RATIO.powf(1.0 / steps.max(1) as f64);
        let mut temperature = initial_temperature;

        for step in 0..steps {
            if step % variables == 0 {
                budget.check()?;
            }

            let flipped = self.propose(&current);
            for &index in &flipped {
                current[index] = !current[index];
            }
            let candidate_energy = model.penalized_energy(&current, penalty_weight);
            let delta = candidate_energy - current_energy;

            if delta <= 0.0 || self.rng.random::<f64>() < (-delta / temperature).exp() {
                current_energy = candidate_energy;
                if current_energy < best_energy {
                    best_energy = current_energy;
                    best.clone_from(&current);
                }
            } else {
                for &index in &flipped {
                    current[index] = !current[index];
                }
            }

            temperature *= cooling;
        }

        Ok((best, best_energy))
    }

    /// Indices to flip for the next move.
    fn propose(&mut self, bits: &[bool]) -> Vec<usize> {
        let variables = bits.len();
        if self.rng.random_bool(0.5) {
            let on: Vec<usize> = (0..variables).filter(|&i| bits[i]).collect();
            let off: Vec<usize> = (0..variables).filter(|&i| !bits[i]).collect();
            if !on.is_empty() && !off.is_empty() {
                let a = on[self.rng.random_range(0..on.len())];
                let b = off[self.rng.random_range(0..off.len())];
                return vec![a, b];
            }
        }
        vec![self.rng.random_range(0..variables)]
    }
}

impl OptimizationOracle for AnnealingOracle {
    fn name(&self) -> &str {
        "annealing"
    }

    fn solve(&mut self, model: &QuboModel) -> Result<Assignment, OracleError> {
        if model.variable_count() == 0 {
            return Ok(Assignment::new());
        }

        let budget = TimeBudget::start(self.timeout);
        let penalty_weight = model.default_penalty_weight();
        let mut best: Option<(Vec<bool>, f64)> = None;

        for restart in 0..self.restarts {
            let (bits, energy) = self.anneal(model, penalty_weight, &budget)?;
            tracing::trace!(restart, energy, "annealing restart finished");
            if best.as_ref().is_none_or(|(_, best_energy)| energy < *best_energy) {
                best = Some((bits, energy));
            }
        }

        let (bits, energy) = best.ok_or_else(|| OracleError::Backend("no restarts ran".into()))?;
        tracing::debug!(
            energy,
            feasible = model.is_feasible(&bits),
            elapsed_ms = budget.elapsed().as_millis(),
            "annealing finished"
        );
        Ok(Assignment::from_bits(&bits))
    }
}
