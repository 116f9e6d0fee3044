use crate::core::feasibility::Constraints;
use crate::domain::model::{Assignment, Couple, Pairing, Participant};
use crate::utils::error::DrawError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    /// Independent construction attempts before giving up.
    pub max_attempts: usize,
    /// Run an exact matching check up front so infeasible couple layouts fail
    /// with `ImpossibleDraw` instead of burning every attempt.
    pub strict_feasibility: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            strict_feasibility: false,
        }
    }
}

/// Randomized greedy draw with whole-attempt retries.
///
/// Each attempt shuffles the giver order and the receiver pool, then walks the
/// givers picking uniformly among the receivers still legal for them. An
/// attempt that reaches a giver with no legal receiver is thrown away and the
/// next one starts from scratch.
///
/// The engine owns its random source; give each concurrent draw its own engine.
pub struct DrawEngine<R: Rng> {
    rng: R,
    options: DrawOptions,
}

impl DrawEngine<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Same seed, same input, same assignment.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DrawEngine<R> {
    pub fn new(rng: R) -> Self {
        Self::with_options(rng, DrawOptions::default())
    }

    pub fn with_options(rng: R, options: DrawOptions) -> Self {
        Self { rng, options }
    }

    pub fn options(&self) -> DrawOptions {
        self.options
    }

    pub fn set_options(&mut self, options: DrawOptions) {
        self.options = options;
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    pub fn draw(
        &mut self,
        participants: &[Participant],
        couples: &[Couple],
    ) -> Result<Assignment, DrawError> {
        let constraints = Constraints::build(participants, couples)?;

        if self.options.strict_feasibility && !constraints.has_complete_assignment() {
            return Err(DrawError::ImpossibleDraw {
                reason: "the couple constraints leave no valid assignment".to_string(),
            });
        }

        tracing::debug!(
            participants = participants.len(),
            couples = couples.len(),
            max_attempts = self.options.max_attempts,
            "Starting draw"
        );

        for attempt in 1..=self.options.max_attempts {
            if let Some(pairs) = self.attempt(&constraints) {
                tracing::debug!(attempt, "Draw completed");
                let pairings = pairs
                    .into_iter()
                    .map(|(giver, receiver)| Pairing {
                        giver: participants[giver].clone(),
                        receiver: participants[receiver].clone(),
                    })
                    .collect();
                return Ok(Assignment::new(pairings));
            }
        }

        tracing::warn!(
            attempts = self.options.max_attempts,
            "No valid draw found, giving up"
        );
        Err(DrawError::DrawExhausted {
            attempts: self.options.max_attempts,
        })
    }

    /// One independent pass. `None` on a dead end; partial work is dropped.
    fn attempt(&mut self, constraints: &Constraints) -> Option<Vec<(usize, usize)>> {
        let size = constraints.len();

        let mut givers: Vec<usize> = (0..size).collect();
        givers.shuffle(&mut self.rng);
        let mut pool: Vec<usize> = (0..size).collect();
        pool.shuffle(&mut self.rng);

        let mut pairs = Vec::with_capacity(size);
        for giver in givers {
            let legal: Vec<usize> = pool
                .iter()
                .enumerate()
                .filter(|&(_, &receiver)| constraints.is_legal(giver, receiver))
                .map(|(slot, _)| slot)
                .collect();

            let &slot = legal.choose(&mut self.rng)?;
            pairs.push((giver, pool.swap_remove(slot)));
        }

        Some(pairs)
    }
}

/// Draw with a fresh entropy-seeded engine and default options.
pub fn draw(participants: &[Participant], couples: &[Couple]) -> Result<Assignment, DrawError> {
    DrawEngine::from_entropy().draw(participants, couples)
}
