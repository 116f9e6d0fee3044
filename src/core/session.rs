use crate::core::dispatch::Dispatcher;
use crate::core::engine::DrawEngine;
use crate::domain::model::{Assignment, DeliveryReport};
use crate::domain::ports::{Notifier, RosterSource};
use crate::utils::error::Result;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub assignment: Assignment,
    /// `None` when the session only drew and notified nobody.
    pub delivery: Option<DeliveryReport>,
}

/// Load roster, draw, notify. A draw failure stops the session before anyone
/// hears anything.
pub struct SantaSession<R: Rng, N: Notifier = Box<dyn Notifier>> {
    engine: DrawEngine<R>,
    dispatcher: Option<Dispatcher<N>>,
}

impl<R: Rng> SantaSession<R> {
    /// A session that draws without notifying anybody.
    pub fn new(engine: DrawEngine<R>) -> Self {
        Self {
            engine,
            dispatcher: None,
        }
    }
}

impl<R: Rng, N: Notifier> SantaSession<R, N> {
    pub fn with_dispatcher<M: Notifier>(self, dispatcher: Dispatcher<M>) -> SantaSession<R, M> {
        SantaSession {
            engine: self.engine,
            dispatcher: Some(dispatcher),
        }
    }

    pub async fn run<S: RosterSource>(&mut self, source: &S) -> Result<SessionOutcome> {
        tracing::info!("Loading participants...");
        let roster = source.load().await?;
        tracing::info!(
            "Loaded {} participants and {} couples",
            roster.participants.len(),
            roster.couples.len()
        );

        let assignment = self.engine.draw(&roster.participants, &roster.couples)?;
        tracing::info!("🎄 Secret Santa draw complete: {} pairs", assignment.len());

        let delivery = match &self.dispatcher {
            Some(dispatcher) => {
                tracing::info!("Sending {} notifications...", dispatcher.notifier().channel());
                let report = dispatcher.dispatch(&assignment).await;
                tracing::info!(
                    "Notifications: {} sent, {} skipped, {} failed",
                    report.sent(),
                    report.skipped(),
                    report.failed()
                );
                Some(report)
            }
            None => {
                tracing::info!("No notifier configured, nobody was notified");
                None
            }
        };

        Ok(SessionOutcome {
            assignment,
            delivery,
        })
    }
}
