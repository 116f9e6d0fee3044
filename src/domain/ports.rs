use crate::domain::model::{Pairing, Participant, Roster};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where participants and couples come from (file, request body, ...).
pub trait RosterSource: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Result<Roster>> + Send;
}

/// One delivery channel. The dispatcher decides whom to skip and how often to
/// retry; a notifier only knows how to reach one address once.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    /// The giver's address on this channel, `None` if they have none.
    fn address<'a>(&self, giver: &'a Participant) -> Option<&'a str>;

    /// Reason recorded when [`Notifier::address`] returns `None`.
    fn missing_address_reason(&self) -> &'static str;

    async fn notify(&self, address: &str, pairing: &Pairing) -> Result<()>;
}

#[async_trait]
impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn channel(&self) -> &'static str {
        (**self).channel()
    }

    fn address<'a>(&self, giver: &'a Participant) -> Option<&'a str> {
        (**self).address(giver)
    }

    fn missing_address_reason(&self) -> &'static str {
        (**self).missing_address_reason()
    }

    async fn notify(&self, address: &str, pairing: &Pairing) -> Result<()> {
        (**self).notify(address, pairing).await
    }
}
