use crate::kerberos::{open_ticket, Principal, SealedServiceTicket, Ticket, TicketFailure, TicketOpener};
use crate::time::Timestamp;

pub struct ServiceValidator {
    opener: TicketOpener,
}

impl ServiceValidator {
    pub fn new(opener: TicketOpener) -> Self {
        Self { opener }
    }

    pub fn validate(&self, ticket: &SealedServiceTicket, now: Timestamp) -> Result<Principal, TicketFailure> {
        self.inspect(ticket, now).map(|ticket| ticket.subject().clone())
    }

    /// Like [`Self::validate`] but hands back the whole ticket, including the service it
    /// was issued for.
    pub fn inspect(&self, ticket: &SealedServiceTicket, now: Timestamp) -> Result<Ticket, TicketFailure> {
        open_ticket(&self.opener, ticket.as_bytes(), now)
    }
}
