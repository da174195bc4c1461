use std::sync::Arc;
use std::time::Duration;
use log::debug;
use crate::kerberos::{open_ticket, RealmKey, SealedServiceTicket, SealedTgt, ServiceName, Ticket, TicketBox, TicketFailure, TicketOpener};
use crate::time::Timestamp;

/// Opens tgts through a [`TicketOpener`], seals only with its own key.
pub struct TicketGrantingServer {
    tgt_opener: TicketOpener,
    ticket_box: Arc<TicketBox>,
    service_lifetime: Duration,
}

impl TicketGrantingServer {
    pub fn new(tgt_opener: TicketOpener, key: RealmKey, service_lifetime: Duration) -> Self {
        Self {
            tgt_opener,
            ticket_box: Arc::new(TicketBox::new(key)),
            service_lifetime,
        }
    }

    /// The ticket-granting ticket is not consumed and can be presented again as long as it
    /// is valid.
    pub fn issue_service_ticket(
        &self,
        tgt: &SealedTgt,
        service: &ServiceName,
        now: Timestamp,
    ) -> Result<SealedServiceTicket, TicketFailure> {
        let tgt = open_ticket(&self.tgt_opener, tgt.as_bytes(), now)?;

        debug!("tgt for {} valid until {}", tgt.subject(), tgt.expires_at());

        let ticket = Ticket::service(tgt.subject().clone(), service.clone(), now, self.service_lifetime);

        debug!("sealing service ticket for {} to {} valid until {}", ticket.subject(), service, ticket.expires_at());

        Ok(SealedServiceTicket::new(self.ticket_box.seal(&ticket.encode())))
    }

    pub fn service_lifetime(&self) -> Duration {
        self.service_lifetime
    }

    pub fn service_ticket_opener(&self) -> TicketOpener {
        self.ticket_box.opener()
    }
}
