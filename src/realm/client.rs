use log::{info, warn};
use crate::kerberos::{AuthenticationFailure, Principal, SealedServiceTicket, SealedTgt, ServiceName, TicketFailure};
use crate::realm::authentication::AuthenticationServer;
use crate::realm::service::ServiceValidator;
use crate::realm::ticket_granting::TicketGrantingServer;
use crate::time::Timestamp;

#[derive(Clone, Debug)]
pub struct Client {
    principal: Principal,
}

impl Client {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn request_authentication(
        &self,
        auth_server: &AuthenticationServer,
        now: Timestamp,
    ) -> Result<SealedTgt, AuthenticationFailure> {
        info!("[client {}] requesting authentication", self.principal);

        match auth_server.authenticate(&self.principal, now) {
            Ok(tgt) => {
                info!(
                    "[AS] {} authenticated, tgt expires {}",
                    self.principal,
                    now.saturating_add(auth_server.tgt_lifetime())
                );
                Ok(tgt)
            }
            Err(e) => {
                warn!("[AS] authentication failed for {}: {}", self.principal, e);
                Err(e)
            }
        }
    }

    pub fn request_service_ticket(
        &self,
        tgs: &TicketGrantingServer,
        tgt: &SealedTgt,
        service: &ServiceName,
        now: Timestamp,
    ) -> Result<SealedServiceTicket, TicketFailure> {
        info!("[client {}] requesting a ticket for {}", self.principal, service);

        match tgs.issue_service_ticket(tgt, service, now) {
            Ok(ticket) => {
                info!(
                    "[TGS] issued ticket to {} for {}, expires {}",
                    self.principal,
                    service,
                    now.saturating_add(tgs.service_lifetime())
                );
                Ok(ticket)
            }
            Err(e) => {
                warn!("[TGS] refused tgt of {}: {}", self.principal, e);
                Err(e)
            }
        }
    }

    pub fn access_service(
        &self,
        validator: &ServiceValidator,
        ticket: &SealedServiceTicket,
        service: &ServiceName,
        now: Timestamp,
    ) -> Result<Principal, TicketFailure> {
        match validator.validate(ticket, now) {
            Ok(principal) => {
                info!("[client {}] access to {} granted", self.principal, service);
                Ok(principal)
            }
            Err(e) => {
                warn!("[client {}] access to {} denied: {}", self.principal, service, e);
                Err(e)
            }
        }
    }
}
