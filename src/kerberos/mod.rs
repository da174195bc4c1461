//! Ticket model shared by every authority: field values, the principal directory, the
//! sealing box, the ticket codec and the failure taxonomy.

use thiserror::Error;
use crate::time::Timestamp;

pub mod crypto;
pub mod directory;
pub mod principal;
pub mod sealed;
pub mod ticket;

pub use crypto::{AuthFailure, RealmKey, TicketBox, TicketOpener};
pub use directory::PrincipalDirectory;
pub use principal::{Principal, ServiceName};
pub use sealed::{SealedServiceTicket, SealedTgt};
pub use ticket::{FormatError, Ticket, TicketKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationFailure {
    #[error("unknown principal {0}")]
    UnknownPrincipal(Principal),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketFailure {
    #[error("ticket could not be opened: {0}")]
    Forged(#[from] AuthFailure),
    #[error("ticket is malformed: {0}")]
    Malformed(#[from] FormatError),
    #[error("ticket expired at {expires_at}, it is now {now}")]
    Expired {
        expires_at: Timestamp,
        now: Timestamp,
    },
}

/// Opens, decodes and checks the expiry of a sealed ticket, in that order.
pub(crate) fn open_ticket(opener: &TicketOpener, sealed: &[u8], now: Timestamp) -> Result<Ticket, TicketFailure> {
    let plaintext = opener.open(sealed)?;

    let ticket = Ticket::decode(&plaintext)?;

    if !ticket.is_valid_at(now) {
        return Err(TicketFailure::Expired {
            expires_at: ticket.expires_at(),
            now,
        });
    }

    Ok(ticket)
}
