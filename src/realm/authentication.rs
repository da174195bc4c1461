use std::sync::Arc;
use std::time::Duration;
use log::debug;
use crate::kerberos::{AuthenticationFailure, Principal, PrincipalDirectory, RealmKey, SealedTgt, Ticket, TicketBox, TicketOpener};
use crate::time::Timestamp;

pub struct AuthenticationServer {
    directory: PrincipalDirectory,
    ticket_box: Arc<TicketBox>,
    tgt_lifetime: Duration,
}

impl AuthenticationServer {
    pub fn new(directory: PrincipalDirectory, key: RealmKey, tgt_lifetime: Duration) -> Self {
        Self {
            directory,
            ticket_box: Arc::new(TicketBox::new(key)),
            tgt_lifetime,
        }
    }

    pub fn authenticate(&self, principal: &Principal, now: Timestamp) -> Result<SealedTgt, AuthenticationFailure> {
        if !self.directory.exists(principal) {
            return Err(AuthenticationFailure::UnknownPrincipal(principal.clone()));
        }

        let ticket = Ticket::granting(principal.clone(), now, self.tgt_lifetime);

        debug!("sealing tgt for {} valid until {}", principal, ticket.expires_at());

        Ok(SealedTgt::new(self.ticket_box.seal(&ticket.encode())))
    }

    pub fn tgt_lifetime(&self) -> Duration {
        self.tgt_lifetime
    }

    pub fn tgt_opener(&self) -> TicketOpener {
        self.ticket_box.opener()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;
    use super::AuthenticationServer;
    use crate::kerberos::{AuthenticationFailure, Principal, PrincipalDirectory, RealmKey, Ticket, TicketKind};
    use crate::time::Timestamp;

    fn principal(name: &str) -> Principal {
        Principal::new(name).unwrap()
    }

    #[test]
    fn known_principals_get_a_tgt() {
        let server = AuthenticationServer::new(
            PrincipalDirectory::new([principal("client1"), principal("client2")]),
            RealmKey::generate(),
            Duration::from_secs(4),
        );
        let now = Timestamp::from_millis(1_700_000_000_000);

        for name in ["client1", "client2"] {
            let tgt = server.authenticate(&principal(name), now).unwrap();

            let plaintext = server.tgt_opener().open(tgt.as_bytes()).unwrap();
            let ticket = Ticket::decode(&plaintext).unwrap();

            assert_eq!(ticket.subject(), &principal(name));
            assert_eq!(ticket.kind(), TicketKind::Granting);
            assert_eq!(ticket.audience().as_str(), "TGS");
            assert_eq!(ticket.issued_at(), now);
            assert_eq!(ticket.expires_at(), Timestamp::from_millis(1_700_000_004_000));
        }
    }

    #[test]
    fn unknown_principals_are_refused() {
        let server = AuthenticationServer::new(
            PrincipalDirectory::new([principal("client1")]),
            RealmKey::generate(),
            Duration::from_secs(4),
        );

        assert_eq!(
            server.authenticate(&principal("ghost"), Timestamp::from_millis(0)),
            Err(AuthenticationFailure::UnknownPrincipal(principal("ghost")))
        );
    }

    #[test]
    fn sealed_tgt_does_not_reveal_the_principal() {
        let server = AuthenticationServer::new(
            PrincipalDirectory::new([principal("client1")]),
            RealmKey::generate(),
            Duration::from_secs(4),
        );

        let tgt = server.authenticate(&principal("client1"), Timestamp::from_millis(0)).unwrap();

        assert!(!tgt.as_bytes().windows(b"client1".len()).any(|w| w == b"client1"));
    }
}
