pub mod authentication;
pub mod client;
pub mod config;
pub mod service;
pub mod ticket_granting;

use std::sync::Arc;
use crate::realm::authentication::AuthenticationServer;
use crate::realm::config::RealmConfig;
use crate::realm::service::ServiceValidator;
use crate::realm::ticket_granting::TicketGrantingServer;

#[derive(Clone)]
pub struct Realm {
    pub auth_server: Arc<AuthenticationServer>,
    pub tgs: Arc<TicketGrantingServer>,
    pub service: Arc<ServiceValidator>,
}

impl Realm {
    pub fn new(config: RealmConfig) -> Self {
        let RealmConfig {
            directory,
            lifetimes,
            as_key,
            tgs_key,
        } = config;

        let auth_server = AuthenticationServer::new(directory, as_key, lifetimes.tgt());
        let tgs = TicketGrantingServer::new(auth_server.tgt_opener(), tgs_key, lifetimes.service());
        let service = ServiceValidator::new(tgs.service_ticket_opener());

        Self {
            auth_server: Arc::new(auth_server),
            tgs: Arc::new(tgs),
            service: Arc::new(service),
        }
    }
}
