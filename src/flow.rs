//! Drives a client through the whole exchange: authentication, ticket granting and service
//! access, letting time pass on a [`Clock`] in between.

use std::sync::Arc;
use std::time::Duration;
use log::info;
use thiserror::Error;
use crate::kerberos::{AuthenticationFailure, Principal, ServiceName, TicketFailure};
use crate::realm::client::Client;
use crate::realm::Realm;
use crate::time::Clock;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationFailure),
    #[error("ticket-granting service refused the tgt: {0}")]
    TicketGranting(TicketFailure),
    #[error("service refused the ticket: {0}")]
    ServiceAccess(TicketFailure),
}

/// Time a client lets pass between the steps of a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowSchedule {
    pub before_ticket_request: Duration,
    pub before_service_access: Duration,
}

pub struct Flow<C: Clock> {
    realm: Realm,
    clock: Arc<C>,
}

impl<C: Clock> Clone for Flow<C> {
    fn clone(&self) -> Self {
        Self {
            realm: self.realm.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<C: Clock> Flow<C> {
    pub fn new(realm: Realm, clock: Arc<C>) -> Self {
        Self { realm, clock }
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs one full exchange for `principal` against `service` on a fork of the flow's
    /// clock, so concurrent runs never add up each other's waits.
    pub async fn run(
        &self,
        principal: Principal,
        service: &ServiceName,
        schedule: FlowSchedule,
    ) -> Result<Principal, FlowError> {
        let client = Client::new(principal);
        let clock = self.clock.fork();

        let tgt = client.request_authentication(&self.realm.auth_server, clock.now())?;

        clock.elapse(schedule.before_ticket_request).await;

        let ticket = client
            .request_service_ticket(&self.realm.tgs, &tgt, service, clock.now())
            .map_err(FlowError::TicketGranting)?;

        clock.elapse(schedule.before_service_access).await;

        let principal = client
            .access_service(&self.realm.service, &ticket, service, clock.now())
            .map_err(FlowError::ServiceAccess)?;

        info!("flow for {} on {} completed", principal, service);

        Ok(principal)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::time::Duration;
    use futures::future::join_all;
    use super::{Flow, FlowError, FlowSchedule};
    use crate::kerberos::{AuthFailure, AuthenticationFailure, Principal, PrincipalDirectory, SealedTgt, ServiceName, TicketFailure};
    use crate::realm::config::{RealmConfig, TicketLifetimes};
    use crate::realm::Realm;
    use crate::time::{Clock, ManualClock, Timestamp};

    const T0: Timestamp = Timestamp::from_millis(1_700_000_000_000);

    fn principal(name: &str) -> Principal {
        Principal::new(name).unwrap()
    }

    fn file_server() -> ServiceName {
        ServiceName::new("FileServer").unwrap()
    }

    fn flow(tgt_lifetime: Duration, service_lifetime: Duration) -> Flow<ManualClock> {
        let config = RealmConfig::new(
            PrincipalDirectory::new([principal("client1"), principal("client2")]),
            TicketLifetimes::new(tgt_lifetime, service_lifetime).unwrap(),
        );

        Flow::new(Realm::new(config), Arc::new(ManualClock::new(T0)))
    }

    #[tokio::test]
    async fn known_client_gets_access() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));

        let granted = flow.run(principal("client1"), &file_server(), FlowSchedule::default()).await;

        assert_eq!(granted, Ok(principal("client1")));
    }

    #[tokio::test]
    async fn immediate_exchange_step_by_step() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let realm = flow.realm();
        let now = flow.clock().now();

        let tgt = realm.auth_server.authenticate(&principal("client1"), now).unwrap();
        let ticket = realm.tgs.issue_service_ticket(&tgt, &file_server(), now).unwrap();

        assert_eq!(realm.service.validate(&ticket, now), Ok(principal("client1")));
    }

    #[tokio::test]
    async fn unknown_client_stops_at_authentication() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let schedule = FlowSchedule {
            before_ticket_request: Duration::from_secs(1),
            before_service_access: Duration::from_secs(1),
        };

        let denied = flow.run(principal("ghost"), &file_server(), schedule).await;

        assert_eq!(
            denied,
            Err(FlowError::Authentication(AuthenticationFailure::UnknownPrincipal(principal("ghost"))))
        );
        assert_eq!(flow.clock().now(), T0);
    }

    #[tokio::test]
    async fn tgt_expires_before_ticket_request() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let schedule = FlowSchedule {
            before_ticket_request: Duration::from_secs(5),
            ..Default::default()
        };

        let denied = flow.run(principal("client1"), &file_server(), schedule).await;

        assert_eq!(
            denied,
            Err(FlowError::TicketGranting(TicketFailure::Expired {
                expires_at: T0.saturating_add(Duration::from_secs(4)),
                now: T0.saturating_add(Duration::from_secs(5)),
            }))
        );
    }

    #[tokio::test]
    async fn service_ticket_expiry_boundary() {
        let on_time = FlowSchedule {
            before_service_access: Duration::from_secs(5),
            ..Default::default()
        };
        let late = FlowSchedule {
            before_service_access: Duration::from_millis(5_001),
            ..Default::default()
        };

        let flow_a = flow(Duration::from_secs(4), Duration::from_secs(5));
        assert_eq!(flow_a.run(principal("client1"), &file_server(), on_time).await, Ok(principal("client1")));

        let flow_b = flow(Duration::from_secs(4), Duration::from_secs(5));
        assert!(matches!(
            flow_b.run(principal("client1"), &file_server(), late).await,
            Err(FlowError::ServiceAccess(TicketFailure::Expired { .. }))
        ));
    }

    #[tokio::test]
    async fn service_ticket_outlives_its_tgt() {
        // the service ticket is checked against its own expiry, not the tgt's
        let flow = flow(Duration::from_secs(4), Duration::from_secs(10));
        let schedule = FlowSchedule {
            before_ticket_request: Duration::from_secs(3),
            before_service_access: Duration::from_secs(8),
        };

        assert_eq!(flow.run(principal("client2"), &file_server(), schedule).await, Ok(principal("client2")));
    }

    #[tokio::test]
    async fn corrupted_tgt_is_forged() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let realm = flow.realm();

        let tgt = realm.auth_server.authenticate(&principal("client1"), T0).unwrap();
        let mut bytes = tgt.into_bytes().to_vec();
        bytes[20] ^= 0x10;

        assert_eq!(
            realm.tgs.issue_service_ticket(&SealedTgt::from_bytes(bytes), &file_server(), T0),
            Err(TicketFailure::Forged(AuthFailure::TagMismatch))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_clients_share_one_realm() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));

        let runs = (0..64).map(|i| {
            let flow = flow.clone();
            let name = if i % 2 == 0 { "client1" } else { "client2" };

            tokio::spawn(async move {
                flow.run(principal(name), &file_server(), FlowSchedule::default()).await
            })
        });

        for (i, result) in join_all(runs).await.into_iter().enumerate() {
            let expected = if i % 2 == 0 { "client1" } else { "client2" };

            assert_eq!(result.unwrap(), Ok(principal(expected)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_waits_do_not_add_up() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let schedule = FlowSchedule {
            before_ticket_request: Duration::from_secs(3),
            before_service_access: Duration::from_secs(3),
        };

        let runs = (0..32).map(|_| {
            let flow = flow.clone();

            tokio::spawn(async move { flow.run(principal("client1"), &file_server(), schedule).await })
        });

        for result in join_all(runs).await {
            assert_eq!(result.unwrap(), Ok(principal("client1")));
        }

        assert_eq!(flow.clock().now(), T0);
    }

    #[tokio::test]
    async fn each_run_starts_from_the_shared_clock() {
        let flow = flow(Duration::from_secs(4), Duration::from_secs(4));
        let schedule = FlowSchedule {
            before_ticket_request: Duration::from_millis(4_001),
            ..Default::default()
        };

        flow.clock().advance(Duration::from_secs(60));

        assert_eq!(
            flow.run(principal("client1"), &file_server(), schedule).await,
            Err(FlowError::TicketGranting(TicketFailure::Expired {
                expires_at: T0.saturating_add(Duration::from_secs(64)),
                now: T0.saturating_add(Duration::from_millis(64_001)),
            }))
        );
    }
}
