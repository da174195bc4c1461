mod common;

use std::sync::Arc;
use anyhow::Context;
use futures::future::join_all;
use log::{error, info};
use tokio::task;
use rust_krb::common::setup;
use rust_krb::flow::{Flow, FlowSchedule};
use rust_krb::kerberos::{Principal, ServiceName};
use rust_krb::realm::config::RealmConfig;
use rust_krb::realm::Realm;
use rust_krb::result::ResultExtension;
use rust_krb::time::{Clock, ManualClock, SystemClock};
use crate::common::{FLOW_ACCESS_DELAY, FLOW_CLIENT, FLOW_CONCURRENT_CLIENTS, FLOW_SERVICE, FLOW_SIMULATED_CLOCK, FLOW_TICKET_DELAY};

async fn run_clients<C: Clock + 'static>(flow: Flow<C>, principal: Principal, service: ServiceName) -> usize {
    let schedule = FlowSchedule {
        before_ticket_request: *FLOW_TICKET_DELAY,
        before_service_access: *FLOW_ACCESS_DELAY,
    };

    let runs = (0..*FLOW_CONCURRENT_CLIENTS).map(|run| {
        let flow = flow.clone();
        let principal = principal.clone();
        let service = service.clone();

        task::spawn(async move {
            flow.run(principal, &service, schedule)
                .await
                .denied_or_some(format!("run {}", run))
        })
    });

    let mut granted = 0;

    for result in join_all(runs).await {
        match result {
            Ok(Some(_)) => granted += 1,
            Ok(None) => {}
            Err(e) => error!("client task failed: {}", e),
        }
    }

    granted
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup()?;

    let config = RealmConfig::from_env().context("invalid realm configuration")?;
    let realm = Realm::new(config);

    let principal = Principal::new(&FLOW_CLIENT).context("invalid FLOW_CLIENT")?;
    let service = ServiceName::new(&FLOW_SERVICE).context("invalid FLOW_SERVICE")?;

    info!(
        "running {} client(s) as {} against {}",
        *FLOW_CONCURRENT_CLIENTS, principal, service
    );

    let granted = if *FLOW_SIMULATED_CLOCK {
        let clock = Arc::new(ManualClock::new(SystemClock.now()));
        run_clients(Flow::new(realm, clock), principal, service).await
    } else {
        run_clients(Flow::new(realm, Arc::new(SystemClock)), principal, service).await
    };

    info!("{} of {} client(s) were granted access", granted, *FLOW_CONCURRENT_CLIENTS);

    Ok(())
}
