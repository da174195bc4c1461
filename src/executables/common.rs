use std::env;
use std::time::Duration;
use once_cell::sync::Lazy;

pub static FLOW_CLIENT: Lazy<String> = Lazy::new(|| {
    env::var("FLOW_CLIENT").unwrap_or_else(|_| "client1".to_owned())
});

pub static FLOW_SERVICE: Lazy<String> = Lazy::new(|| {
    env::var("FLOW_SERVICE").unwrap_or_else(|_| "FileServer".to_owned())
});

pub static FLOW_TICKET_DELAY: Lazy<Duration> = Lazy::new(|| millis_from_env("FLOW_TICKET_DELAY_MS"));

pub static FLOW_ACCESS_DELAY: Lazy<Duration> = Lazy::new(|| millis_from_env("FLOW_ACCESS_DELAY_MS"));

pub static FLOW_CONCURRENT_CLIENTS: Lazy<usize> = Lazy::new(|| {
    env::var("FLOW_CONCURRENT_CLIENTS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|count| *count > 0)
        .unwrap_or(1)
});

pub static FLOW_SIMULATED_CLOCK: Lazy<bool> = Lazy::new(|| {
    env::var("FLOW_SIMULATED_CLOCK")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(false)
});

fn millis_from_env(variable: &str) -> Duration {
    env::var(variable)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::ZERO)
}
