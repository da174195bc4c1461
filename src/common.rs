use std::env;
use std::fs;
use std::fs::File;
use std::path::PathBuf;
use anyhow::Context;
use chrono::{Local, SecondsFormat};
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};

/// Loads `.env` and sets up logging to the terminal and to a fresh file in `KRB_LOG_DIR`
/// (default `log`). `KRB_LOG_LEVEL` sets the terminal level.
pub fn setup() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let terminal_level = env::var("KRB_LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::Info);

    let log_dir = PathBuf::from(env::var("KRB_LOG_DIR").unwrap_or_else(|_| "log".to_owned()));
    fs::create_dir_all(&log_dir).with_context(|| format!("unable to create {}", log_dir.display()))?;

    // colons are not allowed in windows file names
    let date = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false).replace(':', "-");
    let log_path = log_dir.join(format!("{}.log", date));
    let log_file = File::create(&log_path).with_context(|| format!("unable to create {}", log_path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(terminal_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::max(), Config::default(), log_file),
    ])
    .context("logger was already initialized")?;

    Ok(())
}
