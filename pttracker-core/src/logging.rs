use log::{LevelFilter, SetLoggerError};
use std::io::Write;
use std::str::FromStr;

/// Installs the process logger: `LEVEL: target - message` lines on stdout.
///
/// `level` is the baseline; `RUST_LOG` directives, when set, refine it per
/// module. Fails if a logger is already installed.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .filter_level(level)
        .parse_default_env()
        .try_init()
}

/// Parses `--log-level`. Accepts the `log` level names in any case, plus
/// `warning`.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    if level.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    LevelFilter::from_str(level).map_err(|_| format!("unknown log level: {level}"))
}
