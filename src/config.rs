use std::ffi::OsString;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "PLANNER_DATA_DIR";
pub const APP_DIR_NAME: &str = "client-planner";

/// `--data-dir` wins, then `PLANNER_DATA_DIR`, then the platform data directory.
pub fn resolve_data_dir(
    explicit: Option<PathBuf>,
    env: Option<OsString>,
    platform: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
        .or_else(|| platform.map(|dir| dir.join(APP_DIR_NAME)))
}

#[cfg(feature = "app")]
#[derive(Debug, clap::Parser)]
#[command(name = "client-planner", version, about = "Calendar todo planner with client tags")]
pub struct Args {
    /// Directory holding todos.json, clients.json, settings.json and the log files.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is read or written.
    #[arg(long)]
    pub ephemeral: bool,

    /// Initially selected calendar date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_today)]
    pub today: Option<chrono::NaiveDate>,
}

#[cfg(feature = "app")]
impl Args {
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        resolve_data_dir(
            self.data_dir.clone(),
            std::env::var_os(DATA_DIR_ENV),
            dirs::data_dir(),
        )
    }
}

#[cfg(feature = "app")]
fn parse_today(raw: &str) -> Result<chrono::NaiveDate, String> {
    let day = chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date {raw:?}: {err}"))?;
    if !crate::dates::is_supported(day) {
        return Err(format!("invalid date {raw:?}: year must be between 1 and 9999"));
    }
    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let resolved = resolve_data_dir(
            Some(PathBuf::from("/explicit")),
            Some(OsString::from("/env")),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/explicit")));
    }

    #[test]
    fn env_then_platform_fallbacks() {
        let resolved = resolve_data_dir(
            None,
            Some(OsString::from("/env")),
            Some(PathBuf::from("/platform")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/env")));

        let resolved = resolve_data_dir(None, Some(OsString::new()), Some(PathBuf::from("/platform")));
        assert_eq!(resolved, Some(PathBuf::from("/platform").join(APP_DIR_NAME)));

        assert_eq!(resolve_data_dir(None, None, None), None);
    }

    #[cfg(feature = "app")]
    #[test]
    fn args_parse_flags() {
        use clap::Parser;

        let args = Args::try_parse_from([
            "client-planner",
            "--data-dir",
            "/tmp/planner",
            "--today",
            "2024-05-01",
        ])
        .expect("args should parse");
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/planner")));
        assert!(!args.ephemeral);
        assert_eq!(args.today, chrono::NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(args.resolved_data_dir(), Some(PathBuf::from("/tmp/planner")));

        assert!(Args::try_parse_from(["client-planner", "--today", "soon"]).is_err());
        assert!(Args::try_parse_from(["client-planner", "--today", "-0001-01-01"]).is_err());
        let args = Args::try_parse_from(["client-planner", "--ephemeral"]).unwrap();
        assert!(args.ephemeral);
    }
}
