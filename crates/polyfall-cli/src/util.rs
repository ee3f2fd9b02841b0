use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Sends log records at `level` and above to `path`.
///
/// The terminal belongs to the UI, so a file is the only log sink.
pub fn init_logging(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} {l} {t} {m}{n}",
        )))
        .build(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .context("Failed to build logging configuration")?;
    log4rs::init_config(config).context("Failed to install logger")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use polyfall_engine::{FamilyKind, GameConfig};

    use super::*;

    #[test]
    fn test_read_json_file() {
        let path = env::temp_dir().join(format!("polyfall-config-{}.json", process::id()));
        fs::write(&path, r#"{ "family": "pentomino", "dropIntervalMs": 500 }"#).unwrap();
        let config: GameConfig = read_json_file("config", &path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.family, FamilyKind::Pentomino);
        assert_eq!(config.drop_interval_ms, 500);
        assert_eq!(config.board_width, 10);
    }

    #[test]
    fn test_read_json_file_reports_path() {
        let path = env::temp_dir().join("polyfall-no-such-config.json");
        let err = read_json_file::<GameConfig, _>("config", &path).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to open config file"), "{message}");
        assert!(message.contains("polyfall-no-such-config.json"), "{message}");
    }
}
