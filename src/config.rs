use crate::cli::Cli;
use crate::sync::filter::FilenameFilter;

/// Application configuration, validated from the CLI.
///
/// Anything that can be rejected is rejected here, at startup, rather than
/// inside a sync cycle hours later: a malformed album id, an empty roster of
/// names, or an unparseable filename pattern all abort before the first
/// request is made.
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub album_id: String,
    pub person_names: Vec<String>,
    pub name_filters: Vec<String>,
    pub filter: FilenameFilter,
    pub interval_secs: u64,
    pub once: bool,
    pub dry_run: bool,
    pub notify_systemd: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("album_id", &self.album_id)
            .field("person_names", &self.person_names)
            .field("name_filters", &self.name_filters)
            .field("interval_secs", &self.interval_secs)
            .finish_non_exhaustive()
    }
}

fn trimmed(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let base_url = cli.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            anyhow::bail!("--base-url (or IMMICH_BASE_URL) must not be empty");
        }

        let album_id = match cli.album_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => anyhow::bail!(
                "--album-id (or IMMICH_ALBUM_ID) is required; \
                 use --find-album to look one up by name"
            ),
        };
        if uuid::Uuid::parse_str(&album_id).is_err() {
            anyhow::bail!("'{}' is not a valid album id (expected a UUID)", album_id);
        }

        let person_names = trimmed(&cli.persons);
        if person_names.is_empty() {
            anyhow::bail!("at least one --person (or IMMICH_PERSONS) is required");
        }

        let name_filters = trimmed(&cli.name_filters);
        let filter = FilenameFilter::new(&name_filters)
            .map_err(|e| anyhow::anyhow!("invalid --name-filter pattern: {}", e))?;

        Ok(Self {
            base_url,
            api_key: cli.api_key,
            album_id,
            person_names,
            name_filters,
            filter,
            interval_secs: cli.interval,
            once: cli.once,
            dry_run: cli.dry_run,
            notify_systemd: cli.notify_systemd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const ALBUM_ID: &str = "7c9a1a60-2c0e-4bb0-9d2a-6fb8a2c3d4e5";

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "immich-album-sync",
            "--base-url",
            "https://immich.test",
            "--api-key",
            "super-secret",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_from_cli_minimal() {
        let cli = parse(&["--album-id", ALBUM_ID, "--person", "Alice"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.base_url, "https://immich.test");
        assert_eq!(config.album_id, ALBUM_ID);
        assert_eq!(config.person_names, ["Alice"]);
        assert_eq!(config.interval_secs, 3600);
        assert!(config.name_filters.is_empty());
        assert!(config.filter.is_empty());
        assert!(!config.once);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let cli = Cli::try_parse_from([
            "immich-album-sync",
            "--base-url",
            "https://immich.test/",
            "--api-key",
            "super-secret",
            "--album-id",
            ALBUM_ID,
            "--person",
            "Alice",
        ])
        .unwrap();
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.base_url, "https://immich.test");
    }

    #[test]
    fn test_album_id_is_required() {
        let cli = parse(&["--person", "Alice"]);
        let err = Config::from_cli(cli).unwrap_err();
        assert!(err.to_string().contains("--album-id"));
    }

    #[test]
    fn test_album_id_must_be_a_uuid() {
        let cli = parse(&["--album-id", "family-album", "--person", "Alice"]);
        let err = Config::from_cli(cli).unwrap_err();
        assert!(err.to_string().contains("UUID"));
    }

    #[test]
    fn test_at_least_one_person_is_required() {
        let cli = parse(&["--album-id", ALBUM_ID]);
        let err = Config::from_cli(cli).unwrap_err();
        assert!(err.to_string().contains("--person"));
    }

    #[test]
    fn test_person_names_are_trimmed_and_blanks_dropped() {
        let cli = parse(&["--album-id", ALBUM_ID, "--person", " Alice , Bob ,, "]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.person_names, ["Alice", "Bob"]);
    }

    #[test]
    fn test_invalid_name_filter_is_rejected() {
        let cli = parse(&[
            "--album-id",
            ALBUM_ID,
            "--person",
            "Alice",
            "--name-filter",
            "[z-a]",
        ]);
        let err = Config::from_cli(cli).unwrap_err();
        assert!(err.to_string().contains("--name-filter"));
    }

    #[test]
    fn test_zero_interval_is_a_parse_error() {
        let result = Cli::try_parse_from([
            "immich-album-sync",
            "--base-url",
            "https://immich.test",
            "--api-key",
            "super-secret",
            "--interval",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cli = parse(&["--album-id", ALBUM_ID, "--person", "Alice"]);
        let config = Config::from_cli(cli).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
