#[cfg(test)]
mod tests {
    use crate::cli::{
        Args, Command, ENV_EXTRACTION_API_KEY, ENV_LLM_API_KEY, ENV_SEARCH_API_KEY,
        apply_env_credentials,
    };
    use crate::config::{Config, LLMProvider};
    use clap::Parser;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_generate_command() {
        let args = Args::try_parse_from([
            "breach-intel",
            "generate",
            "--breach-id",
            "42",
            "--requester",
            "alice",
            "-o",
            "report.md",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Generate {
                breach_id: 42,
                requester: Some("alice".to_string()),
                output: Some(PathBuf::from("report.md")),
            }
        );
        assert!(!args.verbose);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_status_command() {
        let args = Args::try_parse_from(["breach-intel", "status", "--report-id", "abc"]).unwrap();
        assert_eq!(
            args.command,
            Command::Status {
                report_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["breach-intel"]).is_err());
        assert!(Args::try_parse_from(["breach-intel", "generate"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = Args::try_parse_from([
            "breach-intel",
            "generate",
            "--breach-id",
            "7",
            "--data-dir",
            "/tmp/intel",
            "--breaches",
            "/tmp/breaches.json",
            "--llm-provider",
            "anthropic",
            "--model",
            "claude-x",
            "--no-direct-fetch",
            "--max-reports-per-day",
            "3",
            "-v",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/intel"));
        assert_eq!(config.store.breaches_path, PathBuf::from("/tmp/breaches.json"));
        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-x");
        assert!(!config.fetch.direct_fetch_enabled);
        assert_eq!(config.quota.max_reports_per_day, 3);
        assert!(config.verbose);
    }

    #[test]
    fn test_unknown_provider_keeps_default() {
        let args = Args::try_parse_from([
            "breach-intel",
            "status",
            "--report-id",
            "abc",
            "--llm-provider",
            "nonsense",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_env_credentials() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LLM_API_KEY, "llm-key"),
            (ENV_SEARCH_API_KEY, "search-key"),
            (ENV_EXTRACTION_API_KEY, "  "),
        ]);

        let mut config = Config::default();
        apply_env_credentials(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.llm.api_key, "llm-key");
        assert_eq!(config.search.api_key.as_deref(), Some("search-key"));
        assert!(config.extraction.api_key.is_none());
    }

    #[test]
    fn test_cli_key_overrides_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[llm]\napi_key = \"from-file\"\nmodel = \"file-model\"\n\n[quota]\nmax_reports_per_day = 5"
        )
        .unwrap();

        let args = Args::try_parse_from([
            "breach-intel",
            "status",
            "--report-id",
            "abc",
            "--config",
            file.path().to_str().unwrap(),
            "--llm-api-key",
            "from-cli",
        ])
        .unwrap();

        let config = args.to_config().unwrap();
        assert_eq!(config.llm.api_key, "from-cli");
        assert_eq!(config.llm.model, "file-model");
        assert_eq!(config.quota.max_reports_per_day, 5);
    }

    #[test]
    fn test_verbose_from_config_file_survives_without_flag() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "verbose = true").unwrap();

        let args = Args::try_parse_from([
            "breach-intel",
            "status",
            "--report-id",
            "abc",
            "--config",
            file.path().to_str().unwrap(),
        ])
        .unwrap();

        assert!(!args.verbose);
        assert!(args.to_config().unwrap().verbose);
    }

    #[test]
    fn test_unreadable_config_file_is_an_error() {
        let args = Args::try_parse_from([
            "breach-intel",
            "status",
            "--report-id",
            "abc",
            "--config",
            "/nonexistent/breach-intel.toml",
        ])
        .unwrap();

        assert!(args.to_config().is_err());
    }
}
