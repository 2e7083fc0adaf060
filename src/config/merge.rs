//! Precedence merge: CLI > Env > File > Defaults

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::env::{env_var_name, Env};
use super::error::ConfigError;
use super::loader::{discover_config, load_config_file, ConfigFile, Discovery, LoadOptions};
use crate::domain::{
    ConfigSource, InvalidValue, OptionKey, OptionValue, OutputFormat, ValueSource,
};

/// Values supplied on the command line. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub output: Option<String>,
    pub verbose: Option<bool>,
    pub quiet: Option<bool>,
}

impl CliOverrides {
    pub fn value(&self, key: OptionKey) -> Option<OptionValue> {
        let text = |v: &Option<String>| v.clone().map(OptionValue::Text);
        match key {
            OptionKey::ConfigPath => self
                .config
                .as_ref()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| OptionValue::Text(p.display().to_string())),
            OptionKey::Profile => text(&self.profile),
            OptionKey::Region => text(&self.region),
            OptionKey::OutputFormat => text(&self.output),
            OptionKey::Verbose => self.verbose.map(OptionValue::Bool),
            OptionKey::Quiet => self.quiet.map(OptionValue::Bool),
        }
    }
}

/// One resolved option and the source that won.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub value: Option<OptionValue>,
    pub source: ValueSource,
}

/// Result of merging every configuration source for this process.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    source: ConfigSource,
    probed: Vec<PathBuf>,
    values: BTreeMap<OptionKey, ResolvedValue>,
    file: Option<ConfigFile>,
    env: Env,
}

impl ResolvedConfig {
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Search candidates checked during discovery, in order.
    pub fn probed(&self) -> &[PathBuf] {
        &self.probed
    }

    pub fn get(&self, key: OptionKey) -> Option<&ResolvedValue> {
        self.values.get(&key)
    }

    pub fn value(&self, key: OptionKey) -> Option<&OptionValue> {
        self.get(key).and_then(|resolved| resolved.value.as_ref())
    }

    /// Resolved options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &ResolvedValue)> {
        self.values.iter().map(|(key, resolved)| (*key, resolved))
    }

    pub fn text(&self, key: OptionKey) -> Option<String> {
        self.value(key).map(ToString::to_string)
    }

    pub fn profile(&self) -> Option<String> {
        self.text(OptionKey::Profile)
    }

    pub fn region(&self) -> Option<String> {
        self.text(OptionKey::Region)
    }

    pub fn output_format(&self) -> Result<OutputFormat, InvalidValue> {
        match self.value(OptionKey::OutputFormat) {
            None => Ok(OutputFormat::default()),
            Some(value) => value.to_string().parse(),
        }
    }

    pub fn flag(&self, key: OptionKey) -> Result<bool, InvalidValue> {
        match self.value(key) {
            None => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| InvalidValue {
                key: key.name().to_string(),
                value: value.to_string(),
                expected: "a boolean (true/false)",
            }),
        }
    }

    pub fn verbose(&self) -> Result<bool, InvalidValue> {
        self.flag(OptionKey::Verbose)
    }

    pub fn quiet(&self) -> Result<bool, InvalidValue> {
        self.flag(OptionKey::Quiet)
    }

    /// Resolve any key by name, including keys no [`OptionKey`] declares.
    ///
    /// Undeclared keys have no flag and no default, so only the environment
    /// (`AFT_<NAME>`) and the config file are consulted, in that order.
    pub fn lookup(&self, name: &str) -> Option<ResolvedValue> {
        if let Some(key) = OptionKey::ALL.into_iter().find(|k| k.name() == name) {
            return self.get(key).cloned();
        }

        let env_name = env_var_name(name);
        if let Some(raw) = self.env.get(&env_name) {
            return Some(ResolvedValue {
                value: Some(OptionValue::Text(raw)),
                source: ValueSource::Env(env_name),
            });
        }

        let file = self.file.as_ref()?;
        let value = OptionValue::from_yaml(file.get(name)?.clone())?;
        Some(ResolvedValue { value: Some(value), source: ValueSource::File(file.path.clone()) })
    }
}

/// Explicit config path: `--config`, else `AFT_CONFIG`.
pub fn explicit_config_path(cli: &CliOverrides, env: &Env) -> Option<PathBuf> {
    cli.config
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| env.get(&OptionKey::ConfigPath.env_var()).map(PathBuf::from))
}

/// Discover, load and merge. Runs every filesystem step the resolver needs.
pub fn resolve(
    cli: &CliOverrides,
    env: &Env,
    options: &LoadOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let explicit = explicit_config_path(cli, env);
    let Discovery { source, probed } = discover_config(explicit.as_deref(), options)?;
    let file = source.path().map(load_config_file).transpose()?;
    let mut resolved = merge_cli_with_config(cli, env, source, file);
    resolved.probed = probed;
    Ok(resolved)
}

/// Merge already-loaded sources. Pure; does no I/O.
pub fn merge_cli_with_config(
    cli: &CliOverrides,
    env: &Env,
    source: ConfigSource,
    file: Option<ConfigFile>,
) -> ResolvedConfig {
    let values = OptionKey::ALL
        .into_iter()
        .map(|key| {
            let resolved = match key {
                OptionKey::ConfigPath => resolve_config_path(&source, cli),
                _ => resolve_key(key, cli, env, file.as_ref()),
            };
            (key, resolved)
        })
        .collect();

    ResolvedConfig { source, probed: Vec::new(), values, file, env: env.clone() }
}

/// The config path entry reports the file actually in use.
fn resolve_config_path(source: &ConfigSource, cli: &CliOverrides) -> ResolvedValue {
    let value = source.path().map(|p| OptionValue::Text(p.display().to_string()));
    let source = match source {
        ConfigSource::ExplicitPath(_) if cli.value(OptionKey::ConfigPath).is_some() => {
            ValueSource::Flag
        }
        ConfigSource::ExplicitPath(_) => ValueSource::Env(OptionKey::ConfigPath.env_var()),
        ConfigSource::SearchPath(path) => ValueSource::File(path.clone()),
        ConfigSource::None => ValueSource::Default,
    };
    ResolvedValue { value, source }
}

fn resolve_key(
    key: OptionKey,
    cli: &CliOverrides,
    env: &Env,
    file: Option<&ConfigFile>,
) -> ResolvedValue {
    if let Some(value) = cli.value(key) {
        return ResolvedValue { value: Some(value), source: ValueSource::Flag };
    }

    let env_name = key.env_var();
    if let Some(raw) = env.get(&env_name) {
        return ResolvedValue { value: Some(OptionValue::Text(raw)), source: ValueSource::Env(env_name) };
    }

    if let (Some(file), Some(file_key)) = (file, key.file_key()) {
        if let Some(value) = file.get(file_key).cloned().and_then(OptionValue::from_yaml) {
            return ResolvedValue { value: Some(value), source: ValueSource::File(file.path.clone()) };
        }
    }

    ResolvedValue { value: key.default_value(), source: ValueSource::Default }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_with(yaml: &str) -> ConfigFile {
        let values: serde_yaml::Mapping = serde_yaml::from_str(yaml).expect("yaml");
        ConfigFile { path: PathBuf::from("/home/user/.aft.yaml"), values }
    }

    fn text(s: &str) -> Option<OptionValue> {
        Some(OptionValue::Text(s.to_string()))
    }

    #[test]
    fn test_flag_beats_env_and_file_for_every_key() {
        let cli = CliOverrides {
            config: Some(PathBuf::from("/flag/aft.yaml")),
            profile: Some("flag-profile".to_string()),
            region: Some("flag-region".to_string()),
            output: Some("json".to_string()),
            verbose: Some(true),
            quiet: Some(true),
        };
        let env = Env::from_pairs([
            ("AFT_CONFIG", "/env/aft.yaml"),
            ("AFT_PROFILE", "env-profile"),
            ("AFT_REGION", "env-region"),
            ("AFT_OUTPUT", "yaml"),
            ("AFT_VERBOSE", "false"),
            ("AFT_QUIET", "false"),
        ]);
        let file = file_with("profile: file-profile\nregion: file-region\noutput: table\nverbose: false\nquiet: false\n");

        let resolved = merge_cli_with_config(
            &cli,
            &env,
            ConfigSource::ExplicitPath(PathBuf::from("/flag/aft.yaml")),
            Some(file),
        );
        for (key, value) in resolved.iter() {
            assert_eq!(value.source, ValueSource::Flag, "{key} should come from the flag");
        }
        assert_eq!(resolved.value(OptionKey::ConfigPath).cloned(), text("/flag/aft.yaml"));
        assert_eq!(resolved.profile().as_deref(), Some("flag-profile"));
        assert_eq!(resolved.region().as_deref(), Some("flag-region"));
        assert_eq!(resolved.output_format(), Ok(OutputFormat::Json));
        assert_eq!(resolved.verbose(), Ok(true));
        assert_eq!(resolved.quiet(), Ok(true));
    }

    #[test]
    fn test_env_beats_file_without_flag() {
        let env = Env::from_pairs([
            ("AFT_PROFILE", "env-profile"),
            ("AFT_REGION", "env-region"),
            ("AFT_OUTPUT", "yaml"),
            ("AFT_VERBOSE", "1"),
            ("AFT_QUIET", "off"),
        ]);
        let file = file_with("profile: file-profile\nregion: file-region\noutput: json\nverbose: false\nquiet: true\n");

        let resolved =
            merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, Some(file));
        for key in [
            OptionKey::Profile,
            OptionKey::Region,
            OptionKey::OutputFormat,
            OptionKey::Verbose,
            OptionKey::Quiet,
        ] {
            let resolved_value = resolved.get(key).expect("resolved");
            assert_eq!(resolved_value.source, ValueSource::Env(key.env_var()));
        }
        assert_eq!(resolved.profile().as_deref(), Some("env-profile"));
        assert_eq!(resolved.output_format(), Ok(OutputFormat::Yaml));
        assert_eq!(resolved.verbose(), Ok(true));
        assert_eq!(resolved.quiet(), Ok(false));
    }

    #[test]
    fn test_file_beats_default() {
        let file = file_with("profile: prod\noutput: json\nverbose: true\n");
        let resolved = merge_cli_with_config(
            &CliOverrides::default(),
            &Env::default(),
            ConfigSource::SearchPath(PathBuf::from("/home/user/.aft.yaml")),
            Some(file),
        );

        let profile = resolved.get(OptionKey::Profile).expect("profile");
        assert_eq!(profile.value, text("prod"));
        assert_eq!(profile.source, ValueSource::File(PathBuf::from("/home/user/.aft.yaml")));
        assert_eq!(resolved.output_format(), Ok(OutputFormat::Json));
        assert_eq!(resolved.verbose(), Ok(true));
        assert_eq!(resolved.get(OptionKey::Quiet).map(|v| &v.source), Some(&ValueSource::Default));
    }

    #[test]
    fn test_defaults_when_nothing_supplied() {
        let resolved = merge_cli_with_config(
            &CliOverrides::default(),
            &Env::default(),
            ConfigSource::None,
            None,
        );

        let output = resolved.get(OptionKey::OutputFormat).expect("output");
        assert_eq!(output.value, text("table"));
        assert_eq!(output.source, ValueSource::Default);
        assert_eq!(resolved.output_format(), Ok(OutputFormat::Table));
        assert_eq!(resolved.verbose(), Ok(false));
        assert_eq!(resolved.quiet(), Ok(false));
        assert_eq!(resolved.profile(), None);
        assert_eq!(resolved.region(), None);
        assert_eq!(resolved.config_file(), None);
    }

    #[test]
    fn test_false_flag_beats_true_env_and_file() {
        let cli = CliOverrides { verbose: Some(false), quiet: Some(false), ..Default::default() };
        let env = Env::from_pairs([("AFT_VERBOSE", "true")]);
        let file = file_with("quiet: true\n");

        let resolved = merge_cli_with_config(&cli, &env, ConfigSource::None, Some(file));
        assert_eq!(resolved.verbose(), Ok(false));
        assert_eq!(resolved.quiet(), Ok(false));
        assert_eq!(resolved.get(OptionKey::Verbose).map(|v| &v.source), Some(&ValueSource::Flag));
        assert_eq!(resolved.get(OptionKey::Quiet).map(|v| &v.source), Some(&ValueSource::Flag));
    }

    #[test]
    fn test_config_entry_reports_search_hit() {
        let path = PathBuf::from("/home/user/.aft.yaml");
        let resolved = merge_cli_with_config(
            &CliOverrides::default(),
            &Env::default(),
            ConfigSource::SearchPath(path.clone()),
            Some(file_with("profile: prod\n")),
        );

        let config = resolved.get(OptionKey::ConfigPath).expect("config");
        assert_eq!(config.value, text("/home/user/.aft.yaml"));
        assert_eq!(config.source, ValueSource::File(path));
    }

    #[test]
    fn test_config_entry_reports_absolute_explicit_path() {
        let home = TempDir::new().expect("home");
        let cwd = TempDir::new().expect("cwd");
        let absolute = cwd.path().join("team.yaml");
        fs::write(&absolute, "profile: team\n").expect("write");

        let options = LoadOptions {
            cwd: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
        };
        let cli = CliOverrides { config: Some(PathBuf::from("team.yaml")), ..Default::default() };
        let resolved = resolve(&cli, &Env::default(), &options).expect("resolved");

        let config = resolved.get(OptionKey::ConfigPath).expect("config");
        assert_eq!(config.value, text(&absolute.display().to_string()));
        assert_eq!(config.source, ValueSource::Flag);
        assert_eq!(resolved.config_file(), Some(absolute.as_path()));
        assert!(resolved.probed().is_empty());

        let env = Env::from_pairs([("AFT_CONFIG", absolute.display().to_string())]);
        let resolved = resolve(&CliOverrides::default(), &env, &options).expect("resolved");
        assert_eq!(
            resolved.get(OptionKey::ConfigPath).map(|v| &v.source),
            Some(&ValueSource::Env("AFT_CONFIG".to_string()))
        );
    }

    #[test]
    fn test_resolve_records_probed_candidates() {
        let home = TempDir::new().expect("home");
        let cwd = TempDir::new().expect("cwd");
        let options = LoadOptions {
            cwd: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
        };

        let resolved = resolve(&CliOverrides::default(), &Env::default(), &options).expect("resolved");
        assert_eq!(resolved.probed().len(), 6);
        assert_eq!(resolved.probed()[0], home.path().join(".aft.yaml"));
        assert_eq!(resolved.source(), &ConfigSource::None);
    }

    #[test]
    fn test_region_from_env_only() {
        let env = Env::from_pairs([("AFT_REGION", "us-west-2")]);
        let resolved = merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, None);
        assert_eq!(resolved.region().as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_empty_env_value_falls_through_to_file() {
        let env = Env::from_pairs([("AFT_REGION", "")]);
        let file = file_with("region: eu-central-1\n");
        let resolved = merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, Some(file));
        assert_eq!(resolved.region().as_deref(), Some("eu-central-1"));
    }

    #[test]
    fn test_null_file_value_counts_as_absent() {
        let file = file_with("output: ~\n");
        let resolved = merge_cli_with_config(
            &CliOverrides::default(),
            &Env::default(),
            ConfigSource::None,
            Some(file),
        );
        assert_eq!(
            resolved.get(OptionKey::OutputFormat).map(|v| &v.source),
            Some(&ValueSource::Default)
        );
    }

    #[test]
    fn test_config_key_in_file_is_ignored() {
        let file = file_with("config: /elsewhere.yaml\n");
        let resolved = merge_cli_with_config(
            &CliOverrides::default(),
            &Env::default(),
            ConfigSource::None,
            Some(file),
        );
        let config = resolved.get(OptionKey::ConfigPath).expect("config");
        assert_eq!(config.value, None);
        assert_eq!(config.source, ValueSource::Default);
    }

    #[test]
    fn test_malformed_values_are_left_to_consumers() {
        let env = Env::from_pairs([("AFT_OUTPUT", "xml"), ("AFT_VERBOSE", "loud")]);
        let resolved = merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, None);

        assert_eq!(resolved.value(OptionKey::OutputFormat).cloned(), text("xml"));
        let err = resolved.output_format().expect_err("xml is not an output format");
        assert_eq!(err.value, "xml");
        let err = resolved.verbose().expect_err("loud is not a boolean");
        assert_eq!(err.key, "verbose");
    }

    #[test]
    fn test_lookup_undeclared_key() {
        let env = Env::from_pairs([("AFT_PIPELINE_TIMEOUT", "30")]);
        let file = file_with("pipeline-timeout: 10\nct_home_region: us-east-1\n");
        let resolved = merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, Some(file));

        let timeout = resolved.lookup("pipeline-timeout").expect("timeout");
        assert_eq!(timeout.value, text("30"));
        assert_eq!(timeout.source, ValueSource::Env("AFT_PIPELINE_TIMEOUT".to_string()));

        let home_region = resolved.lookup("ct_home_region").expect("home region");
        assert_eq!(home_region.value, text("us-east-1"));

        assert_eq!(resolved.lookup("missing"), None);
    }

    #[test]
    fn test_lookup_declared_key_matches_get() {
        let env = Env::from_pairs([("AFT_PROFILE", "dev")]);
        let resolved = merge_cli_with_config(&CliOverrides::default(), &env, ConfigSource::None, None);
        assert_eq!(resolved.lookup("profile").as_ref(), resolved.get(OptionKey::Profile));
    }

    #[test]
    fn test_explicit_config_path_flag_beats_env() {
        let env = Env::from_pairs([("AFT_CONFIG", "/env/aft.yaml")]);
        let cli = CliOverrides { config: Some(PathBuf::from("/flag/aft.yaml")), ..Default::default() };
        assert_eq!(explicit_config_path(&cli, &env), Some(PathBuf::from("/flag/aft.yaml")));
        assert_eq!(
            explicit_config_path(&CliOverrides::default(), &env),
            Some(PathBuf::from("/env/aft.yaml"))
        );
        assert_eq!(explicit_config_path(&CliOverrides::default(), &Env::default()), None);
    }

    #[test]
    fn test_resolve_explicit_missing_path_fails() {
        let cwd = TempDir::new().expect("cwd");
        let cli = CliOverrides {
            config: Some(PathBuf::from("/nonexistent/path.yaml")),
            ..Default::default()
        };
        let options = LoadOptions { cwd: Some(cwd.path().to_path_buf()), home_dir: None };

        let err = resolve(&cli, &Env::default(), &options).expect_err("missing explicit file");
        assert!(matches!(err, ConfigError::ConfigLoad { .. }));
    }

    #[test]
    fn test_resolve_explicit_path_from_env() {
        let home = TempDir::new().expect("home");
        let cwd = TempDir::new().expect("cwd");
        fs::write(home.path().join(".aft.yaml"), "profile: home\n").expect("write");
        let custom = cwd.path().join("team.yaml");
        fs::write(&custom, "profile: team\n").expect("write");

        let env = Env::from_pairs([("AFT_CONFIG", custom.display().to_string())]);
        let options = LoadOptions {
            cwd: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
        };
        let resolved = resolve(&CliOverrides::default(), &env, &options).expect("resolved");
        assert_eq!(resolved.source(), &ConfigSource::ExplicitPath(custom));
        assert_eq!(resolved.profile().as_deref(), Some("team"));
    }

    #[test]
    fn test_resolve_from_home_file() {
        let home = TempDir::new().expect("home");
        let cwd = TempDir::new().expect("cwd");
        let path = home.path().join(".aft.yaml");
        fs::write(&path, "profile: prod\n").expect("write");

        let options = LoadOptions {
            cwd: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
        };
        let resolved = resolve(&CliOverrides::default(), &Env::default(), &options).expect("resolved");
        assert_eq!(resolved.source(), &ConfigSource::SearchPath(path));
        assert_eq!(resolved.profile().as_deref(), Some("prod"));
    }

    #[test]
    fn test_resolve_discovered_malformed_file_fails() {
        let home = TempDir::new().expect("home");
        let cwd = TempDir::new().expect("cwd");
        fs::write(home.path().join(".aft.yaml"), "profile: [unclosed\n").expect("write");

        let options = LoadOptions {
            cwd: Some(cwd.path().to_path_buf()),
            home_dir: Some(home.path().to_path_buf()),
        };
        let err = resolve(&CliOverrides::default(), &Env::default(), &options)
            .expect_err("malformed discovered file");
        assert!(matches!(err, ConfigError::ConfigLoad { .. }));
    }
}
