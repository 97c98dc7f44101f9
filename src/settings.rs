use super::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
  #[serde(serialize_with = "serialize_duration")]
  polling_interval: Duration,
  #[serde(serialize_with = "serialize_duration")]
  request_timeout: Duration,
  #[serde(serialize_with = "serialize_display")]
  source: Url,
}

#[derive(Default, Debug, Clone, PartialEq)]
struct Layer {
  config: Option<PathBuf>,
  polling_interval: Option<Duration>,
  request_timeout: Option<Duration>,
  source: Option<Url>,
}

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
  polling_interval: Option<DeserializeFromStr<humantime::Duration>>,
  request_timeout: Option<DeserializeFromStr<humantime::Duration>>,
  source: Option<DeserializeFromStr<Url>>,
}

fn serialize_duration<S: serde::Serializer>(
  duration: &Duration,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.collect_str(&humantime::format_duration(*duration))
}

fn serialize_display<T: Display, S: serde::Serializer>(
  value: &T,
  serializer: S,
) -> Result<S::Ok, S::Error> {
  serializer.collect_str(value)
}

impl Layer {
  fn or(self, other: Self) -> Self {
    Self {
      config: self.config.or(other.config),
      polling_interval: self.polling_interval.or(other.polling_interval),
      request_timeout: self.request_timeout.or(other.request_timeout),
      source: self.source.or(other.source),
    }
  }

  fn from_options(options: Options) -> Self {
    Self {
      config: options.config,
      polling_interval: options.polling_interval.map(Into::into),
      request_timeout: options.request_timeout.map(Into::into),
      source: options.source,
    }
  }

  fn from_env(env: BTreeMap<String, String>) -> Result<Self> {
    let get_duration = |key: &str| -> Result<Option<Duration>> {
      env
        .get(key)
        .map(|value| {
          value
            .parse::<humantime::Duration>()
            .map(Into::into)
            .with_context(|| format!("failed to parse environment variable BLOCKVIEW_{key}"))
        })
        .transpose()
    };

    Ok(Self {
      config: env.get("CONFIG").map(PathBuf::from),
      polling_interval: get_duration("POLLING_INTERVAL")?,
      request_timeout: get_duration("REQUEST_TIMEOUT")?,
      source: env
        .get("SOURCE")
        .map(|source| {
          source
            .parse::<Url>()
            .context("failed to parse environment variable BLOCKVIEW_SOURCE")
        })
        .transpose()?,
    })
  }

  fn from_config_file(path: &Path) -> Result<Self> {
    let file = fs::File::open(path)
      .with_context(|| format!("failed to open config file `{}`", path.display()))?;

    let config = serde_yaml::from_reader::<_, ConfigFile>(file)
      .with_context(|| format!("failed to deserialize config file `{}`", path.display()))?;

    Ok(Self {
      config: None,
      polling_interval: config.polling_interval.map(|duration| duration.0.into()),
      request_timeout: config.request_timeout.map(|duration| duration.0.into()),
      source: config.source.map(|source| source.0),
    })
  }
}

impl Settings {
  pub(crate) const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(2000);
  pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
  pub(crate) const DEFAULT_SOURCE: &'static str = "http://127.0.0.1:5000";

  pub(crate) fn merge(options: Options, env: BTreeMap<String, String>) -> Result<Self> {
    let layer = Layer::from_options(options).or(Layer::from_env(env)?);

    let config_path = match &layer.config {
      Some(path) => Some(path.clone()),
      None => Self::default_config_path().filter(|path| path.is_file()),
    };

    let layer = match config_path {
      Some(path) => layer.or(Layer::from_config_file(&path)?),
      None => layer,
    };

    Self::from_layer(layer)
  }

  fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blockview").join("config.yaml"))
  }

  fn from_layer(layer: Layer) -> Result<Self> {
    let polling_interval = layer
      .polling_interval
      .unwrap_or(Self::DEFAULT_POLLING_INTERVAL);

    ensure!(
      !polling_interval.is_zero(),
      "polling interval must be greater than zero"
    );

    let request_timeout = layer
      .request_timeout
      .unwrap_or(Self::DEFAULT_REQUEST_TIMEOUT);

    ensure!(
      !request_timeout.is_zero(),
      "request timeout must be greater than zero"
    );

    let source = match layer.source {
      Some(source) => source,
      None => Self::DEFAULT_SOURCE.parse()?,
    };

    if source.cannot_be_a_base() {
      bail!("source `{source}` cannot be used as a base URL");
    }

    Ok(Self {
      polling_interval,
      request_timeout,
      source,
    })
  }

  pub(crate) fn polling_interval(&self) -> Duration {
    self.polling_interval
  }

  pub(crate) fn request_timeout(&self) -> Duration {
    self.request_timeout
  }

  pub(crate) fn source(&self) -> &Url {
    &self.source
  }

  pub(crate) fn http_source(&self) -> Result<HttpSource> {
    HttpSource::new(self.source.clone(), self.request_timeout)
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq, std::io::Write};

  fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
      .iter()
      .map(|(key, value)| ((*key).into(), (*value).into()))
      .collect()
  }

  fn options(args: &[&str]) -> Options {
    Options::try_parse_from(std::iter::once("blockview").chain(args.iter().copied())).unwrap()
  }

  fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  #[test]
  fn defaults() {
    let settings = Settings::from_layer(Layer::default()).unwrap();

    assert_eq!(settings.polling_interval(), Duration::from_millis(2000));
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    assert_eq!(settings.source().as_str(), "http://127.0.0.1:5000/");
  }

  #[test]
  fn options_override_environment() {
    let settings = Settings::from_layer(
      Layer::from_options(options(&["--source", "http://a.local"])).or(
        Layer::from_env(env(&[
          ("SOURCE", "http://b.local"),
          ("POLLING_INTERVAL", "10s"),
        ]))
        .unwrap(),
      ),
    )
    .unwrap();

    assert_eq!(settings.source().as_str(), "http://a.local/");
    assert_eq!(settings.polling_interval(), Duration::from_secs(10));
  }

  #[test]
  fn environment_overrides_config_file() {
    let file = config_file("source: http://file.local\nrequest_timeout: 750ms\n");

    let settings = Settings::merge(
      options(&["--config", file.path().to_str().unwrap()]),
      env(&[("SOURCE", "http://env.local")]),
    )
    .unwrap();

    assert_eq!(settings.source().as_str(), "http://env.local/");
    assert_eq!(settings.request_timeout(), Duration::from_millis(750));
    assert_eq!(settings.polling_interval(), Duration::from_secs(2));
  }

  #[test]
  fn explicit_config_path_must_exist() {
    let err = Settings::merge(
      options(&["--config", "/nonexistent/blockview.yaml"]),
      BTreeMap::new(),
    )
    .unwrap_err();

    assert_eq!(
      err.to_string(),
      "failed to open config file `/nonexistent/blockview.yaml`"
    );
  }

  #[test]
  fn config_path_from_environment() {
    let file = config_file("polling_interval: 3s\n");

    let settings = Settings::merge(
      Options::default(),
      env(&[("CONFIG", file.path().to_str().unwrap())]),
    )
    .unwrap();

    assert_eq!(settings.polling_interval(), Duration::from_secs(3));
  }

  #[test]
  fn unknown_config_keys_are_rejected() {
    let file = config_file("polling_interval: 3s\nmining: true\n");

    let err = Settings::merge(
      options(&["--config", file.path().to_str().unwrap()]),
      BTreeMap::new(),
    )
    .unwrap_err()
    .to_string();

    assert!(err.starts_with("failed to deserialize config file"));
  }

  #[test]
  fn invalid_environment_values_name_the_variable() {
    let err = Layer::from_env(env(&[("REQUEST_TIMEOUT", "soon")])).unwrap_err();

    assert_eq!(
      err.to_string(),
      "failed to parse environment variable BLOCKVIEW_REQUEST_TIMEOUT"
    );
  }

  #[test]
  fn zero_durations_are_rejected() {
    assert_eq!(
      Settings::from_layer(Layer::from_options(options(&["--polling-interval", "0s"])))
        .unwrap_err()
        .to_string(),
      "polling interval must be greater than zero"
    );

    assert_eq!(
      Settings::from_layer(Layer::from_options(options(&["--request-timeout", "0ms"])))
        .unwrap_err()
        .to_string(),
      "request timeout must be greater than zero"
    );
  }

  #[test]
  fn non_base_sources_are_rejected() {
    assert!(
      Settings::from_layer(Layer::from_options(options(&["--source", "mailto:x@y.z"]))).is_err()
    );
  }

  #[test]
  fn serializes_human_readable() {
    let settings = Settings::from_layer(Layer::default()).unwrap();

    assert_eq!(
      serde_json::to_value(&settings).unwrap(),
      serde_json::json!({
        "polling_interval": "2s",
        "request_timeout": "5s",
        "source": "http://127.0.0.1:5000/",
      })
    );
  }
}
