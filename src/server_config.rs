use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ServerConfig {
  pub(crate) json_api_enabled: bool,
  pub(crate) polling_interval: Duration,
  pub(crate) source: Url,
}

impl ServerConfig {
  pub(crate) fn new(settings: &Settings, json_api_enabled: bool) -> Self {
    Self {
      json_api_enabled,
      polling_interval: settings.polling_interval(),
      source: settings.source().clone(),
    }
  }
}
