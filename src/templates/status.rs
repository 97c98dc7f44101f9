use {super::*, crate::view::Failure};

#[derive(Boilerplate, Debug, PartialEq, Serialize)]
pub struct StatusHtml {
  pub blocks: Option<usize>,
  pub consecutive_failures: u64,
  pub last_failure: Option<Failure>,
  pub last_success: Option<DateTime<Utc>>,
  pub polling_interval: String,
  pub requests: u64,
  pub sequence: Option<u64>,
  pub source: String,
}

impl StatusHtml {
  pub(crate) fn new(config: &ServerConfig, view: &View) -> Self {
    let snapshot = view.snapshot();
    let health = view.health();

    Self {
      blocks: snapshot.as_ref().map(|snapshot| snapshot.blocks.len()),
      consecutive_failures: health.consecutive_failures,
      last_failure: health.last_failure,
      last_success: health.last_success,
      polling_interval: humantime::format_duration(config.polling_interval).to_string(),
      requests: view.latest_issued(),
      sequence: snapshot.map(|snapshot| snapshot.sequence),
      source: config.source.to_string(),
    }
  }
}

impl PageContent for StatusHtml {
  fn title(&self) -> String {
    "Status".into()
  }
}
