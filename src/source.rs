use {super::*, async_trait::async_trait, reqwest::StatusCode};

const BLOCKS_PATH: &str = "blocks";

/// Where snapshots come from. The poller only ever asks for the full list.
#[async_trait]
pub trait BlockSource: Send + Sync {
  async fn blocks(&self) -> Result<Vec<BlockRecord>, FetchError>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
  Network,
  Malformed,
}

impl Display for FailureKind {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Network => write!(f, "network failure"),
      Self::Malformed => write!(f, "malformed response"),
    }
  }
}

#[derive(Debug)]
pub enum FetchError {
  Malformed(serde_json::Error),
  Status(StatusCode),
  Timeout(Duration),
  Transport(reqwest::Error),
}

impl FetchError {
  pub fn kind(&self) -> FailureKind {
    match self {
      Self::Malformed(_) => FailureKind::Malformed,
      Self::Status(_) | Self::Timeout(_) | Self::Transport(_) => FailureKind::Network,
    }
  }
}

impl Display for FetchError {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::Malformed(err) => write!(f, "block service sent malformed blocks: {err}"),
      Self::Status(status) => write!(f, "block service responded with {status}"),
      Self::Timeout(timeout) => write!(
        f,
        "block service did not respond within {}",
        humantime::format_duration(*timeout)
      ),
      Self::Transport(err) => write!(f, "request to block service failed: {err}"),
    }
  }
}

impl std::error::Error for FetchError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Malformed(err) => Some(err),
      Self::Transport(err) => Some(err),
      Self::Status(_) | Self::Timeout(_) => None,
    }
  }
}

pub struct HttpSource {
  client: reqwest::Client,
  timeout: Duration,
  url: Url,
}

impl HttpSource {
  pub fn new(mut source: Url, timeout: Duration) -> Result<Self> {
    if !source.path().ends_with('/') {
      let path = format!("{}/", source.path());
      source.set_path(&path);
    }

    let url = source
      .join(BLOCKS_PATH)
      .with_context(|| format!("invalid block service URL `{source}`"))?;

    Ok(Self {
      client: reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?,
      timeout,
      url,
    })
  }

  pub fn url(&self) -> &Url {
    &self.url
  }

  fn transport(&self, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
      FetchError::Timeout(self.timeout)
    } else {
      FetchError::Transport(err)
    }
  }
}

#[async_trait]
impl BlockSource for HttpSource {
  async fn blocks(&self) -> Result<Vec<BlockRecord>, FetchError> {
    log::debug!("GET {}", self.url);

    let response = self
      .client
      .get(self.url.clone())
      .send()
      .await
      .map_err(|err| self.transport(err))?;

    let status = response.status();

    if !status.is_success() {
      return Err(FetchError::Status(status));
    }

    let body = response.bytes().await.map_err(|err| self.transport(err))?;

    serde_json::from_slice(&body).map_err(FetchError::Malformed)
  }
}
