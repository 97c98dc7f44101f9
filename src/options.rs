use super::*;

#[derive(Clone, Default, Debug, Parser)]
pub struct Options {
  #[arg(
    long,
    help = "Load configuration from <CONFIG>. [default: <CONFIG_DIR>/blockview/config.yaml]"
  )]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Minify JSON output.")]
  pub(crate) minify: bool,
  #[arg(
    long,
    help = "Refresh the view every <POLLING_INTERVAL>. [default: 2s]"
  )]
  pub(crate) polling_interval: Option<humantime::Duration>,
  #[arg(
    long,
    help = "Abandon requests to the block service after <REQUEST_TIMEOUT>. [default: 5s]"
  )]
  pub(crate) request_timeout: Option<humantime::Duration>,
  #[arg(
    long,
    help = "Fetch blocks from the service at <SOURCE>. [default: http://127.0.0.1:5000]"
  )]
  pub(crate) source: Option<Url>,
}
