use {
  self::{
    accept_json::AcceptJson,
    error::{OptionExt, ServerError, ServerResult},
  },
  super::*,
  crate::{
    server_config::ServerConfig,
    templates::{BlocksHtml, PageContent, StatusHtml},
  },
  axum::{
    extract::{Extension, Json, Path},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
  },
  axum_server::Handle,
  rust_embed::RustEmbed,
  std::net::SocketAddr,
  tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
  },
};

mod accept_json;
mod error;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

#[derive(Debug, Parser, Clone)]
pub struct Server {
  #[arg(
    long,
    help = "Listen on <ADDRESS> for incoming requests. [default: 0.0.0.0]"
  )]
  pub(crate) address: Option<String>,
  #[arg(long, help = "Disable JSON API.")]
  pub(crate) disable_json_api: bool,
  #[arg(
    long,
    help = "Listen on <HTTP_PORT> for incoming HTTP requests. [default: 80]"
  )]
  pub(crate) http_port: Option<u16>,
}

impl Server {
  pub fn run(self, settings: Settings, handle: Handle) -> SubcommandResult {
    Runtime::new()?.block_on(async {
      let source = settings.http_source()?;

      log::info!("Fetching blocks from {}", source.url());

      let view = Arc::new(View::new());

      let poller = Poller::new(
        Arc::new(source),
        view.clone(),
        settings.polling_interval(),
        settings.request_timeout(),
      )
      .start();

      let config = Arc::new(ServerConfig::new(&settings, !self.disable_json_api));

      let result = match self.spawn(Self::router(view, config), handle, self.http_port()) {
        Ok(server) => server.await.map_err(Error::from),
        Err(err) => Err(err),
      };

      poller.stop().await;

      result??;

      Ok(None)
    })
  }

  pub(crate) fn router(view: Arc<View>, config: Arc<ServerConfig>) -> Router {
    Router::new()
      .route("/", get(Self::blocks))
      .route("/blocks", get(Self::blocks))
      .route("/static/*path", get(Self::static_asset))
      .route("/status", get(Self::status))
      .layer(Extension(view))
      .layer(Extension(config.clone()))
      .layer(SetResponseHeaderLayer::if_not_present(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'self'"),
      ))
      .layer(
        CorsLayer::new()
          .allow_methods([http::Method::GET])
          .allow_origin(Any),
      )
      .layer(CompressionLayer::new())
      .with_state(config)
  }

  fn http_port(&self) -> u16 {
    self.http_port.unwrap_or(80)
  }

  fn spawn(
    &self,
    router: Router,
    handle: Handle,
    port: u16,
  ) -> Result<task::JoinHandle<io::Result<()>>> {
    let address = match &self.address {
      Some(address) => address.as_str(),
      None => {
        if cfg!(test) {
          "127.0.0.1"
        } else {
          "0.0.0.0"
        }
      }
    };

    let addr: SocketAddr = (address, port)
      .to_socket_addrs()?
      .next()
      .ok_or_else(|| anyhow!("failed to get socket addrs"))?;

    if !cfg!(test) {
      eprintln!("Listening on http://{addr}");
    }

    Ok(tokio::spawn(async move {
      axum_server::Server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    }))
  }

  async fn blocks(
    Extension(config): Extension<Arc<ServerConfig>>,
    Extension(view): Extension<Arc<View>>,
    AcceptJson(accept_json): AcceptJson,
  ) -> ServerResult {
    let snapshot = view.snapshot();

    Ok(if accept_json {
      let snapshot =
        snapshot.ok_or_else(|| ServerError::Unavailable("no blocks fetched yet".into()))?;
      Json(snapshot.blocks.clone()).into_response()
    } else {
      BlocksHtml::new(snapshot).page(config).into_response()
    })
  }

  async fn status(
    Extension(config): Extension<Arc<ServerConfig>>,
    Extension(view): Extension<Arc<View>>,
    AcceptJson(accept_json): AcceptJson,
  ) -> ServerResult {
    let status = StatusHtml::new(&config, &view);

    Ok(if accept_json {
      Json(status).into_response()
    } else {
      status.page(config).into_response()
    })
  }

  async fn static_asset(Path(path): Path<String>) -> ServerResult {
    let path = path.strip_prefix('/').unwrap_or(&path);

    let content = StaticAssets::get(path).ok_or_not_found(|| format!("asset {path}"))?;

    Ok(
      (
        [(
          header::CONTENT_TYPE,
          mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
        )],
        content.data.into_owned(),
      )
        .into_response(),
    )
  }
}
