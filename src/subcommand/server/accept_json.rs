use {super::*, axum::extract::FromRef};

/// Whether the client asked for JSON with `Accept: application/json`.
pub(super) struct AcceptJson(pub(super) bool);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AcceptJson
where
  Arc<ServerConfig>: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = ServerError;

  async fn from_request_parts(
    parts: &mut http::request::Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let config = Arc::<ServerConfig>::from_ref(state);

    let accept = parts
      .headers
      .get(header::ACCEPT)
      .and_then(|value| value.to_str().ok());

    let json = accept
      .map(|accept| {
        accept
          .split(',')
          .any(|value| value.split(';').next().unwrap_or_default().trim() == "application/json")
      })
      .unwrap_or_default();

    if json && !config.json_api_enabled {
      return Err(ServerError::NotAcceptable {
        accept: accept.map(str::to_owned),
        reason: "JSON API disabled",
      });
    }

    Ok(Self(json))
  }
}
