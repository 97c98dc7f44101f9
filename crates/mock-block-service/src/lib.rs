use {
  axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
  },
  serde_json::{json, Value},
  std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
  },
  tokio::sync::oneshot,
};

/// What `GET /blocks` answers with until told otherwise.
#[derive(Clone, Debug)]
pub enum Reply {
  Blocks(Vec<Value>),
  Raw(String),
  Status(u16),
}

struct Service {
  delay: Duration,
  reply: Reply,
  requests: usize,
}

pub struct Handle {
  port: u16,
  service: Arc<Mutex<Service>>,
  shutdown: Option<oneshot::Sender<()>>,
}

pub fn block(index: u64, hash: &str, data: &str) -> Value {
  json!({
    "index": index,
    "hash": hash,
    "data": data,
  })
}

pub fn spawn() -> Handle {
  let listener = TcpListener::bind("127.0.0.1:0").unwrap();
  listener.set_nonblocking(true).unwrap();

  let port = listener.local_addr().unwrap().port();

  let service = Arc::new(Mutex::new(Service {
    delay: Duration::ZERO,
    reply: Reply::Blocks(vec![block(0, "0000genesis", "genesis")]),
    requests: 0,
  }));

  let router = Router::new()
    .route("/blocks", get(blocks))
    .with_state(service.clone());

  let (tx, rx) = oneshot::channel();

  thread::spawn(move || {
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .unwrap()
      .block_on(async {
        axum::Server::from_tcp(listener)
          .unwrap()
          .serve(router.into_make_service())
          .with_graceful_shutdown(async {
            rx.await.ok();
          })
          .await
          .unwrap()
      })
  });

  Handle {
    port,
    service,
    shutdown: Some(tx),
  }
}

async fn blocks(State(service): State<Arc<Mutex<Service>>>) -> Response {
  let (delay, reply) = {
    let mut service = service.lock().unwrap();
    service.requests += 1;
    (service.delay, service.reply.clone())
  };

  if !delay.is_zero() {
    tokio::time::sleep(delay).await;
  }

  match reply {
    Reply::Blocks(blocks) => Json(blocks).into_response(),
    Reply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
    Reply::Status(code) => (
      StatusCode::from_u16(code).unwrap(),
      format!("status {code}"),
    )
      .into_response(),
  }
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  pub fn reply(&self, reply: Reply) {
    self.service.lock().unwrap().reply = reply;
  }

  pub fn delay(&self, delay: Duration) {
    self.service.lock().unwrap().delay = delay;
  }

  pub fn requests(&self) -> usize {
    self.service.lock().unwrap().requests
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    if let Some(shutdown) = self.shutdown.take() {
      shutdown.send(()).ok();
    }
  }
}
