use {
  super::*,
  log::Level,
  tokio::time::{self, MissedTickBehavior},
  tokio_util::sync::CancellationToken,
};

/// Periodically replaces the view with the block service's current snapshot.
///
/// The first tick fires as soon as the poller starts. Each tick waits for its
/// request to finish or time out before the next one can fire, so requests
/// never overlap; ticks missed while waiting are skipped rather than queued.
pub struct Poller {
  polling_interval: Duration,
  request_timeout: Duration,
  source: Arc<dyn BlockSource>,
  view: Arc<View>,
}

pub struct PollerHandle {
  cancel: CancellationToken,
  task: Option<task::JoinHandle<()>>,
}

impl PollerHandle {
  /// Cancel the loop, including any request in flight, and wait for it to exit.
  pub async fn stop(mut self) {
    self.cancel.cancel();

    if let Some(task) = self.task.take() {
      if let Err(err) = task.await {
        log::warn!("Poller task failed: {err}");
      }
    }
  }

  pub fn is_finished(&self) -> bool {
    self
      .task
      .as_ref()
      .map(|task| task.is_finished())
      .unwrap_or(true)
  }
}

impl Drop for PollerHandle {
  fn drop(&mut self) {
    self.cancel.cancel();
  }
}

impl Poller {
  pub fn new(
    source: Arc<dyn BlockSource>,
    view: Arc<View>,
    polling_interval: Duration,
    request_timeout: Duration,
  ) -> Self {
    Self {
      polling_interval,
      request_timeout,
      source,
      view,
    }
  }

  pub fn start(self) -> PollerHandle {
    let cancel = CancellationToken::new();

    PollerHandle {
      task: Some(tokio::spawn(self.run(cancel.clone()))),
      cancel,
    }
  }

  async fn run(self, cancel: CancellationToken) {
    log::info!(
      "Polling block service every {}",
      humantime::format_duration(self.polling_interval)
    );

    let mut interval = time::interval(self.polling_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut reporter = Reporter::default();

    loop {
      tokio::select! {
        biased;
        () = cancel.cancelled() => break,
        _ = interval.tick() => {}
      }

      tokio::select! {
        biased;
        () = cancel.cancelled() => break,
        () = self.tick(&mut reporter) => {}
      }
    }

    log::info!("Stopped polling block service");
  }

  async fn tick(&self, reporter: &mut Reporter) {
    let sequence = self.view.issue();

    let result = match time::timeout(self.request_timeout, self.source.blocks()).await {
      Ok(result) => result,
      Err(_) => Err(FetchError::Timeout(self.request_timeout)),
    };

    match result {
      Ok(blocks) => {
        let count = blocks.len();
        if self.view.replace(sequence, blocks) {
          reporter.success(sequence, count);
        }
      }
      Err(err) => {
        if let Some(consecutive) = self.view.record_failure(sequence, &err) {
          reporter.failure(&err, consecutive);
        }
      }
    }
  }
}

/// Logs fetch outcomes. Network failures are reported every time. Malformed
/// responses are reported once per run of consecutive malformed responses.
#[derive(Default)]
struct Reporter {
  failing: Option<FailureKind>,
}

impl Reporter {
  fn failure(&mut self, err: &FetchError, consecutive: u64) -> Level {
    let level = match (err.kind(), self.failing) {
      (FailureKind::Malformed, Some(FailureKind::Malformed)) => Level::Debug,
      _ => Level::Warn,
    };

    log::log!(
      level,
      "{err} ({consecutive} consecutive {}), keeping last snapshot",
      if consecutive == 1 {
        "failure"
      } else {
        "failures"
      }
    );

    self.failing = Some(err.kind());

    level
  }

  fn success(&mut self, sequence: u64, count: usize) {
    if let Some(kind) = self.failing.take() {
      log::info!("Block service recovered from {kind}");
    }

    log::debug!("Rendered {count} blocks from response #{sequence}");
  }
}
