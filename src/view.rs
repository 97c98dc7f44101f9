use super::*;

/// The blocks of one successful response, in the order the service sent them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
  pub sequence: u64,
  pub blocks: Vec<BlockRecord>,
  pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
  pub kind: FailureKind,
  pub message: String,
  pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Health {
  pub consecutive_failures: u64,
  pub last_failure: Option<Failure>,
  pub last_success: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
  health: Health,
  issued: u64,
  snapshot: Option<Arc<Snapshot>>,
}

/// The display surface. Requests are tagged with [`View::issue`] and only the
/// response to the most recently issued request may replace what is shown.
#[derive(Default)]
pub struct View {
  state: RwLock<State>,
}

impl View {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn issue(&self) -> u64 {
    let mut state = self.state.write().unwrap();
    state.issued += 1;
    state.issued
  }

  pub fn latest_issued(&self) -> u64 {
    self.state.read().unwrap().issued
  }

  /// Replace the whole view with `blocks`. Returns `false`, leaving the view
  /// untouched, if a newer request has been issued since `sequence`.
  pub fn replace(&self, sequence: u64, blocks: Vec<BlockRecord>) -> bool {
    let mut state = self.state.write().unwrap();

    if sequence != state.issued {
      log::debug!(
        "Discarding stale response #{sequence}, latest request is #{}",
        state.issued
      );
      return false;
    }

    let now = Utc::now();

    state.snapshot = Some(Arc::new(Snapshot {
      sequence,
      blocks,
      updated: now,
    }));

    state.health.consecutive_failures = 0;
    state.health.last_success = Some(now);

    true
  }

  /// Record a failed request, keeping the current snapshot. Returns the number
  /// of consecutive failures, or `None` if the failure belongs to a stale
  /// request.
  pub fn record_failure(&self, sequence: u64, err: &FetchError) -> Option<u64> {
    let mut state = self.state.write().unwrap();

    if sequence != state.issued {
      return None;
    }

    state.health.consecutive_failures += 1;
    state.health.last_failure = Some(Failure {
      kind: err.kind(),
      message: err.to_string(),
      at: Utc::now(),
    });

    Some(state.health.consecutive_failures)
  }

  pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
    self.state.read().unwrap().snapshot.clone()
  }

  pub fn health(&self) -> Health {
    self.state.read().unwrap().health.clone()
  }
}
