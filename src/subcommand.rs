use super::*;

pub mod server;
mod settings;
pub mod snapshot;

#[derive(Debug, Parser)]
pub enum Subcommand {
  #[command(about = "Serve the block view, refreshing it from the block service")]
  Server(server::Server),
  #[command(about = "Display settings")]
  Settings,
  #[command(about = "Fetch blocks from the block service once")]
  Snapshot(snapshot::Snapshot),
}

impl Subcommand {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    match self {
      Self::Server(server) => {
        let handle = axum_server::Handle::new();
        LISTENERS.lock().unwrap().push(handle.clone());
        server.run(settings, handle)
      }
      Self::Settings => settings::run(settings),
      Self::Snapshot(snapshot) => snapshot.run(settings),
    }
  }
}

pub trait Output: Send {
  fn print_json(&self, minify: bool);
}

impl<T> Output for T
where
  T: Serialize + Send,
{
  fn print_json(&self, minify: bool) {
    if minify {
      serde_json::to_writer(io::stdout(), self).ok();
    } else {
      serde_json::to_writer_pretty(io::stdout(), self).ok();
    }
    println!();
  }
}

pub(crate) type SubcommandResult = Result<Option<Box<dyn Output>>>;
