use {super::*, crate::templates::BlocksHtml};

#[derive(Debug, Parser)]
pub struct Snapshot {
  #[arg(long, help = "Print the rendered block container instead of JSON.")]
  pub(crate) html: bool,
}

impl Snapshot {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let source = settings.http_source()?;

    let blocks = Runtime::new()?
      .block_on(source.blocks())
      .with_context(|| format!("failed to fetch blocks from {}", source.url()))?;

    if self.html {
      print!(
        "{}",
        BlocksHtml::new(Some(Arc::new(crate::Snapshot {
          sequence: 1,
          blocks,
          updated: Utc::now(),
        })))
      );
      return Ok(None);
    }

    Ok(Some(Box::new(blocks)))
  }
}
