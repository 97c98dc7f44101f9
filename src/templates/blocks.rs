use super::*;

/// The `#blocks` container, rebuilt in full from one snapshot.
#[derive(Boilerplate, Debug, PartialEq)]
pub struct BlocksHtml {
  snapshot: Option<Arc<Snapshot>>,
}

impl BlocksHtml {
  pub fn new(snapshot: Option<Arc<Snapshot>>) -> Self {
    Self { snapshot }
  }
}

impl PageContent for BlocksHtml {
  fn title(&self) -> String {
    match &self.snapshot {
      Some(snapshot) if snapshot.blocks.len() == 1 => "1 Block".into(),
      Some(snapshot) => format!("{} Blocks", snapshot.blocks.len()),
      None => "Blocks".into(),
    }
  }

  fn refreshes(&self) -> bool {
    true
  }
}
