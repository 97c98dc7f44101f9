use {super::*, boilerplate::Boilerplate, crate::server_config::ServerConfig};

pub use {blocks::BlocksHtml, status::StatusHtml};

pub mod blocks;
pub mod status;

#[derive(Boilerplate)]
pub(crate) struct PageHtml<T: PageContent> {
  content: T,
  config: Arc<ServerConfig>,
}

impl<T> PageHtml<T>
where
  T: PageContent,
{
  pub(crate) fn new(content: T, config: Arc<ServerConfig>) -> Self {
    Self { content, config }
  }

  fn refresh(&self) -> Option<u64> {
    if self.content.refreshes() {
      Some(
        (self.config.polling_interval.as_millis() + 999)
          .div_euclid(1000)
          .max(1)
          .try_into()
          .unwrap_or(u64::MAX),
      )
    } else {
      None
    }
  }
}

pub(crate) trait PageContent: Display + 'static {
  fn title(&self) -> String;

  fn page(self, config: Arc<ServerConfig>) -> PageHtml<Self>
  where
    Self: Sized,
  {
    PageHtml::new(self, config)
  }

  fn refreshes(&self) -> bool {
    false
  }
}
