use super::*;

#[derive(Debug, PartialEq, Clone)]
pub(crate) struct DeserializeFromStr<T: FromStr>(pub(crate) T);

impl<'de, T: FromStr> Deserialize<'de> for DeserializeFromStr<T>
where
  T::Err: Display,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(Self(
      FromStr::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)?,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_through_from_str() {
    assert_eq!(
      serde_yaml::from_str::<DeserializeFromStr<humantime::Duration>>("1m 30s")
        .unwrap()
        .0,
      "90s".parse::<humantime::Duration>().unwrap(),
    );
  }

  #[test]
  fn from_str_errors_become_deserialization_errors() {
    assert!(serde_yaml::from_str::<DeserializeFromStr<Url>>("not a url").is_err());
  }
}
