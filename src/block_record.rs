use super::*;

/// One block as reported by the block service. Fields are opaque and shown
/// verbatim; anything else the service sends alongside them is ignored.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BlockRecord {
  pub index: u64,
  pub hash: String,
  pub data: String,
}

impl BlockRecord {
  pub fn new(index: u64, hash: impl Into<String>, data: impl Into<String>) -> Self {
    Self {
      index,
      hash: hash.into(),
      data: data.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use {super::*, pretty_assertions::assert_eq};

  #[test]
  fn deserialize() {
    assert_eq!(
      serde_json::from_str::<Vec<BlockRecord>>(
        r#"[{"index":0,"hash":"h0","data":"genesis"},{"index":1,"hash":"h1","data":"tx1"}]"#
      )
      .unwrap(),
      vec![
        BlockRecord::new(0, "h0", "genesis"),
        BlockRecord::new(1, "h1", "tx1"),
      ],
    );
  }

  #[test]
  fn extra_fields_are_ignored() {
    assert_eq!(
      serde_json::from_str::<BlockRecord>(
        r#"{
          "index": 3,
          "hash": "0000abc",
          "data": "payload",
          "miner": "genesis",
          "nonce": 12,
          "previous_hash": "0",
          "timestamp": 1700000000.5,
          "transactions": []
        }"#
      )
      .unwrap(),
      BlockRecord::new(3, "0000abc", "payload"),
    );
  }

  #[test]
  fn missing_fields_are_rejected() {
    assert!(serde_json::from_str::<BlockRecord>(r#"{"index":0,"hash":"h0"}"#).is_err());
  }

  #[test]
  fn mined_block_without_data_is_rejected() {
    assert!(serde_json::from_str::<BlockRecord>(
      r#"{
        "index": 0,
        "miner": "genesis",
        "transactions": [],
        "timestamp": 1700000000.5,
        "previous_hash": "0",
        "nonce": 0,
        "hash": "0000genesis"
      }"#
    )
    .is_err());
  }

  #[test]
  fn negative_index_is_rejected() {
    assert!(serde_json::from_str::<BlockRecord>(r#"{"index":-1,"hash":"h","data":"d"}"#).is_err());
  }

  #[test]
  fn non_string_data_is_rejected() {
    assert!(
      serde_json::from_str::<BlockRecord>(r#"{"index":0,"hash":"h","data":{"tx":1}}"#).is_err()
    );
  }
}
