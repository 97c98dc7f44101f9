use {super::*, pretty_assertions::assert_eq};

#[test]
fn prints_blocks_as_json() {
  let service = mock_block_service::spawn();

  service.reply(Reply::Blocks(vec![
    block(0, "h0", "genesis"),
    block(1, "h1", "tx1"),
  ]));

  assert_eq!(
    CommandBuilder::new(&format!("--source {} snapshot", service.url()))
      .run_and_deserialize_output::<Vec<BlockRecord>>(),
    vec![
      BlockRecord::new(0, "h0", "genesis"),
      BlockRecord::new(1, "h1", "tx1"),
    ],
  );

  assert_eq!(service.requests(), 1);
}

#[test]
fn minified_output() {
  let service = mock_block_service::spawn();

  assert_eq!(
    CommandBuilder::new(&format!("--minify --source {} snapshot", service.url()))
      .run_and_extract_stdout(),
    "[{\"index\":0,\"hash\":\"0000genesis\",\"data\":\"genesis\"}]\n",
  );
}

#[test]
fn source_from_environment() {
  let service = mock_block_service::spawn();

  service.reply(Reply::Blocks(Vec::new()));

  assert_eq!(
    CommandBuilder::new("snapshot")
      .env("BLOCKVIEW_SOURCE", &service.url())
      .run_and_deserialize_output::<Vec<BlockRecord>>(),
    Vec::new(),
  );
}

#[test]
fn html_output_is_escaped() {
  let service = mock_block_service::spawn();

  service.reply(Reply::Blocks(vec![
    block(0, "h0", "genesis"),
    block(1, "h1", "<script>alert(1)</script>"),
  ]));

  let stdout = CommandBuilder::new(&format!("--source {} snapshot --html", service.url()))
    .run_and_extract_stdout();

  assert!(!stdout.contains("<script>"), "{stdout}");

  assert_regex_match!(
    stdout,
    "
      <div id=blocks>
        <div class=block>
          <p>Block #0</p>
          <p>Hash: h0</p>
          <p>Data: genesis</p>
        </div>
        <div class=block>
          <p>Block #1</p>
          <p>Hash: h1</p>
          <p>Data: &lt;script&gt;alert\\(1\\)&lt;.*</p>
        </div>
      </div>
    "
    .unindent()
  );
}

#[test]
fn error_status_fails() {
  let service = mock_block_service::spawn();

  service.reply(Reply::Status(500));

  CommandBuilder::new(&format!("--source {} snapshot", service.url()))
    .expected_exit_code(1)
    .expected_stderr(format!(
      "error: failed to fetch blocks from {}/blocks\n\
       because: block service responded with 500 Internal Server Error\n",
      service.url()
    ))
    .run_and_extract_stdout();
}

#[test]
fn inherited_backtrace_settings_are_cleared() {
  let command = CommandBuilder::new("snapshot").command();

  for key in ["RUST_BACKTRACE", "RUST_LIB_BACKTRACE"] {
    assert!(
      command
        .get_envs()
        .any(|(name, value)| name == key && value.is_none()),
      "{key} is passed through to the binary"
    );
  }
}

#[test]
fn malformed_response_fails() {
  let service = mock_block_service::spawn();

  service.reply(Reply::Raw(r#"{"blocks":[]}"#.into()));

  CommandBuilder::new(&format!("--source {} snapshot", service.url()))
    .expected_exit_code(1)
    .stderr_regex(
      "error: failed to fetch blocks from .*/blocks\n\
       because: block service sent malformed blocks: .*\n\
       because: .*\n",
    )
    .run_and_extract_stdout();
}

#[test]
fn unreachable_service_fails() {
  let url = {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
  };

  CommandBuilder::new(&format!("--source {url} snapshot"))
    .expected_exit_code(1)
    .stderr_regex(format!(
      "error: failed to fetch blocks from {url}/blocks\nbecause: request to block service failed: .*"
    ))
    .run_and_extract_stdout();
}

#[test]
fn slow_service_times_out() {
  let service = mock_block_service::spawn();

  service.delay(Duration::from_secs(5));

  CommandBuilder::new(&format!(
    "--request-timeout 200ms --source {} snapshot",
    service.url()
  ))
  .expected_exit_code(1)
  .expected_stderr(format!(
    "error: failed to fetch blocks from {}/blocks\n\
     because: block service did not respond within 200ms\n",
    service.url()
  ))
  .run_and_extract_stdout();
}
