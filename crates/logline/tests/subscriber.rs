use logline::{EnvSnapshot, LoggerOptions, LoggingConfig, build_subscriber};
use logline_test_support::CaptureWriter;
use serde_json::Value;
use tracing::field::Empty;

fn config(name: Option<&str>, pairs: &[(&str, &str)]) -> LoggingConfig {
    let options = LoggerOptions {
        name: name.map(str::to_string),
        ..LoggerOptions::default()
    };
    LoggingConfig::resolve(&options, &EnvSnapshot::from_vars(pairs.iter().copied()))
}

fn without_time(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("time=")?;
    let (millis, rest) = rest.split_once(' ')?;
    millis.parse::<i64>().ok()?;
    Some(rest)
}

#[test]
fn logfmt_lines_put_priority_fields_first() {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(
        &config(Some("billing"), &[("LOG_FORMAT", "logfmt")]),
        capture.clone(),
    );

    tracing::subscriber::with_default(subscriber, || {
        let span = tracing::info_span!("job", job_id = 42);
        let _guard = span.enter();
        tracing::info!(user = "ada", "charge accepted");
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let line = lines.first().map(String::as_str).unwrap_or_default();
    assert_eq!(
        without_time(line),
        Some("level=INFO name=billing msg=\"charge accepted\" job_id=42 user=ada")
    );
}

#[test]
fn span_fields_recorded_later_reach_events() {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(&config(None, &[("LOG_FORMAT", "logfmt")]), capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let outer = tracing::info_span!("request", request_id = Empty);
        let _outer = outer.enter();
        outer.record("request_id", "abc-123");
        let inner = tracing::info_span!("handler", step = "load");
        let _inner = inner.enter();
        tracing::warn!(retries = 2_u64, "slow upstream");
    });

    let lines = capture.lines();
    let line = lines.first().map(String::as_str).unwrap_or_default();
    assert_eq!(
        without_time(line),
        Some("level=WARN msg=\"slow upstream\" request_id=abc-123 step=load retries=2")
    );
}

#[test]
fn json_lines_carry_base_fields_in_order() -> anyhow::Result<()> {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(
        &config(
            None,
            &[("LOG_FORMAT", "json"), ("LOG_OMIT_FIELDS", "hostname")],
        ),
        capture.clone(),
    );

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!(attempt = 3_i64, "disk nearly full");
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Map<String, Value> =
        serde_json::from_str(lines.first().map(String::as_str).unwrap_or_default())?;
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["time", "level", "pid", "attempt", "msg"]);
    assert_eq!(record.get("level"), Some(&Value::from("WARN")));
    assert_eq!(record.get("pid"), Some(&Value::from(std::process::id())));
    assert_eq!(record.get("msg"), Some(&Value::from("disk nearly full")));
    assert!(record.get("time").is_some_and(Value::is_i64));
    Ok(())
}

#[test]
fn events_below_the_resolved_level_are_dropped() {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(
        &config(None, &[("LOG_FORMAT", "logfmt"), ("LOG_LEVEL", "warn")]),
        capture.clone(),
    );

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("ignored");
        tracing::error!("kept");
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let line = lines.first().map(String::as_str).unwrap_or_default();
    assert_eq!(without_time(line), Some("level=ERROR msg=kept"));
}

#[test]
fn multiline_messages_stay_on_one_line() {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(&config(None, &[("LOG_FORMAT", "logfmt")]), capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(detail = "a\r\nb", "first\nsecond");
    });

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    let line = lines.first().map(String::as_str).unwrap_or_default();
    assert_eq!(
        without_time(line),
        Some(r#"level=INFO msg="first\nsecond" detail="a\nb""#)
    );
}

#[test]
fn pretty_output_is_human_readable() {
    let capture = CaptureWriter::new();
    let subscriber = build_subscriber(&config(None, &[]), capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("server ready");
    });

    let contents = capture.contents();
    assert!(contents.contains("server ready"));
    assert!(!contents.contains("msg="));
    assert_eq!(capture.lines().len(), 1);
}
