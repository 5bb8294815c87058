use logline::{EnvSnapshot, LoggingError};
use logline_tower::{RequestLogger, RequestLoggingOptions};

#[test]
fn request_logger_installs_once() -> anyhow::Result<()> {
    let logger = RequestLogger::new(&RequestLoggingOptions::default(), &EnvSnapshot::default());
    logger.install()?;
    assert!(matches!(
        logger.install(),
        Err(LoggingError::SubscriberInstall { .. })
    ));
    Ok(())
}
