use std::time::Duration;

use userlog::{Settings, UserLogError, logger_config};

#[test]
fn test_env_configuration_end_to_end() {
    // SAFETY: the only test of this binary, nothing else reads the environment concurrently
    unsafe {
        std::env::set_var("USERLOG_USER_LOGGER_NAME", "audit");
        std::env::set_var("USERLOG_FLUSH_INTERVAL_MS", "fast");
    }

    let built = logger_config().no_stdout().build();
    assert!(matches!(built, Err(UserLogError::InvalidConfig(_))));
    assert!(matches!(
        Settings::from_env(),
        Err(UserLogError::InvalidConfig(_))
    ));

    // the lazily built default configuration keeps the configured name
    let logger = userlog::user_logger().unwrap();
    assert_eq!(logger.user_logger().name(), "audit");
    assert_eq!(
        Settings::from_env_or_defaults().flush_interval,
        Duration::from_millis(100)
    );

    unsafe {
        std::env::set_var("USERLOG_FLUSH_INTERVAL_MS", "250");
    }
    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.user_logger_name, "audit");
    assert_eq!(settings.flush_interval, Duration::from_millis(250));
}
