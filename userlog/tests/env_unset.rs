use userlog::{DEFAULT_USER_LOGGER_NAME, ROOT_LOGGER_NAME, Settings};

#[test]
fn test_unset_user_logger_name_resolves_to_default() {
    // SAFETY: the only test of this binary, nothing else reads the environment concurrently
    unsafe {
        std::env::remove_var("USERLOG_USER_LOGGER_NAME");
        std::env::remove_var("USERLOG_FLUSH_INTERVAL_MS");
    }
    assert_eq!(Settings::from_env().unwrap(), Settings::default());

    let logger = userlog::user_logger().unwrap();
    assert_eq!(logger.root_logger().name(), ROOT_LOGGER_NAME);
    assert_eq!(logger.user_logger().name(), DEFAULT_USER_LOGGER_NAME);
    logger.root_logger().info("root logger resolved");
}
