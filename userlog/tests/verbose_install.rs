use log::LevelFilter;
use userlog::DEFAULT_USER_LOGGER_NAME;

#[test]
fn test_install_with_debug_already_enabled() {
    // SAFETY: the only test of this binary, nothing else reads the environment concurrently
    unsafe {
        std::env::remove_var("USERLOG_USER_LOGGER_NAME");
    }
    // the default configuration is built while debug records are let through
    log::set_max_level(LevelFilter::Trace);
    let logger = userlog::user_logger().unwrap();
    assert_eq!(logger.user_logger().name(), DEFAULT_USER_LOGGER_NAME);
    logger.user_logger().debug("installed");
}
