use userlog::{ContextKey, InitGlobal, logger_config};

fn main() {
    let _guard = logger_config()
        .with_user_log_file("/tmp/userlog_requests.log")
        .unwrap()
        .init_global()
        .expect("logging backend unavailable");
    let logger = userlog::user_logger().unwrap();
    logger.root_logger().info("Hi");

    // each request carries its user id, trace logging is requested for odd ones
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                let _context = userlog::context_guard();
                userlog::put_context(ContextKey::UserId, format!("user-{i}"));
                userlog::put_context(ContextKey::TraceId, format!("request {i}"));
                userlog::set_user_logging_requested(i % 2 == 1);

                if userlog::is_user_logging_requested() {
                    logger.user_logger().trace("Hello from user logger");
                }
                logger.root_logger().info("request handled");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.root_logger().info("no context left on the main thread");
}
