use userlog_tokio::{ContextKey, LogContext, ScopeGlobal, logger_config, scope_context};

#[tokio::main]
async fn main() {
    logger_config()
        .with_user_logger_name("customer")
        .scope_global(async move {
            let logger = userlog_tokio::user_logger().unwrap();
            logger.root_logger().info("Hi");

            // one task per inbound request, each with its own context
            let handles: Vec<_> = ["alice", "bob", "carol"]
                .into_iter()
                .map(|user| {
                    let logger = logger.clone();
                    let request = LogContext::new()
                        .with(ContextKey::UserId, user)
                        .with_generated_trace_id()
                        .with_user_logging_requested(user != "bob");
                    tokio::spawn(scope_context(request, async move {
                        if userlog_tokio::is_user_logging_requested() {
                            logger.user_logger().trace("Hello from user logger");
                        }
                        logger.root_logger().info("request handled");
                    }))
                })
                .collect();
            for handle in handles {
                handle.await.unwrap();
            }
        })
        .await
        .expect("logging backend unavailable");
}
