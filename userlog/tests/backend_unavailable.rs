use log::{Log, Metadata, Record};
use userlog::UserLogError;

struct OtherLogger;

impl Log for OtherLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        false
    }
    fn log(&self, _: &Record) {}
    fn flush(&self) {}
}

static OTHER: OtherLogger = OtherLogger;

#[test]
fn test_backend_unavailable_when_another_logger_is_installed() {
    log::set_logger(&OTHER).unwrap();
    for _ in 0..2 {
        match userlog::user_logger() {
            Err(UserLogError::BackendUnavailable(_)) => {}
            other => panic!("expected BackendUnavailable, got {other:?}"),
        }
    }
    // context operations stay usable without a backend
    userlog::put_context(userlog::ContextKey::UserId, "foo");
    userlog::clear_context();
    assert!(userlog::current_context().is_empty());
}
