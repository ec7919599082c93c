use std::{cell::RefCell, fmt::Display, future::Future};

use userlog_core::{ContextKey, LogContext};

tokio::task_local! {
    /// Context of the request the current task is serving.
    static LOG_CONTEXT: RefCell<LogContext>;
}

/// Runs `f` against the task's context. Outside [`scope_context`] there is none.
fn with_current<R>(f: impl FnOnce(&mut LogContext) -> R) -> Option<R> {
    LOG_CONTEXT
        .try_with(|context| f(&mut context.borrow_mut()))
        .ok()
}

/// Runs `f` with `context` as its task context.
///
/// Spawned tasks do not inherit it, scope them again with
/// [`current_context`] if they belong to the same request.
pub async fn scope_context<F: Future>(context: LogContext, f: F) -> F::Output {
    LOG_CONTEXT.scope(RefCell::new(context), f).await
}

pub fn put_context<V: Display>(key: ContextKey, value: V) {
    // rendered before borrowing, `Display` may log or read the context itself
    let value = value.to_string();
    with_current(|context| context.put(key, value));
}

pub fn get_context(key: ContextKey) -> Option<String> {
    with_current(|context| context.get(key).map(String::from)).flatten()
}

pub fn is_user_logging_requested() -> bool {
    with_current(|context| context.is_user_logging_requested()).unwrap_or(false)
}

pub fn set_user_logging_requested(enabled: bool) {
    with_current(|context| context.set_user_logging_requested(enabled));
}

/// Removes all context information stored in the current scope.
pub fn clear_context() {
    with_current(LogContext::clear);
}

/// Snapshot of the task's context, empty outside [`scope_context`].
pub fn current_context() -> LogContext {
    LOG_CONTEXT
        .try_with(|context| context.borrow().clone())
        .unwrap_or_default()
}
