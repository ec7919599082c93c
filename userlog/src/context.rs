use std::{cell::RefCell, fmt::Display, marker::PhantomData};

use userlog_core::{ContextKey, LogContext};

thread_local! {
    /// Context of the unit of work currently running on this thread.
    static LOG_CONTEXT: RefCell<LogContext> = RefCell::new(LogContext::new());
}

fn with_current<R>(f: impl FnOnce(&mut LogContext) -> R) -> R {
    LOG_CONTEXT.with(|context| f(&mut context.borrow_mut()))
}

/// Stores `value` under `key` for every following log line on this thread.
pub fn put_context<V: Display>(key: ContextKey, value: V) {
    // rendered before borrowing, `Display` may log or read the context itself
    let value = value.to_string();
    with_current(|context| context.put(key, value))
}

pub fn get_context(key: ContextKey) -> Option<String> {
    with_current(|context| context.get(key).map(String::from))
}

pub fn is_user_logging_requested() -> bool {
    with_current(|context| context.is_user_logging_requested())
}

pub fn set_user_logging_requested(enabled: bool) {
    with_current(|context| context.set_user_logging_requested(enabled))
}

/// Removes all context information previously stored on this thread.
/// This should always be called at the exit point of a flow, see [`context_guard`].
pub fn clear_context() {
    with_current(LogContext::clear)
}

/// Snapshot of this thread's context. Empty while the thread is shutting down.
pub fn current_context() -> LogContext {
    LOG_CONTEXT
        .try_with(|context| context.borrow().clone())
        .unwrap_or_default()
}

/// Clears the thread's context when dropped, unwinding included.
#[must_use = "the context is cleared as soon as the guard is dropped"]
pub struct ContextGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let _ = LOG_CONTEXT.try_with(|context| context.borrow_mut().clear());
    }
}

/// Returns a guard clearing the context at the end of the current flow.
///
/// ```
/// use userlog::{ContextKey, context_guard, get_context, put_context};
///
/// {
///     let _guard = context_guard();
///     put_context(ContextKey::UserId, "foo");
/// }
/// assert_eq!(get_context(ContextKey::UserId), None);
/// ```
pub fn context_guard() -> ContextGuard {
    ContextGuard {
        _not_send: PhantomData,
    }
}

struct Restore(Option<LogContext>);

impl Drop for Restore {
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            let _ = LOG_CONTEXT.try_with(|context| *context.borrow_mut() = previous);
        }
    }
}

/// Runs `f` with `context` as this thread's context, then puts the previous one back.
pub fn with_context<R>(context: LogContext, f: impl FnOnce() -> R) -> R {
    let previous = with_current(|current| std::mem::replace(current, context));
    let _restore = Restore(Some(previous));
    f()
}
