use std::{collections::BTreeMap, fmt::Display};

use uuid::Uuid;

/// Label of the internal flag marking that user level logging was requested.
pub const USER_LOGGING_REQUESTED: &str = "UserLoggerRequested";

/// Well-known context fields rendered into every log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextKey {
    UserId,
    TraceId,
}

impl ContextKey {
    /// All keys, in rendering order.
    pub const ALL: [ContextKey; 2] = [ContextKey::UserId, ContextKey::TraceId];

    pub const fn label(self) -> &'static str {
        match self {
            ContextKey::UserId => "UserID",
            ContextKey::TraceId => "TraceID",
        }
    }
}

impl Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Request scoped fields plus the user logging flag.
///
/// The backends keep one of these per execution context, but it can also be
/// built up front and passed around explicitly.
///
/// ```
/// use userlog_core::{ContextKey, LogContext};
///
/// let context = LogContext::new()
///     .with(ContextKey::UserId, "foo")
///     .with_user_logging_requested(true);
/// assert_eq!(context.get(ContextKey::UserId), Some("foo"));
/// assert!(context.is_user_logging_requested());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    entries: BTreeMap<&'static str, String>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Display>(mut self, key: ContextKey, value: V) -> Self {
        self.put(key, value);
        self
    }

    pub fn with_user_logging_requested(mut self, enabled: bool) -> Self {
        self.set_user_logging_requested(enabled);
        self
    }

    /// Stores a freshly generated trace id.
    pub fn with_generated_trace_id(self) -> Self {
        self.with(ContextKey::TraceId, Uuid::new_v4())
    }

    pub fn put<V: Display>(&mut self, key: ContextKey, value: V) {
        self.entries.insert(key.label(), value.to_string());
    }

    pub fn get(&self, key: ContextKey) -> Option<&str> {
        self.get_label(key.label())
    }

    /// Raw lookup by label, the flag included.
    pub fn get_label(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn remove(&mut self, key: ContextKey) {
        self.entries.remove(key.label());
    }

    pub fn is_user_logging_requested(&self) -> bool {
        self.entries.contains_key(USER_LOGGING_REQUESTED)
    }

    pub fn set_user_logging_requested(&mut self, enabled: bool) {
        if enabled {
            self.entries
                .insert(USER_LOGGING_REQUESTED, USER_LOGGING_REQUESTED.into());
        } else {
            self.entries.remove(USER_LOGGING_REQUESTED);
        }
    }

    /// Removes the flag and every context key, present or not.
    pub fn clear(&mut self) {
        self.entries.remove(USER_LOGGING_REQUESTED);
        for key in ContextKey::ALL {
            self.entries.remove(key.label());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context fields present, in [`ContextKey::ALL`] order. The flag is not a field.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        ContextKey::ALL
            .iter()
            .filter_map(|key| {
                self.entries
                    .get(key.label())
                    .map(|value| (key.label(), value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ContextKey::UserId.label(), "UserID");
        assert_eq!(ContextKey::TraceId.to_string(), "TraceID");
    }

    #[test]
    fn test_request_scenario() {
        let mut context = LogContext::new();
        context.put(ContextKey::UserId, "foo");
        context.put(ContextKey::TraceId, "t1");
        context.set_user_logging_requested(true);
        assert!(context.is_user_logging_requested());
        assert_eq!(context.get(ContextKey::UserId), Some("foo"));
        assert_eq!(context.get(ContextKey::TraceId), Some("t1"));
        assert_eq!(
            context.get_label(USER_LOGGING_REQUESTED),
            Some(USER_LOGGING_REQUESTED)
        );

        context.clear();
        assert_eq!(context.get(ContextKey::UserId), None);
        assert_eq!(context.get(ContextKey::TraceId), None);
        assert!(!context.is_user_logging_requested());
        assert!(context.is_empty());
    }

    #[test]
    fn test_remove_single_key() {
        let mut context = LogContext::new()
            .with(ContextKey::UserId, "foo")
            .with(ContextKey::TraceId, "t1")
            .with_user_logging_requested(true);
        context.remove(ContextKey::UserId);
        context.remove(ContextKey::UserId);
        assert_eq!(context.get(ContextKey::UserId), None);
        assert_eq!(context.get(ContextKey::TraceId), Some("t1"));
        assert!(context.is_user_logging_requested());
    }

    #[test]
    fn test_flag_defaults_to_false() {
        assert!(!LogContext::new().is_user_logging_requested());
    }

    #[test]
    fn test_set_flag_is_idempotent() {
        let mut once = LogContext::new();
        once.set_user_logging_requested(true);
        let mut twice = LogContext::new();
        twice.set_user_logging_requested(true);
        twice.set_user_logging_requested(true);
        assert_eq!(once, twice);

        once.set_user_logging_requested(false);
        twice.set_user_logging_requested(false);
        twice.set_user_logging_requested(false);
        assert_eq!(once, twice);
        assert!(!twice.is_user_logging_requested());
    }

    #[test]
    fn test_clear_is_idempotent_on_empty() {
        let mut context = LogContext::new();
        context.clear();
        context.clear();
        assert!(context.is_empty());
    }

    #[test]
    fn test_clear_after_any_sequence() {
        let steps: [&dyn Fn(&mut LogContext); 4] = [
            &|c| c.put(ContextKey::UserId, 42),
            &|c| c.put(ContextKey::TraceId, "abc"),
            &|c| c.set_user_logging_requested(true),
            &|c| c.put(ContextKey::UserId, "overwritten"),
        ];
        for len in 0..=steps.len() {
            let mut context = LogContext::new();
            for step in &steps[..len] {
                step(&mut context);
            }
            context.clear();
            assert!(context.is_empty(), "not empty after {len} steps");
        }
    }

    #[test]
    fn test_fields_order_and_flag_exclusion() {
        let context = LogContext::new()
            .with(ContextKey::TraceId, "t1")
            .with(ContextKey::UserId, 7)
            .with_user_logging_requested(true);
        assert_eq!(
            context.fields(),
            vec![("UserID", "7".to_string()), ("TraceID", "t1".to_string())]
        );
    }

    #[test]
    fn test_generated_trace_id() {
        let context = LogContext::new().with_generated_trace_id();
        let trace_id = context.get(ContextKey::TraceId).unwrap();
        assert!(Uuid::parse_str(trace_id).is_ok());
    }
}
