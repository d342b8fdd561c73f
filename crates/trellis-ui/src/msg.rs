//! Message lookup.
//!
//! User-visible strings are referenced by key and resolved through a pluggable
//! [`MessageSource`]. Parameters are substituted positionally: `$1` is the first
//! parameter, `$2` the second, and so on. A placeholder without a matching
//! parameter is left as written, and an unknown key resolves to `[key]`.

/// Provides message templates by key.
pub trait MessageSource: Send + Sync {
    fn message(&self, key: &str) -> Option<String>;
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("trellis-dialog-action-close", "Close"),
    ("trellis-outline-control-move-down", "Move item down"),
    ("trellis-outline-control-move-up", "Move item up"),
    ("trellis-toggle-on", "On"),
    ("trellis-toggle-off", "Off"),
    ("trellis-toolbar-more", "More"),
];

/// Built-in English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageSource for DefaultMessages {
    fn message(&self, key: &str) -> Option<String> {
        DEFAULT_MESSAGES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    }
}

/// Resolve `key` against `source` and substitute parameters.
pub fn resolve(source: &dyn MessageSource, key: &str, params: &[&str]) -> String {
    match source.message(key) {
        Some(template) => substitute(&template, params),
        None => format!("[{}]", key),
    }
}

/// Replace `$N` placeholders with `params[N - 1]`.
pub fn substitute(template: &str, params: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let param = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| params.get(i));

        match param {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[pos..pos + 1 + digits]),
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Table;

    impl MessageSource for Table {
        fn message(&self, key: &str) -> Option<String> {
            match key {
                "greeting" => Some("Hello $1, you have $2 new $3".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(resolve(&DefaultMessages, "trellis-toolbar-more", &[]), "More");
        assert_eq!(
            resolve(&DefaultMessages, "trellis-dialog-action-close", &[]),
            "Close"
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(resolve(&DefaultMessages, "missing-key", &[]), "[missing-key]");
    }

    #[test]
    fn test_positional_substitution() {
        assert_eq!(
            resolve(&Table, "greeting", &["Ana", "3", "messages"]),
            "Hello Ana, you have 3 new messages"
        );
    }

    #[test]
    fn test_missing_param_left_in_place() {
        assert_eq!(resolve(&Table, "greeting", &["Ana"]), "Hello Ana, you have $2 new $3");
    }

    #[test]
    fn test_lone_dollar() {
        assert_eq!(substitute("costs $ and $0", &["x"]), "costs $ and $0");
        assert_eq!(substitute("$1$1", &["ab"]), "abab");
    }
}
