//! Player-facing message templates.
use std::collections::HashMap;

use combat_core::LogMessage;

/// Templates keyed by message key, with `{0}`, `{1}`, … standing for the
/// message's positional arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Renders a message. Unknown keys render as `key(arg, …)`; placeholders
    /// without a matching argument are left as written.
    pub fn format(&self, message: &LogMessage) -> String {
        let Some(template) = self.template(&message.key) else {
            return message.to_string();
        };

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let arg = after.find('}').and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                message.args.get(index).map(|arg| (arg, close))
            });
            match arg {
                Some((arg, close)) => {
                    out.push_str(arg);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}
