//! Per-pass identifier allocation
//!
//! A [`NameScope`] lives for exactly one generation pass. It hands out user
//! variable identifiers and fresh names for temporaries, and never gives the
//! same identifier to two different things.

use std::collections::{HashMap, HashSet};

/// Rust keywords, strict and reserved
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Identifier registry for one generation pass
#[derive(Debug, Clone)]
pub struct NameScope {
    /// Every identifier a fresh name must avoid
    taken: HashSet<String>,
    /// Identifiers a user variable may not reuse
    blocked: HashSet<String>,
    /// User-facing names mapped to their identifiers
    declared: HashMap<String, String>,
}

impl NameScope {
    /// Create a scope with the Rust keywords reserved
    pub fn new() -> Self {
        let mut scope = Self {
            taken: HashSet::new(),
            blocked: HashSet::new(),
            declared: HashMap::new(),
        };
        for kw in RUST_KEYWORDS {
            scope.taken.insert(kw.to_string());
            scope.blocked.insert(kw.to_string());
        }
        scope
    }

    /// Keep `name` away from fresh names without binding it to anything
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// The identifier for a user-chosen name. Asking again for the same
    /// name returns the same identifier.
    pub fn declare(&mut self, name: &str) -> String {
        if let Some(ident) = self.declared.get(name) {
            return ident.clone();
        }
        let safe = safe_name(name);
        let ident = if self.blocked.contains(&safe) {
            self.distinct(&safe)
        } else {
            safe
        };
        self.claim(&ident);
        self.declared.insert(name.to_string(), ident.clone());
        ident
    }

    /// A new identifier derived from `base` that nothing else in this pass
    /// uses. Every call returns a different identifier.
    pub fn fresh(&mut self, base: &str) -> String {
        let ident = self.distinct(&safe_name(base));
        self.claim(&ident);
        log::trace!("allocated fresh name '{}'", ident);
        ident
    }

    fn claim(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
        self.blocked.insert(ident.to_string());
    }

    fn distinct(&self, base: &str) -> String {
        if !self.taken.contains(base) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}{}", base, suffix);
            if !self.taken.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl Default for NameScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn arbitrary text into a valid Rust identifier
pub fn safe_name(name: &str) -> String {
    let mut out: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push_str("unnamed");
    } else if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "my_");
    }
    out
}

/// Whether text is already a plain identifier (`^\w+$`)
pub fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_names_are_distinct() {
        let mut scope = NameScope::new();
        let a = scope.fresh("x");
        let b = scope.fresh("x");
        let c = scope.fresh("x");
        assert_eq!(a, "x");
        assert_eq!(b, "x2");
        assert_eq!(c, "x3");
    }

    #[test]
    fn test_fresh_avoids_reserved_and_declared() {
        let mut scope = NameScope::new();
        scope.reserve("count");
        assert_eq!(scope.declare("repeat_end"), "repeat_end");
        assert_eq!(scope.fresh("count"), "count2");
        assert_eq!(scope.fresh("repeat_end"), "repeat_end2");
    }

    #[test]
    fn test_declare_is_stable() {
        let mut scope = NameScope::new();
        let first = scope.declare("my var");
        assert_eq!(first, "my_var");
        assert_eq!(scope.declare("my var"), first);
        // A different user name with the same safe form gets its own identifier.
        assert_eq!(scope.declare("my_var"), "my_var2");
    }

    #[test]
    fn test_declare_avoids_keywords_and_fresh_names() {
        let mut scope = NameScope::new();
        assert_eq!(scope.declare("loop"), "loop2");
        let temp = scope.fresh("i_end");
        assert_eq!(scope.declare("i_end"), format!("{}2", temp));
    }

    #[test]
    fn test_reserved_names_stay_usable_for_users() {
        let mut scope = NameScope::new();
        scope.reserve("total");
        assert_eq!(scope.declare("total"), "total");
        assert_eq!(scope.fresh("total"), "total2");
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(safe_name("count"), "count");
        assert_eq!(safe_name("a-b c"), "a_b_c");
        assert_eq!(safe_name("9lives"), "my_9lives");
        assert_eq!(safe_name(""), "unnamed");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("x"));
        assert!(is_identifier("repeat_end2"));
        assert!(is_identifier("5"));
        assert!(!is_identifier("get_count()"));
        assert!(!is_identifier(""));
    }
}
