//! Import spec handling.

use regex::Regex;

/// An import spec that may match more than one type.
pub fn is_wildcard_import(spec: &str) -> bool {
    spec.contains('*')
}

/// Translate an import spec into an anchored pattern over qualified names.
///
/// `*` matches within one package segment, `**` matches across segments;
/// everything else is literal. So `inet.*` covers `inet.Host` but not
/// `inet.nodes.Host`, which needs `inet.**`.
pub fn import_to_regex(spec: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(spec.len() * 2 + 2);
    pattern.push('^');
    let mut rest = spec;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("**") {
            pattern.push_str(".*");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            pattern.push_str("[^.]*");
            rest = tail;
        } else {
            let end = rest.find('*').unwrap_or(rest.len());
            pattern.push_str(&regex::escape(&rest[..end]));
            rest = &rest[end..];
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

/// Whether an explicit import brings `name` into scope.
pub fn imports_name(spec: &str, name: &str) -> bool {
    spec == name
        || spec
            .strip_suffix(name)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
