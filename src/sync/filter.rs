use regex::{Regex, RegexBuilder};

/// Filename filter built from shell-style wildcard patterns.
///
/// Patterns support `*`, `?`, and `[...]` / `[!...]` character classes and
/// must match the entire filename. Matching is case-insensitive. With no
/// patterns configured, every filename passes.
#[derive(Debug, Clone, Default)]
pub struct FilenameFilter {
    patterns: Vec<Regex>,
}

impl FilenameFilter {
    /// Compile the given wildcard patterns. Blank entries are dropped; an
    /// invalid pattern (e.g. a reversed character range) is an error.
    pub fn new(patterns: &[String]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            let regex = RegexBuilder::new(&translate(pattern))
                .case_insensitive(true)
                .build()?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether the filename passes: any pattern matches, or none are configured.
    pub fn matches(&self, filename: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(filename))
    }
}

/// Expand a shell wildcard pattern into an anchored regular expression:
/// `*` becomes `.*`, `?` becomes `.`, bracket classes carry over, and
/// everything else is escaped. A `[` with no closing `]` is literal.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => {
                let mut j = i + 1;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                // A ']' directly after the opening (or the '!') is literal.
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    regex.push_str("\\[");
                } else {
                    let inner: String = chars[i + 1..j].iter().collect();
                    regex.push('[');
                    match inner.strip_prefix('!') {
                        Some(rest) => {
                            regex.push('^');
                            regex.push_str(&escape_class(rest));
                        }
                        None => regex.push_str(&escape_class(&inner)),
                    }
                    regex.push(']');
                    i = j;
                }
            }
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Escape the characters that are special inside a regex character class.
/// `-` stays as-is so ranges like `[0-9]` keep working.
fn escape_class(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    for c in inner.chars() {
        match c {
            '\\' | ']' | '[' => {
                out.push('\\');
                out.push(c);
            }
            '^' if out.is_empty() => {
                out.push('\\');
                out.push('^');
            }
            c => out.push(c),
        }
    }
    out
}
