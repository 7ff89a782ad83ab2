//! Command-line option strings.
//!
//! Objects are configured with option arrays such as `["-C", "0.25", "-M", "2"]`
//! and exchanged as command-line strings such as
//! `weka.classifiers.trees.J48 -C 0.25 -M 2`. The functions here produce and
//! parse exactly the strings `weka.core.Utils` does (`splitOptions`,
//! `joinOptions`, `backQuoteChars`, `quote` and friends), so a string made on
//! either side of the bridge can be read on the other without a VM.
//!
//! # Example
//!
//! ```
//! use weka_bridge::classes::options::{join_options, split_options};
//!
//! let options = vec![
//!     "-F".to_string(),
//!     "weka.filters.unsupervised.attribute.Remove -R 1".to_string(),
//! ];
//! let joined = join_options(&options);
//! assert_eq!(joined, r#"-F "weka.filters.unsupervised.attribute.Remove -R 1""#);
//! assert_eq!(split_options(&joined).unwrap(), options);
//! ```

use crate::error::{Result, WekaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Characters replaced by [`backquote`], in replacement order.
const BACKQUOTE_CHARS: [(char, &str); 8] = [
    ('\\', "\\\\"),
    ('\'', "\\'"),
    ('\t', "\\t"),
    ('\n', "\\n"),
    ('\r', "\\r"),
    ('"', "\\\""),
    ('%', "\\%"),
    ('\u{1E}', "\\u001E"),
];

/// `java.lang.Character.isWhitespace`.
///
/// Differs from [`char::is_whitespace`]: the information separators
/// U+001C..U+001F count as whitespace, while NEL and the no-break spaces
/// (U+0085, U+00A0, U+2007, U+202F) do not.
pub fn is_java_whitespace(c: char) -> bool {
    match c {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        c => c.is_whitespace(),
    }
}

/// `java.lang.String.trim`: strips every character up to and including U+0020.
fn java_trim(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

/// Splits a command-line string into option tokens.
///
/// Tokens are separated by Java whitespace. A token starting with `"` runs
/// to the next unescaped `"` and is unbackquoted; the quotes are dropped.
///
/// # Errors
///
/// [`WekaError::MalformedCommandLine`] for an unterminated quote or a quoted
/// token ending in a lone backslash.
pub fn split_options(quoted: &str) -> Result<Vec<String>> {
    let chars: Vec<char> = quoted.chars().collect();
    let mut options = Vec::new();
    let mut pos = 0;

    loop {
        while pos < chars.len() && is_java_whitespace(chars[pos]) {
            pos += 1;
        }
        if pos == chars.len() {
            break;
        }

        if chars[pos] == '"' {
            let start = pos + 1;
            let mut i = start;
            while i < chars.len() {
                if chars[i] == '"' {
                    break;
                }
                if chars[i] == '\\' {
                    i += 1;
                    if i >= chars.len() {
                        return Err(WekaError::MalformedCommandLine(
                            "String should not finish with \\".to_string(),
                        ));
                    }
                }
                i += 1;
            }
            if i >= chars.len() {
                return Err(WekaError::MalformedCommandLine(
                    "Quote parse error.".to_string(),
                ));
            }
            let token: String = chars[start..i].iter().collect();
            options.push(unbackquote(&token));
            pos = i + 1;
        } else {
            let start = pos;
            while pos < chars.len() && !is_java_whitespace(chars[pos]) {
                pos += 1;
            }
            options.push(chars[start..pos].iter().collect());
        }
    }

    Ok(options)
}

/// Joins option tokens into a single string.
///
/// Empty tokens are skipped. Tokens containing whitespace or a quote
/// character are backquoted and wrapped in double quotes.
pub fn join_options<S: AsRef<str>>(options: &[S]) -> String {
    let mut joined = String::new();
    for option in options {
        let option = option.as_ref();
        if option.is_empty() {
            continue;
        }
        let escape = option
            .chars()
            .any(|c| is_java_whitespace(c) || c == '"' || c == '\'');
        if escape {
            joined.push('"');
            joined.push_str(&backquote(option));
            joined.push('"');
        } else {
            joined.push_str(option);
        }
        joined.push(' ');
    }
    java_trim(&joined).to_string()
}

/// Replaces `\ ' \t \n \r " %` and U+001E with their backslash-escaped forms.
pub fn backquote(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match BACKQUOTE_CHARS.iter().find(|(find, _)| *find == c) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(c),
        }
    }
    result
}

/// Reverses [`backquote`]; unknown escapes are kept verbatim.
pub fn unbackquote(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while !rest.is_empty() {
        let matched = BACKQUOTE_CHARS
            .iter()
            .find(|(_, escaped)| rest.starts_with(escaped));
        match matched {
            Some((original, escaped)) => {
                result.push(*original);
                rest = &rest[escaped.len()..];
            }
            None => {
                // non-empty, so there is a first char
                let c = rest.chars().next().unwrap_or_default();
                result.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    result
}

/// Quotes a value the way ARFF headers and option values expect.
///
/// Values with characters that need escaping are backquoted. Those, and
/// values containing `{`, `}`, `,` or a space, as well as `?` and the empty
/// string, are enclosed in single quotes.
pub fn quote(s: &str) -> String {
    let needs_backquote = s
        .chars()
        .any(|c| BACKQUOTE_CHARS.iter().any(|(find, _)| *find == c));
    let value = if needs_backquote {
        backquote(s)
    } else {
        s.to_string()
    };

    let enclose = needs_backquote
        || value.contains(['{', '}', ',', ' '])
        || value == "?"
        || value.is_empty();
    if enclose {
        format!("'{}'", value)
    } else {
        value
    }
}

/// Reverses [`quote`]: strips enclosing single quotes and unbackquotes.
///
/// Strings that are not enclosed in single quotes are returned unchanged.
pub fn unquote(s: &str) -> String {
    match s.strip_prefix('\'').and_then(|inner| inner.strip_suffix('\'')) {
        Some(inner) => unbackquote(inner),
        None => s.to_string(),
    }
}

/// A class name plus its option tokens.
///
/// `Display` renders the canonical command-line string (`weka.core.Utils.toCommandLine`);
/// `FromStr` parses one back.
///
/// ```
/// use weka_bridge::classes::options::CommandLine;
///
/// let cmdline: CommandLine = "weka.classifiers.trees.J48 -C 0.25 -M 2".parse().unwrap();
/// assert_eq!(cmdline.classname, "weka.classifiers.trees.J48");
/// assert_eq!(cmdline.options, vec!["-C", "0.25", "-M", "2"]);
/// assert_eq!(cmdline.to_string(), "weka.classifiers.trees.J48 -C 0.25 -M 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// Fully qualified class name in dot notation.
    pub classname: String,
    /// Option tokens.
    pub options: Vec<String>,
}

impl CommandLine {
    pub fn new(classname: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            classname: classname.into(),
            options,
        }
    }
}

impl FromStr for CommandLine {
    type Err = WekaError;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = split_options(s)?.into_iter();
        let classname = tokens
            .next()
            .ok_or_else(|| WekaError::MalformedCommandLine("No classname found".to_string()))?;
        Ok(Self {
            classname,
            options: tokens.collect(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format!("{} {}", self.classname, join_options(&self.options));
        f.write_str(java_trim(&line))
    }
}
