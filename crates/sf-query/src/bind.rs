//! Positional parameter binding for SOQL templates.
//!
//! Templates use `%s` markers, substituted left to right; `%%` is a
//! literal percent. Arity is checked before any substitution so a
//! mismatch never reaches the network.

use crate::error::{Error, ErrorKind, Result};

/// Count `%s` placeholders, honoring `%%` escapes.
fn placeholder_count(template: &str) -> usize {
    let mut count = 0;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('s') => {
                    count += 1;
                    chars.next();
                }
                Some('%') => {
                    chars.next();
                }
                _ => {}
            }
        }
    }
    count
}

/// Substitute positional `%s` placeholders with the given parameters.
///
/// Every `%s` is replaced in order and `%%` collapses to `%`; a count
/// mismatch fails with a binding error, including zero parameters
/// against a parameterized template. A template without placeholders and
/// without parameters passes through untouched, so SOQL containing
/// literal percent signs (`LIKE 'Acme%'`) needs no escaping in
/// unparameterized queries.
pub fn bind(template: &str, params: &[String]) -> Result<String> {
    let expected = placeholder_count(template);
    if expected != params.len() {
        return Err(Error::new(ErrorKind::Binding {
            expected,
            supplied: params.len(),
        }));
    }

    if params.is_empty() {
        return Ok(template.to_string());
    }

    let mut bound = String::with_capacity(template.len());
    let mut next_param = params.iter();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    // placeholder_count guarantees a parameter is available
                    if let Some(value) = next_param.next() {
                        bound.push_str(value);
                    }
                }
                Some('%') => {
                    chars.next();
                    bound.push('%');
                }
                _ => bound.push('%'),
            }
        } else {
            bound.push(c);
        }
    }

    Ok(bound)
}
