//! `%{dotted.path}` placeholder substitution.
//!
//! Placeholders are resolved against a JSON argument object by walking the
//! dotted path through nested objects. Strings are inserted as-is and numbers
//! in their JSON form. Anything else (a missing path, `null`, booleans,
//! arrays, objects) leaves the placeholder text untouched so the gap is
//! visible in the rendered output.
//!
//! Substitution is a single left-to-right pass; inserted text is never
//! scanned again.

use serde_json::{Number, Value};

/// Walk `path` (dot-separated) through nested objects in `args`.
///
/// # Examples
///
/// ```
/// use keyglot::interpolate::navigate_args;
/// use serde_json::json;
///
/// let args = json!({ "name": { "first": "Johnny" } });
/// assert_eq!(navigate_args(&args, "name.first"), Some(&json!("Johnny")));
/// assert_eq!(navigate_args(&args, "name.last"), None);
/// ```
#[must_use]
pub fn navigate_args<'a>(args: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(args, |node, segment| node.as_object()?.get(segment))
}

/// Render a number the way it reads in a sentence.
///
/// Integral floats drop the fraction, so a count of `1.0` renders as `1`.
///
/// # Examples
///
/// ```
/// use keyglot::interpolate::render_number;
/// use serde_json::Number;
///
/// assert_eq!(render_number(&Number::from(3)), "3");
/// assert_eq!(render_number(&Number::from_f64(1.0).expect("finite")), "1");
/// assert_eq!(render_number(&Number::from_f64(0.5).expect("finite")), "0.5");
/// ```
#[must_use]
pub fn render_number(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}

fn substitution(args: &Value, path: &str) -> Option<String> {
    match navigate_args(args, path)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(render_number(number)),
        _ => None,
    }
}

/// Replace every `%{path}` in `template` with its value from `args`.
///
/// # Examples
///
/// ```
/// use keyglot::interpolate::interpolate;
/// use serde_json::json;
///
/// let args = json!({ "name": { "first": "Johnny", "last": "Smith" }, "count": 3 });
/// assert_eq!(interpolate("Hello, %{name.first}", &args), "Hello, Johnny");
/// assert_eq!(interpolate("%{count} messages", &args), "3 messages");
/// assert_eq!(interpolate("Hi %{nobody}", &args), "Hi %{nobody}");
/// ```
#[must_use]
pub fn interpolate(template: &str, args: &Value) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((before, after)) = rest.split_once("%{") {
        result.push_str(before);
        let Some((path, tail)) = after
            .find(['{', '}'])
            .and_then(|at| after.split_at_checked(at))
        else {
            // Unterminated placeholder: emit as-is.
            result.push_str("%{");
            rest = after;
            continue;
        };

        if let Some(remaining) = tail.strip_prefix('}') {
            if let Some(value) = substitution(args, path) {
                result.push_str(&value);
            } else {
                result.push_str("%{");
                result.push_str(path);
                result.push('}');
            }
            rest = remaining;
        } else {
            // A `{` opens before this placeholder closes; rescan from there so
            // a following `%{name}` is still substituted.
            let literal = path.strip_suffix('%').unwrap_or(path);
            result.push_str("%{");
            result.push_str(literal);
            rest = after.get(literal.len()..).unwrap_or_default();
        }
    }

    result.push_str(rest);
    result
}
