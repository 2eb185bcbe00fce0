//! URL template expansion.
//!
//! Two placeholder forms are understood:
//!
//! - `{name}`  – simple expansion, the value is percent-escaped so a `/`
//!   becomes `%2F`;
//! - `{+name}` – reserved expansion, the value is substituted verbatim so
//!   slash-delimited resource names such as `projects/p/topics/t` survive.
//!
//! After named substitution a second pass replaces the project markers
//! (`{project}`, `{projects}`, `{projectId}`) with the configured project.

use crate::error::TemplateError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use url::Url;

/// RFC 3986 unreserved characters are left alone, everything else is escaped.
const SIMPLE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Markers resolved from the configured project rather than from parameters.
pub const PROJECT_MARKERS: &[&str] = &["project", "projects", "projectId"];

/// Expand `template` against `params` and join it onto `base`.
pub fn expand(
    base: &str,
    template: &str,
    params: &Map<String, Value>,
    project_id: Option<&str>,
) -> Result<Url, TemplateError> {
    let path = expand_path(template, params)?;
    let path = substitute_project(&path, project_id)?;

    let full = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&full).map_err(|e| TemplateError::Malformed {
        template: template.to_string(),
        reason: format!("expanded URL '{}' is invalid: {}", full, e),
    })
}

/// A parsed piece of a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder { name: &'a str, reserved: bool },
}

fn parse(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Literal(&rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| TemplateError::Malformed {
            template: template.to_string(),
            reason: "unterminated placeholder".to_string(),
        })?;

        let inner = &after[..close];
        let (reserved, name) = match inner.strip_prefix('+') {
            Some(n) => (true, n),
            None => (false, inner),
        };
        if name.is_empty() || name.contains('{') {
            return Err(TemplateError::Malformed {
                template: template.to_string(),
                reason: format!("invalid placeholder '{{{}}}'", inner),
            });
        }
        segments.push(Segment::Placeholder { name, reserved });
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest));
    }
    Ok(segments)
}

/// First pass: substitute every `{name}` / `{+name}` from `params`.
///
/// Project markers without a matching parameter are written back untouched
/// for [`substitute_project`].
pub fn expand_path(template: &str, params: &Map<String, Value>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());

    for segment in parse(template)? {
        let (name, reserved) = match segment {
            Segment::Literal(text) => {
                out.push_str(text);
                continue;
            }
            Segment::Placeholder { name, reserved } => (name, reserved),
        };

        match scalar(name, params.get(name))? {
            Some(value) if reserved => out.push_str(&value),
            Some(value) => out.extend(utf8_percent_encode(&value, SIMPLE)),
            None if !reserved && PROJECT_MARKERS.contains(&name) => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            None => return Err(TemplateError::MissingParameter(name.to_string())),
        }
    }
    Ok(out)
}

/// Second pass: replace project markers anywhere in an expanded path.
pub fn substitute_project(path: &str, project_id: Option<&str>) -> Result<String, TemplateError> {
    let mut out = path.to_string();
    for marker in PROJECT_MARKERS {
        let literal = format!("{{{}}}", marker);
        if out.contains(&literal) {
            let project = project_id
                .filter(|p| !p.is_empty())
                .ok_or_else(|| TemplateError::MissingParameter(marker.to_string()))?;
            out = out.replace(&literal, project);
        }
    }
    Ok(out)
}

/// Names of every placeholder in `template`, in order of appearance.
pub fn placeholder_names(template: &str) -> Result<Vec<String>, TemplateError> {
    Ok(parse(template)?
        .into_iter()
        .filter_map(|s| match s {
            Segment::Placeholder { name, .. } => Some(name.to_string()),
            Segment::Literal(_) => None,
        })
        .collect())
}

/// Append query pairs; the URL comes back unmodified when there are none.
pub fn append_query(mut url: Url, pairs: &[(String, String)]) -> Url {
    if pairs.is_empty() {
        return url;
    }
    {
        let mut q = url.query_pairs_mut();
        for (k, v) in pairs {
            q.append_pair(k, v);
        }
    }
    url
}

/// Collect query pairs for the declared `names` present in `params`.
/// Array values repeat the key; nulls are skipped.
pub fn query_pairs(
    names: &[String],
    params: &Map<String, Value>,
) -> Result<Vec<(String, String)>, TemplateError> {
    let mut pairs = Vec::new();
    for name in names {
        match params.get(name) {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Some(v) = scalar(name, Some(item))? {
                        pairs.push((name.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar(name, other)? {
                    pairs.push((name.clone(), v));
                }
            }
        }
    }
    Ok(pairs)
}

/// Render a parameter as text. Absent, null and empty strings count as missing.
fn scalar(name: &str, value: Option<&Value>) -> Result<Option<String>, TemplateError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(TemplateError::UnsupportedValue(name.to_string())),
    }
}
