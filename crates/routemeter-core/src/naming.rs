//! Metric name computation for annotated resource methods.

use crate::resource::{MetricAnnotation, ResolvedMethod};

/// Separator between dotted name segments.
pub const SEPARATOR: char = '.';

/// Join `base` and each non-empty segment with `.`.
pub fn name<S: AsRef<str>>(base: &str, parts: &[S]) -> String {
    let mut out = String::from(base);
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(part);
    }
    out
}

/// Pick the metric name for a method.
///
/// - explicit, non-empty name + `absolute`: the name verbatim
/// - explicit, non-empty name: `<declaringType>.<name>`
/// - otherwise: `<declaringType>.<method>[.<suffix>...]`
pub fn choose_name<S: AsRef<str>>(
    explicit: Option<&str>,
    absolute: bool,
    method: &ResolvedMethod<'_>,
    suffixes: &[S],
) -> String {
    let declaring = method.declaring_type.canonical_name();
    match explicit.filter(|n| !n.is_empty()) {
        Some(n) if absolute => n.to_string(),
        Some(n) => name(declaring, &[n]),
        None => name(&name(declaring, &[method.decl.name.as_str()]), suffixes),
    }
}

/// Metric name for an annotation, without suffixes.
pub fn annotation_name(annotation: &MetricAnnotation, method: &ResolvedMethod<'_>) -> String {
    choose_name::<&str>(annotation.name.as_deref(), annotation.absolute, method, &[])
}
