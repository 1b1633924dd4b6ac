//! Request planning
//!
//! Maps bound arguments onto the concrete request: path segments from the
//! template, query parameters by placement, and the auction watermark.

use armory_domain::constants::FIELDS_QUERY_KEY;
use armory_domain::{ArmoryError, Result};
use tracing::debug;

use super::binding::BoundArgs;
use super::catalog::{OperationDescriptor, Placement};
use crate::request::ResourcePath;

/// Concrete request derived from one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    pub path: ResourcePath,
    pub query: Vec<(String, String)>,
    /// Snapshot watermark for two-phase operations
    pub watermark: Option<i64>,
}

/// Build the request for `descriptor` from already-bound `args`.
///
/// # Errors
/// Returns `ArmoryError::Internal` if the path template names a parameter
/// that was not bound, which indicates a malformed descriptor.
pub fn plan(descriptor: &OperationDescriptor, args: &BoundArgs) -> Result<RequestPlan> {
    let path = render_path(descriptor, args)?;
    let mut query = Vec::new();
    let mut watermark = None;

    for spec in &descriptor.params {
        let Some(value) = args.get(spec.name) else { continue };

        match spec.placement {
            Placement::Path => {}
            Placement::Query(key) => query.push((key.to_string(), value.render())),
            Placement::Fields => {
                let requested = value.as_list().unwrap_or_default();
                let kept = filter_fields(requested, descriptor.allowed_fields);
                if kept.len() < requested.len() {
                    debug!(
                        operation = descriptor.name(),
                        dropped = requested.len() - kept.len(),
                        "Dropped unsupported detail fields"
                    );
                }
                if !kept.is_empty() {
                    query.push((FIELDS_QUERY_KEY.to_string(), kept.join(",")));
                }
            }
            Placement::JoinedQuery(key) => {
                if value.as_list().is_some_and(|items| !items.is_empty()) {
                    query.push((key.to_string(), value.render()));
                }
            }
            Placement::Watermark => watermark = value.as_integer(),
        }
    }

    Ok(RequestPlan { path, query, watermark })
}

/// Keep the requested fields the operation accepts, in request order.
pub fn filter_fields<'a>(requested: &'a [String], allowed: &[&str]) -> Vec<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|field| allowed.contains(field))
        .collect()
}

fn render_path(descriptor: &OperationDescriptor, args: &BoundArgs) -> Result<ResourcePath> {
    let template = descriptor.path_template;
    let mut path = ResourcePath::new();

    for segment in template.split('/').filter(|s| !s.is_empty()) {
        path = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let value = args.get(name).ok_or_else(|| {
                    ArmoryError::Internal(format!(
                        "{} path template references unbound parameter `{name}`",
                        descriptor.name()
                    ))
                })?;
                path.value(value.render())
            }
            None => path.literal(segment),
        };
    }

    if template.len() > 1 && template.ends_with('/') {
        path = path.with_trailing_slash();
    }

    Ok(path)
}
