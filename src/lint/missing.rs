//! Cross-reference usages against registered handlers.

use std::path::{Path, PathBuf};

use crate::lint::handlers::ExistingHandlersMap;
use crate::lint::services::ServiceInfo;
use crate::lint::usages::ServicesUsagesMap;

/// One (service, method) pair that is called from source but has no
/// registered handler.
#[derive(Debug, Clone)]
pub struct MissingHandler {
    pub service: ServiceInfo,
    /// Files referencing the method.
    pub used_in: Vec<String>,
    /// Where a handler for this route conventionally lives.
    pub suggested_path: PathBuf,
}

/// Pure membership check. A usage is covered when either the exact
/// `"METHOD:url"` key or the wildcard-prefixed `"METHOD:*url"` variant is
/// registered; MSW registrations routinely carry an origin prefix, which the
/// wildcard form captures.
pub fn missing_handlers(
    services_usages: &ServicesUsagesMap,
    existing_handlers: &ExistingHandlersMap,
    suggest_base_path: &Path,
) -> Vec<MissingHandler> {
    let mut result = Vec::new();
    for (service_name, methods) in services_usages {
        for (method_name, usage) in methods {
            let http_method = &usage.service_info.to_handle_http_method;
            let url = &usage.service_info.to_handle_url;
            let exact = format!("{http_method}:{url}");
            let wildcard = format!("{http_method}:*{url}");
            if existing_handlers.contains_key(&exact) || existing_handlers.contains_key(&wildcard)
            {
                continue;
            }
            result.push(MissingHandler {
                service: usage.service_info.clone(),
                used_in: usage
                    .files
                    .iter()
                    .map(|file| file.display().to_string())
                    .collect(),
                suggested_path: suggest_base_path
                    .join("handlers")
                    .join("services")
                    .join(service_name)
                    .join(format!("{method_name}.ts")),
            });
        }
    }
    result
}
