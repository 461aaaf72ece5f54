//! Enumeration of registered MSW handlers.
//!
//! The linter needs to know which routes the project's MSW setup already
//! intercepts. Acquisition is behind the [`HandlerSource`] trait: the CLI
//! implementation shells out to a small Node probe that imports the setup
//! module and prints `listHandlers()` descriptors as JSON, while tests pass
//! a static list.

use std::path::PathBuf;
use std::process::Command;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// A route entry keyed in [`ExistingHandlersMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingHandler {
    /// Path exactly as registered (may use `:param` segments).
    pub path: String,
    pub http_method: String,
    /// Path with params normalized to `{param}` form.
    pub url: String,
}

/// `"METHOD:url"` → handler. Insertion-ordered.
pub type ExistingHandlersMap = IndexMap<String, ExistingHandler>;

/// Raw descriptor as reported by the setup's introspection API. Non-HTTP
/// handler kinds (e.g. WebSocket handlers) carry neither method nor path.
#[derive(Debug, Clone, Default)]
pub struct HandlerDescriptor {
    pub method: Option<String>,
    pub path: Option<String>,
}

/// Capability to enumerate registered intercept handlers.
pub trait HandlerSource {
    fn list_registered_routes(&self) -> Result<Vec<HandlerDescriptor>>;
}

/// Normalize descriptors into the keyed map the reporter consumes.
/// Descriptors missing a method or path are expected (non-HTTP handlers)
/// and silently skipped.
pub fn collect_existing_handlers(source: &dyn HandlerSource) -> Result<ExistingHandlersMap> {
    let mut result = ExistingHandlersMap::new();
    for descriptor in source.list_registered_routes()? {
        let (Some(method), Some(path)) = (descriptor.method, descriptor.path) else {
            continue;
        };
        let http_method = method.to_uppercase();
        let url = normalize_path_params(&path);
        let key = format!("{http_method}:{url}");
        result.insert(
            key,
            ExistingHandler {
                path,
                http_method,
                url,
            },
        );
    }
    Ok(result)
}

/// Rewrite `:param` path segments to `{param}` form, e.g.
/// `/api/users/:id` → `/api/users/{id}`.
pub fn normalize_path_params(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek().is_some_and(|&next| next != '/') {
            out.push('{');
            while let Some(&next) = chars.peek() {
                if next == '/' {
                    break;
                }
                out.push(next);
                chars.next();
            }
            out.push('}');
        } else {
            out.push(c);
        }
    }
    out
}

/// [`HandlerSource`] that loads the user's MSW setup module in a Node
/// subprocess and asks the named constant for its handlers.
#[derive(Debug, Clone)]
pub struct MswSetupProbe {
    pub setup_file: PathBuf,
    pub setup_const: String,
}

// Probe exit codes, matched by the script below.
const EXIT_MISSING_CONST: i32 = 12;
const EXIT_INVALID_CONST: i32 = 13;

impl MswSetupProbe {
    pub fn new(setup_file: PathBuf, setup_const: String) -> Self {
        Self {
            setup_file,
            setup_const,
        }
    }

    fn script(&self) -> Result<String> {
        let absolute = self
            .setup_file
            .canonicalize()
            .map_err(|err| Error::io(format!("Failed to resolve {}", self.setup_file.display()), err))?;
        // serde_json string encoding doubles as JS string escaping here.
        let file_url = serde_json::Value::String(format!("file://{}", absolute.display()));
        let const_name = serde_json::Value::String(self.setup_const.clone());
        Ok(format!(
            r"const mod = await import({file_url});
if (!Object.hasOwn(mod, {const_name})) process.exit({EXIT_MISSING_CONST});
const setup = mod[{const_name}];
if (!setup || typeof setup.listHandlers !== 'function') process.exit({EXIT_INVALID_CONST});
const routes = setup.listHandlers().map((handler) => ({{
  method: handler?.info?.method === undefined ? null : String(handler.info.method),
  path: handler?.info?.path === undefined ? null : String(handler.info.path),
}}));
console.log(JSON.stringify(routes));
"
        ))
    }

    /// TypeScript setup files need a TypeScript-capable runtime.
    fn runner(&self) -> (&'static str, Vec<&'static str>) {
        let is_typescript = self
            .setup_file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "ts" | "tsx" | "mts" | "cts"));
        if is_typescript {
            ("npx", vec!["tsx"])
        } else {
            ("node", vec![])
        }
    }
}

impl HandlerSource for MswSetupProbe {
    fn list_registered_routes(&self) -> Result<Vec<HandlerDescriptor>> {
        let probe_dir = tempfile::tempdir()
            .map_err(|err| Error::io("Failed to create probe directory".to_string(), err))?;
        let probe_path = probe_dir.path().join("msw-probe.mjs");
        std::fs::write(&probe_path, self.script()?)
            .map_err(|err| Error::io("Failed to write probe script".to_string(), err))?;

        let (program, base_args) = self.runner();
        debug!(
            setup_file = %self.setup_file.display(),
            setup_const = %self.setup_const,
            program,
            "Probing MSW setup for registered handlers"
        );
        let output = Command::new(program)
            .args(base_args)
            .arg(&probe_path)
            .output()
            .map_err(|err| {
                Error::Setup(format!(
                    "Failed to run MSW setup probe via {program}: {err}"
                ))
            })?;

        match output.status.code() {
            Some(0) => {}
            Some(EXIT_MISSING_CONST) => {
                return Err(Error::MissingSetupConstant(self.setup_const.clone()));
            }
            Some(EXIT_INVALID_CONST) => {
                return Err(Error::InvalidSetupConstant(self.setup_const.clone()));
            }
            _ => {
                return Err(Error::Setup(format!(
                    "MSW setup probe failed with status {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                )));
            }
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_probe_output(stdout: &str) -> Result<Vec<HandlerDescriptor>> {
    let value: serde_json::Value = serde_json::from_str(stdout.trim())
        .map_err(|err| Error::Setup(format!("MSW setup probe printed invalid JSON: {err}")))?;
    let entries = value
        .as_array()
        .ok_or_else(|| Error::Setup("MSW setup probe output was not a JSON array".to_string()))?;
    Ok(entries
        .iter()
        .map(|entry| HandlerDescriptor {
            method: entry
                .get("method")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            path: entry
                .get("path")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct StaticHandlerSource(Vec<HandlerDescriptor>);

    impl HandlerSource for StaticHandlerSource {
        fn list_registered_routes(&self) -> Result<Vec<HandlerDescriptor>> {
            Ok(self.0.clone())
        }
    }

    fn descriptor(method: &str, path: &str) -> HandlerDescriptor {
        HandlerDescriptor {
            method: Some(method.to_string()),
            path: Some(path.to_string()),
        }
    }

    #[test]
    fn test_normalize_path_params() {
        assert_eq!(
            normalize_path_params("/api/users/:id"),
            "/api/users/{id}"
        );
        assert_eq!(
            normalize_path_params("/api/:org/repos/:repo"),
            "/api/{org}/repos/{repo}"
        );
        assert_eq!(normalize_path_params("/api/users"), "/api/users");
        // Protocol separators are not params.
        assert_eq!(
            normalize_path_params("https://api.example.com/users/:id"),
            "https://api.example.com/users/{id}"
        );
    }

    #[test]
    fn test_handlers_are_keyed_and_method_uppercased() {
        let source = StaticHandlerSource(vec![descriptor("get", "/api/users/:id")]);
        let handlers = collect_existing_handlers(&source).unwrap();
        assert_eq!(handlers.len(), 1);
        let entry = handlers.get("GET:/api/users/{id}").unwrap();
        assert_eq!(entry.http_method, "GET");
        assert_eq!(entry.url, "/api/users/{id}");
        assert_eq!(entry.path, "/api/users/:id");
    }

    #[test]
    fn test_descriptors_without_info_are_skipped() {
        let source = StaticHandlerSource(vec![
            descriptor("GET", "/api/users"),
            // WebSocket-style handler: no method or path.
            HandlerDescriptor::default(),
            HandlerDescriptor {
                method: Some("POST".to_string()),
                path: None,
            },
        ]);
        let handlers = collect_existing_handlers(&source).unwrap();
        assert_eq!(handlers.len(), 1);
        assert!(handlers.contains_key("GET:/api/users"));
    }

    #[test]
    fn test_parse_probe_output_round_trip() {
        let parsed = parse_probe_output(
            r#"[{"method":"GET","path":"/pets"},{"method":null,"path":null}]"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].method.as_deref(), Some("GET"));
        assert_eq!(parsed[0].path.as_deref(), Some("/pets"));
        assert!(parsed[1].method.is_none());
    }

    #[test]
    fn test_parse_probe_output_rejects_garbage() {
        assert!(matches!(
            parse_probe_output("not json").unwrap_err(),
            Error::Setup(_)
        ));
        assert!(matches!(
            parse_probe_output(r#"{"not":"array"}"#).unwrap_err(),
            Error::Setup(_)
        ));
    }
}
