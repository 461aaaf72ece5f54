//! Extraction of request targets from generated service modules.
//!
//! Generated services expose one `public static` method per API operation,
//! each returning a call to the internal `__request` dispatch function with
//! an inline options object carrying literal `url` and `method` fields.
//! Those two literals are all the coverage linter needs.

use std::path::{Path, PathBuf};

use tracing::warn;
use tree_sitter::Node;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::lint::ts;

/// One statically discovered generated client method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// File the method was found in.
    pub path: PathBuf,
    /// Generated class name; by convention ends in `Service`.
    pub name: String,
    pub method_name: String,
    /// Upper-cased HTTP method.
    pub to_handle_http_method: String,
    /// URL template in `{param}` placeholder form.
    pub to_handle_url: String,
}

/// Parse every `*Service.ts` under `<gen>/services` and collect the request
/// target of each `public static` method.
pub fn extract_service_infos(gen_path: &Path) -> Result<Vec<ServiceInfo>> {
    let services_dir = gen_path.join("services");
    if !services_dir.is_dir() {
        return Err(Error::NotFound(format!(
            "Services directory not found: {}",
            services_dir.display()
        )));
    }

    let mut result = Vec::new();
    for entry in WalkDir::new(&services_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != "node_modules")
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if !file_name.ends_with("Service.ts") {
            continue;
        }
        extract_from_file(entry.path(), &mut result)?;
    }
    Ok(result)
}

fn extract_from_file(path: &Path, out: &mut Vec<ServiceInfo>) -> Result<()> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    let (tree, source) = ts::parse_file(path)?;

    ts::visit(tree.root_node(), &mut |node| {
        if node.kind() != "class_declaration" {
            return;
        }
        let class_name = node
            .child_by_field_name("name")
            .map(|n| ts::node_text(n, &source));
        if class_name != Some(name.as_str()) {
            return;
        }
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "method_definition" || !is_public_static(member, &source) {
                continue;
            }
            let Some(method_name) = member
                .child_by_field_name("name")
                .filter(|n| n.kind() == "property_identifier")
                .map(|n| ts::node_text(n, &source).to_string())
            else {
                continue;
            };
            let (url, http_method) = match member.child_by_field_name("body") {
                Some(method_body) => find_request_info(method_body, &source),
                None => (None, None),
            };
            match (url, http_method) {
                (Some(to_handle_url), Some(to_handle_http_method)) => out.push(ServiceInfo {
                    path: path.to_path_buf(),
                    name: name.clone(),
                    method_name,
                    to_handle_http_method,
                    to_handle_url,
                }),
                (url, http_method) => {
                    // Generated code occasionally contains helper methods
                    // that never issue a request; skip them with a warning.
                    if url.is_none() {
                        warn!(
                            "No URL found for {method_name} request in service {name} ({})",
                            path.display()
                        );
                    }
                    if http_method.is_none() {
                        warn!(
                            "No HTTP method found for {method_name} request in service {name} ({})",
                            path.display()
                        );
                    }
                }
            }
        }
    });
    Ok(())
}

fn is_public_static(node: Node<'_>, source: &str) -> bool {
    let mut is_public = false;
    let mut is_static = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "accessibility_modifier" => {
                if ts::node_text(child, source) == "public" {
                    is_public = true;
                }
            }
            "static" => is_static = true,
            _ => {}
        }
    }
    is_public && is_static
}

/// Find a (possibly nested) `return __request(_, { method, url, ... })` and
/// pull the literal `url` and `method` fields out of the options object.
fn find_request_info(body: Node<'_>, source: &str) -> (Option<String>, Option<String>) {
    let mut url = None;
    let mut http_method = None;
    ts::visit(body, &mut |node| {
        if node.kind() != "return_statement" {
            return;
        }
        let Some(call) = node.named_child(0).filter(|n| n.kind() == "call_expression") else {
            return;
        };
        let callee = call
            .child_by_field_name("function")
            .filter(|n| n.kind() == "identifier")
            .map(|n| ts::node_text(n, source));
        if callee != Some("__request") {
            return;
        }
        let Some(options) = call
            .child_by_field_name("arguments")
            .and_then(|args| args.named_child(1))
            .filter(|n| n.kind() == "object")
        else {
            return;
        };
        let mut cursor = options.walk();
        for property in options.named_children(&mut cursor) {
            if property.kind() != "pair" {
                continue;
            }
            let key = property
                .child_by_field_name("key")
                .filter(|n| n.kind() == "property_identifier")
                .map(|n| ts::node_text(n, source));
            let Some(value) = property.child_by_field_name("value") else {
                continue;
            };
            // Keep the first literal found; a later non-literal (or second)
            // return in the same method must not clobber it.
            match key {
                Some("url") if url.is_none() => {
                    url = ts::string_literal_value(value, source);
                }
                Some("method") if http_method.is_none() => {
                    http_method =
                        ts::string_literal_value(value, source).map(|m| m.to_uppercase());
                }
                _ => {}
            }
        }
    });
    (url, http_method)
}
