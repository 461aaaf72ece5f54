//! Call-site scanning: which generated service methods does the source
//! actually use, and from where.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::lint::services::{ServiceInfo, extract_service_infos};
use crate::lint::ts;

/// A generated method plus the set of source files that call it.
#[derive(Debug, Clone)]
pub struct ServiceUsage {
    pub service_info: ServiceInfo,
    pub files: BTreeSet<PathBuf>,
}

/// service name → method name → usage. Iteration order is insertion order;
/// the report renders in this order.
pub type ServicesUsagesMap = IndexMap<String, IndexMap<String, ServiceUsage>>;

const SKIPPED_DIRS: [&str; 2] = ["node_modules", "__tests__"];

/// Build the usage index: seed every (service, method) pair from the
/// generated catalog, walk the source tree recording call sites, then prune
/// pairs nothing references. A method that exists but is never called is
/// irrelevant to coverage, not missing a handler.
pub fn find_services_usages(gen_path: &Path, src_path: &Path) -> Result<ServicesUsagesMap> {
    let services = extract_service_infos(gen_path)?;

    let mut result: ServicesUsagesMap = IndexMap::new();
    for service_info in services {
        result
            .entry(service_info.name.clone())
            .or_default()
            .insert(
                service_info.method_name.clone(),
                ServiceUsage {
                    service_info,
                    files: BTreeSet::new(),
                },
            );
    }

    for file in source_files(src_path) {
        scan_file(&file, &mut result)?;
    }

    // Drop methods nobody calls, then services with no methods left.
    for methods in result.values_mut() {
        methods.retain(|_, usage| !usage.files.is_empty());
    }
    result.retain(|_, methods| !methods.is_empty());

    Ok(result)
}

fn source_files(src_path: &Path) -> Vec<PathBuf> {
    WalkDir::new(src_path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !SKIPPED_DIRS.contains(&name))
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "ts" || ext == "tsx")
        })
        .collect()
}

/// Record every `<Ident ending in Service>.<method>(...)` call site. A file
/// that cannot be parsed aborts the whole scan; a coverage report built from
/// a partially understood tree would not be trustworthy.
fn scan_file(file: &Path, result: &mut ServicesUsagesMap) -> Result<()> {
    let (tree, source) = ts::parse_file(file)?;
    if tree.root_node().has_error() {
        return Err(Error::Parse {
            file: file.to_path_buf(),
            reason: "source contains syntax errors".to_string(),
        });
    }
    debug!(file = %file.display(), "Scanning for service usages");

    ts::visit(tree.root_node(), &mut |node| {
        if node.kind() != "call_expression" {
            return;
        }
        let Some(member) = node
            .child_by_field_name("function")
            .filter(|n| n.kind() == "member_expression")
        else {
            return;
        };
        let Some(service_name) = member
            .child_by_field_name("object")
            .filter(|n| n.kind() == "identifier")
            .map(|n| ts::node_text(n, &source))
            .filter(|name| name.ends_with("Service"))
        else {
            return;
        };
        let Some(method_name) = member
            .child_by_field_name("property")
            .filter(|n| n.kind() == "property_identifier")
            .map(|n| ts::node_text(n, &source))
        else {
            return;
        };
        if let Some(usage) = result
            .get_mut(service_name)
            .and_then(|methods| methods.get_mut(method_name))
        {
            usage.files.insert(file.to_path_buf());
        }
    });
    Ok(())
}
