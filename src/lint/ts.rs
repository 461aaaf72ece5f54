//! Thin helpers over the tree-sitter TypeScript front end.

use std::fs;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Error, Result};

fn language_for(path: &Path) -> Language {
    let is_tsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "tsx");
    if is_tsx {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    } else {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }
}

/// Parse a TypeScript/TSX file, returning the tree and the source text the
/// tree's byte ranges index into.
pub fn parse_file(path: &Path) -> Result<(Tree, String)> {
    let source = fs::read_to_string(path)
        .map_err(|err| Error::io(format!("Failed to read {}", path.display()), err))?;
    let tree = parse_source(&source, path)?;
    Ok((tree, source))
}

pub fn parse_source(source: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language_for(path))
        .map_err(|err| Error::Parse {
            file: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    parser.parse(source, None).ok_or_else(|| Error::Parse {
        file: path.to_path_buf(),
        reason: "parser produced no syntax tree".to_string(),
    })
}

/// Source text spanned by a node.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Literal value of a string node, `None` for any other expression kind.
/// Only plain literals are recognized; template strings and identifiers are
/// dynamic and intentionally rejected.
pub fn string_literal_value(node: Node<'_>, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut value = String::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "string_fragment" | "escape_sequence" => value.push_str(node_text(child, source)),
            _ => {}
        }
    }
    Some(value)
}

/// Depth-first walk over all named nodes, root included.
pub fn visit(node: Node<'_>, f: &mut dyn FnMut(Node<'_>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, f);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_source_and_find_string_literal() {
        let source = "const url = '/pet/{petId}';";
        let tree = parse_source(source, &PathBuf::from("sample.ts")).unwrap();
        let mut found = None;
        visit(tree.root_node(), &mut |node| {
            if node.kind() == "string" {
                found = string_literal_value(node, source);
            }
        });
        assert_eq!(found.as_deref(), Some("/pet/{petId}"));
    }

    #[test]
    fn test_tsx_parses_jsx_syntax() {
        let source = "export const App = () => <div onClick={() => PetService.addPet()} />;";
        let tree = parse_source(source, &PathBuf::from("App.tsx")).unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_template_string_is_not_a_literal() {
        let source = "const url = `/pet/${id}`;";
        let tree = parse_source(source, &PathBuf::from("sample.ts")).unwrap();
        let mut saw_literal = false;
        visit(tree.root_node(), &mut |node| {
            if string_literal_value(node, source).is_some() {
                saw_literal = true;
            }
        });
        assert!(!saw_literal);
    }
}
