//! Declaration scan
//!
//! Runs once over the lines before the `DEBUT` marker. Two shapes declare
//! something:
//!
//! ```text
//! nom, prenom : chaine     // variables, initialised to the type default
//! MAX <- 10                // constant, type inferred from the literal
//! ```
//!
//! Blank lines, comments and section headers (`algorithme ...`, `variables`,
//! `constantes`, `lexique`) are skipped. Anything else is reported and
//! skipped; the scan never stops early.

use crate::text::{fold_accents, strip_comment};
use crate::variables::store::StoreError;
use crate::variables::value::{Value, VarType};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    #[error("line {}: malformed declaration '{text}'", .line + 1)]
    MalformedDeclaration { line: usize, text: String },

    #[error("line {}: '{name}' is already declared", .line + 1)]
    DuplicateDeclaration { line: usize, name: String },

    #[error("line {}: {source}", .line + 1)]
    Rejected {
        line: usize,
        #[source]
        source: StoreError,
    },
}

impl ScanError {
    pub fn line(&self) -> usize {
        match self {
            ScanError::MalformedDeclaration { line, .. }
            | ScanError::DuplicateDeclaration { line, .. }
            | ScanError::Rejected { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationKind {
    Variable,
    Constant { literal: String, value: Value },
}

/// One declared name
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub line: usize,
    pub name: String,
    pub var_type: VarType,
    pub kind: DeclarationKind,
}

/// Result of the declaration scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationScan {
    pub declarations: Vec<Declaration>,
    pub errors: Vec<ScanError>,
    /// Index of the `DEBUT` line, `None` when the program has none
    pub begin_line: Option<usize>,
}

struct Patterns {
    variables: Regex,
    constant: Regex,
    section: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("declaration regex must compile");
        Patterns {
            variables: compile(
                r"^([\p{L}_][\p{L}\p{N}_]*(?:\s*,\s*[\p{L}_][\p{L}\p{N}_]*)*)\s*:\s*(\S.*)$",
            ),
            constant: compile(r"^([\p{L}_][\p{L}\p{N}_]*)\s*(?:<-|←)\s*(.+)$"),
            section: compile(r"^(?:algorithme\b.*|variables?|constantes?|lexique)\s*:?$"),
        }
    })
}

/// Whether a line is the `DEBUT` marker that ends the declaration region.
pub fn is_begin_marker(line: &str) -> bool {
    fold_accents(strip_comment(line).trim()) == "debut"
}

/// Scan the declaration region of `lines`.
pub fn scan_declarations<S: AsRef<str>>(lines: &[S]) -> DeclarationScan {
    let mut scan = DeclarationScan {
        begin_line: lines.iter().position(|l| is_begin_marker(l.as_ref())),
        ..DeclarationScan::default()
    };

    let Some(begin) = scan.begin_line else {
        log::warn!("no DEBUT marker found, nothing is declared");
        return scan;
    };

    let mut seen = FxHashSet::default();
    for (index, raw) in lines[..begin].iter().enumerate() {
        for entry in scan_line(index, raw.as_ref()) {
            match entry {
                Ok(decl) if !seen.insert(decl.name.clone()) => {
                    scan.errors.push(ScanError::DuplicateDeclaration {
                        line: index,
                        name: decl.name,
                    });
                }
                Ok(decl) => scan.declarations.push(decl),
                Err(err) => scan.errors.push(err),
            }
        }
    }

    for err in &scan.errors {
        log::warn!("{}", err);
    }
    scan
}

fn scan_line(index: usize, raw: &str) -> Vec<Result<Declaration, ScanError>> {
    let text = strip_comment(raw).trim();
    let p = patterns();

    if text.is_empty() || p.section.is_match(&fold_accents(text)) {
        return Vec::new();
    }

    let malformed = || {
        vec![Err(ScanError::MalformedDeclaration {
            line: index,
            text: text.to_string(),
        })]
    };

    if let Some(caps) = p.variables.captures(text) {
        let Some(var_type) = VarType::from_name(caps[2].trim()) else {
            return malformed();
        };
        return caps[1]
            .split(',')
            .map(|name| {
                Ok(Declaration {
                    line: index,
                    name: name.trim().to_string(),
                    var_type,
                    kind: DeclarationKind::Variable,
                })
            })
            .collect();
    }

    if let Some(caps) = p.constant.captures(text) {
        let literal = caps[2].trim();
        let Some((var_type, value)) = VarType::infer_literal(literal) else {
            return malformed();
        };
        return vec![Ok(Declaration {
            line: index,
            name: caps[1].to_string(),
            var_type,
            kind: DeclarationKind::Constant {
                literal: literal.to_string(),
                value,
            },
        })];
    }

    malformed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(scan: &DeclarationScan) -> Vec<&str> {
        scan.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn variables_and_constants() {
        let scan = scan_declarations(&[
            "Algorithme Exemple",
            "Constantes",
            "  MAX <- 10",
            "  NOM <- \"Ada\"",
            "  TAUX <- 2,5",
            "  OK <- vrai",
            "Variables :",
            "  a, b : entier // compteurs",
            "  c : caractère",
            "",
            "DEBUT",
            "x : entier",
        ]);

        assert_eq!(scan.begin_line, Some(10));
        assert!(scan.errors.is_empty(), "{:?}", scan.errors);
        assert_eq!(names(&scan), vec!["MAX", "NOM", "TAUX", "OK", "a", "b", "c"]);

        let types: Vec<VarType> = scan.declarations.iter().map(|d| d.var_type).collect();
        assert_eq!(
            types,
            vec![
                VarType::Integer,
                VarType::String,
                VarType::Real,
                VarType::Boolean,
                VarType::Integer,
                VarType::Integer,
                VarType::Character
            ]
        );
        assert_eq!(
            scan.declarations[2].kind,
            DeclarationKind::Constant {
                literal: "2,5".into(),
                value: Value::Real(2.5)
            }
        );
    }

    #[test]
    fn malformed_and_duplicate_lines_are_reported_and_skipped() {
        let scan = scan_declarations(&[
            "n : entier",
            "ceci n'est pas une déclaration",
            "m : inconnu",
            "n : reel",
            "k : reel",
            "debut",
        ]);

        assert_eq!(names(&scan), vec!["n", "k"]);
        assert_eq!(scan.errors.len(), 3);
        assert!(matches!(scan.errors[0], ScanError::MalformedDeclaration { line: 1, .. }));
        assert!(matches!(scan.errors[1], ScanError::MalformedDeclaration { line: 2, .. }));
        assert_eq!(
            scan.errors[2],
            ScanError::DuplicateDeclaration {
                line: 3,
                name: "n".into()
            }
        );
    }

    #[test]
    fn missing_begin_marker_declares_nothing() {
        let scan = scan_declarations(&["n : entier", "n <- 3"]);
        assert_eq!(scan.begin_line, None);
        assert!(scan.declarations.is_empty());
        assert!(scan.errors.is_empty());
    }

    #[test]
    fn begin_marker_spellings() {
        assert!(is_begin_marker("DEBUT"));
        assert!(is_begin_marker("  Début  // go"));
        assert!(!is_begin_marker("debut x"));
    }
}
