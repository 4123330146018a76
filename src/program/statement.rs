//! Line classification
//!
//! Each source line is classified once, when the program is loaded, into a
//! [`Statement`]. The engine dispatches on the variant and never looks at the
//! raw text again. Block jump targets start out unresolved and are filled in
//! by [`super::blocks::resolve_blocks`].

use crate::text::strip_comment;
use regex::Regex;
use std::sync::OnceLock;

/// What a single line does when executed
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A line of the declaration region, consumed by the declaration scan
    Declaration,

    /// `name <- expression`
    Assignment { target: String, expression: String },

    /// `name(arguments)`, with `arguments` kept as raw text
    Call { name: String, arguments: String },

    /// `si <condition> alors`
    If {
        condition: String,
        else_line: Option<usize>,
        end_line: Option<usize>,
    },

    /// `sinon`; `header` is `None` for a stray marker
    Else {
        header: Option<usize>,
        end_line: Option<usize>,
    },

    /// `fsi`; `header` is `None` for a stray marker
    EndIf { header: Option<usize> },

    /// `tant que <condition> faire`
    While {
        condition: String,
        end_line: Option<usize>,
    },

    /// `ftq`; `header` is `None` for a stray marker
    EndWhile { header: Option<usize> },

    /// Blank lines, comments, `DEBUT`, `FIN` and anything unrecognized
    NoOp,
}

impl Statement {
    /// Short name of the construct, for messages and the UI.
    pub fn construct(&self) -> &'static str {
        match self {
            Statement::Declaration => "declaration",
            Statement::Assignment { .. } => "assignment",
            Statement::Call { .. } => "call",
            Statement::If { .. } => "si",
            Statement::Else { .. } => "sinon",
            Statement::EndIf { .. } => "fsi",
            Statement::While { .. } => "tant que",
            Statement::EndWhile { .. } => "ftq",
            Statement::NoOp => "no-op",
        }
    }
}

struct Patterns {
    assignment: Regex,
    call: Regex,
    if_header: Regex,
    else_marker: Regex,
    end_if: Regex,
    while_header: Regex,
    end_while: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("statement regex must compile");
        Patterns {
            assignment: compile(r"^([\p{L}_][\p{L}\p{N}_]*)\s*(?:<-|←)\s*(.+)$"),
            call: compile(r"^([\p{L}_][\p{L}\p{N}_']*)\s*\((.*)\)$"),
            if_header: compile(r"(?i)^si\b\s*(.+?)\s*\balors$"),
            else_marker: compile(r"(?i)^sinon$"),
            end_if: compile(r"(?i)^(?:fsi|fin\s*si)$"),
            while_header: compile(r"(?i)^tant\s*que\b\s*(.+?)\s*\bfaire$"),
            end_while: compile(r"(?i)^(?:ftq|fin\s*tant\s*que)$"),
        }
    })
}

/// Classify one executable line. Block targets are left unresolved.
pub fn classify(line: &str) -> Statement {
    let text = strip_comment(line).trim();
    if text.is_empty() {
        return Statement::NoOp;
    }

    let p = patterns();

    if let Some(caps) = p.assignment.captures(text) {
        return Statement::Assignment {
            target: caps[1].to_string(),
            expression: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = p.call.captures(text) {
        return Statement::Call {
            name: caps[1].to_string(),
            arguments: caps[2].trim().to_string(),
        };
    }

    if let Some(caps) = p.if_header.captures(text) {
        return Statement::If {
            condition: caps[1].to_string(),
            else_line: None,
            end_line: None,
        };
    }

    if p.else_marker.is_match(text) {
        return Statement::Else {
            header: None,
            end_line: None,
        };
    }

    if p.end_if.is_match(text) {
        return Statement::EndIf { header: None };
    }

    if let Some(caps) = p.while_header.captures(text) {
        return Statement::While {
            condition: caps[1].to_string(),
            end_line: None,
        };
    }

    if p.end_while.is_match(text) {
        return Statement::EndWhile { header: None };
    }

    Statement::NoOp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_win_over_calls() {
        assert_eq!(
            classify("  total <- f(x) // somme"),
            Statement::Assignment {
                target: "total".into(),
                expression: "f(x)".into()
            }
        );
        assert_eq!(
            classify("é ← 3"),
            Statement::Assignment {
                target: "é".into(),
                expression: "3".into()
            }
        );
    }

    #[test]
    fn calls_keep_raw_arguments() {
        assert_eq!(
            classify("Écrire(\"a, b\", x)"),
            Statement::Call {
                name: "Écrire".into(),
                arguments: "\"a, b\", x".into()
            }
        );
        assert_eq!(
            classify("lire(n)"),
            Statement::Call {
                name: "lire".into(),
                arguments: "n".into()
            }
        );
    }

    #[test]
    fn block_headers_and_markers() {
        assert!(matches!(
            classify("SI x > 5 ou y = 2 ALORS"),
            Statement::If { ref condition, .. } if condition == "x > 5 ou y = 2"
        ));
        assert!(matches!(
            classify("si (x > 5) alors"),
            Statement::If { ref condition, .. } if condition == "(x > 5)"
        ));
        assert!(matches!(
            classify("tant que i < 3 faire"),
            Statement::While { ref condition, .. } if condition == "i < 3"
        ));
        assert!(matches!(classify(" Sinon "), Statement::Else { .. }));
        assert!(matches!(classify("fin si"), Statement::EndIf { .. }));
        assert!(matches!(classify("FTQ"), Statement::EndWhile { .. }));
        assert!(matches!(classify("fin tant que"), Statement::EndWhile { .. }));
    }

    #[test]
    fn everything_else_is_a_no_op() {
        assert_eq!(classify("DEBUT"), Statement::NoOp);
        assert_eq!(classify("FIN"), Statement::NoOp);
        assert_eq!(classify(""), Statement::NoOp);
        assert_eq!(classify("// commentaire"), Statement::NoOp);
        assert_eq!(classify("sinonx"), Statement::NoOp);
        assert_eq!(classify("simple phrase"), Statement::NoOp);
    }
}
