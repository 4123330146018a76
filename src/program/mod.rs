//! Program model
//!
//! A loaded program is immutable for the whole run:
//! - [`declarations`]: the one-time scan of the region before `DEBUT`
//! - [`statement`]: one classified [`Statement`] per line
//! - [`blocks`]: jump targets for `si`/`sinon`/`fsi` and `tant que`/`ftq`
//!
//! Lines are 0-indexed. A cursor equal to [`Program::len`] means the run is
//! finished.

pub mod blocks;
pub mod declarations;
pub mod statement;

pub use declarations::{Declaration, DeclarationKind, DeclarationScan, ScanError};
pub use statement::Statement;

use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    lines: Vec<String>,
    statements: Vec<Statement>,
    scan: DeclarationScan,
}

impl Program {
    pub fn from_source(source: &str) -> Self {
        Self::from_lines(source.lines())
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|l| Into::<String>::into(l).trim_end_matches('\r').to_string())
            .collect();

        let scan = declarations::scan_declarations(&lines);
        let declaration_region = scan.begin_line.unwrap_or(0);

        let mut statements: Vec<Statement> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                if index < declaration_region {
                    Statement::Declaration
                } else {
                    statement::classify(line)
                }
            })
            .collect();
        blocks::resolve_blocks(&mut statements);

        log::debug!(
            "loaded {} lines, {} declarations, {} scan errors",
            lines.len(),
            scan.declarations.len(),
            scan.errors.len()
        );

        Program {
            lines,
            statements,
            scan,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(&source))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn declarations(&self) -> &DeclarationScan {
        &self.scan
    }

    pub fn begin_line(&self) -> Option<usize> {
        self.scan.begin_line
    }

    /// Range of at most `2 * radius` line indices around `current`, shifted
    /// so that it stays inside the program.
    pub fn visible_window(&self, current: usize, radius: usize) -> Range<usize> {
        let span = radius.saturating_mul(2).min(self.len());
        let start = current.saturating_sub(radius).min(self.len() - span);
        start..start + span
    }
}
