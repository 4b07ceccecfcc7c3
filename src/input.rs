//! Input line extraction.
//!
//! Lines come from named files in argument order, or stdin when none are
//! given. Empty lines are dropped; every other line (whitespace included)
//! becomes one unit.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::rerank::Unit;

/// Conventional name for stdin in the source list.
pub const STDIN_SOURCE: &str = "-";

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read all lines from `reader`, stripping the line terminator only.
pub fn read_lines(reader: impl BufRead) -> io::Result<Vec<String>> {
    reader.lines().collect()
}

/// Concatenate lines from every source in order; an empty list means stdin.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<String>, InputError> {
    if paths.is_empty() {
        return read_stdin();
    }

    let mut lines = Vec::new();
    for path in paths {
        if path.as_os_str() == STDIN_SOURCE {
            lines.extend(read_stdin()?);
        } else {
            lines.extend(read_file(path)?);
        }
    }
    Ok(lines)
}

fn read_file(path: &Path) -> Result<Vec<String>, InputError> {
    let io_err = |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    read_lines(BufReader::new(file)).map_err(io_err)
}

fn read_stdin() -> Result<Vec<String>, InputError> {
    read_lines(io::stdin().lock()).map_err(|source| InputError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    })
}

/// Build units from retained lines, numbering them in retention order.
pub fn units_from_lines<I, S>(lines: I) -> Vec<Unit>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .map(Into::<String>::into)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(id, content)| Unit::new(id.to_string(), content))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    #[test]
    fn blank_lines_are_dropped_and_ids_follow_retention() {
        let units = units_from_lines(["a", "", "b"]);
        assert_eq!(units.len(), 2);
        assert_eq!((units[0].id(), units[0].content()), ("0", "a"));
        assert_eq!((units[1].id(), units[1].content()), ("1", "b"));
    }

    #[test]
    fn whitespace_only_lines_are_kept() {
        let units = units_from_lines(["  ", "x "]);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].content(), "  ");
        assert_eq!(units[1].content(), "x ");
    }

    #[test]
    fn read_lines_strips_terminators_only() {
        let lines = read_lines(Cursor::new("one\r\n\n  two  \nthree")).unwrap();
        assert_eq!(lines, vec!["one", "", "  two  ", "three"]);
    }

    #[test]
    fn sources_are_concatenated_in_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        writeln!(File::create(&first).unwrap(), "b\n\na").unwrap();
        writeln!(File::create(&second).unwrap(), "c").unwrap();

        let lines = load_sources(&[second.clone(), first.clone()]).unwrap();
        assert_eq!(lines, vec!["c", "b", "", "a"]);
        let units = units_from_lines(lines);
        let ids: Vec<&str> = units.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_sources(&[PathBuf::from("/definitely/not/here.txt")]).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
