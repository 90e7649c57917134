//! Line-oriented search over a file's content.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};

use crate::fs_op::error::{FileError, Result};
use crate::fs_op::stat;

/// What to look for in each line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    pattern: String,
    literal: bool,
    case_insensitive: bool,
}

impl SearchPattern {
    /// Match lines containing `text` verbatim.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            pattern: text.into(),
            literal: true,
            case_insensitive: false,
        }
    }

    /// Match lines where the regular expression `re` finds a match.
    pub fn regex(re: impl Into<String>) -> Self {
        Self {
            pattern: re.into(),
            literal: false,
            case_insensitive: false,
        }
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    fn compile(&self) -> Result<Regex> {
        let source = if self.literal {
            regex::escape(&self.pattern)
        } else {
            self.pattern.clone()
        };
        Ok(RegexBuilder::new(&source)
            .case_insensitive(self.case_insensitive)
            .build()?)
    }
}

impl From<&str> for SearchPattern {
    fn from(s: &str) -> Self {
        SearchPattern::literal(s)
    }
}

/// Lazy iterator over the matching lines of one file.
///
/// Lines are yielded without their terminator. Invalid UTF-8 is replaced
/// lossily rather than aborting the scan. The file is read in a single pass;
/// call [`grep`] again to restart.
pub struct GrepLines {
    path: PathBuf,
    reader: BufReader<File>,
    matcher: Regex,
    buf: Vec<u8>,
    done: bool,
}

impl Iterator for GrepLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let line = trim_line_end(&self.buf);
                    let text = String::from_utf8_lossy(line);
                    if self.matcher.is_match(&text) {
                        return Some(Ok(text.into_owned()));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(FileError::from_io(e, &self.path)));
                }
            }
        }
        None
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn open_reader(p: &Path) -> Result<BufReader<File>> {
    stat::require_file(p)?;
    let file = File::open(p).map_err(|e| FileError::from_io(e, p))?;
    Ok(BufReader::new(file))
}

/// Start a search of the file at `path`.
///
/// The pattern is compiled and the file opened up front so that a bad
/// pattern or a missing file is reported before any line is produced.
pub fn grep<P: AsRef<Path>>(path: P, pattern: &SearchPattern) -> Result<GrepLines> {
    let p = path.as_ref();
    let matcher = pattern.compile()?;
    let reader = open_reader(p)?;
    Ok(GrepLines {
        path: p.to_path_buf(),
        reader,
        matcher,
        buf: Vec::new(),
        done: false,
    })
}

/// Number of lines in the file. A final line without a newline counts.
pub fn line_count<P: AsRef<Path>>(path: P) -> Result<usize> {
    let p = path.as_ref();
    let mut reader = open_reader(p)?;
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => count += 1,
            Err(e) => return Err(FileError::from_io(e, p)),
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn collect(path: &Path, pattern: SearchPattern) -> Vec<String> {
        grep(path, &pattern)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn literal_substring() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("notes.txt");
        fs::write(&p, "hello\nworld\n").unwrap();
        assert_eq!(collect(&p, "wor".into()), vec!["world"]);
        assert_eq!(collect(&p, "o".into()), vec!["hello", "world"]);
        assert!(collect(&p, "zzz".into()).is_empty());
    }

    #[test]
    fn literal_escapes_regex_metacharacters() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("m.txt");
        fs::write(&p, "a.c\nabc\n").unwrap();
        assert_eq!(collect(&p, SearchPattern::literal("a.c")), vec!["a.c"]);
        assert_eq!(collect(&p, SearchPattern::regex("a.c")), vec!["a.c", "abc"]);
    }

    #[test]
    fn case_insensitive_flag() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("c.txt");
        fs::write(&p, "Error: one\nerror: two\nok\n").unwrap();
        assert_eq!(collect(&p, SearchPattern::literal("error")), vec!["error: two"]);
        assert_eq!(
            collect(&p, SearchPattern::literal("error").case_insensitive(true)),
            vec!["Error: one", "error: two"]
        );
    }

    #[test]
    fn crlf_and_unterminated_last_line() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("w.txt");
        fs::write(&p, "one\r\ntwo\r\nthree").unwrap();
        assert_eq!(collect(&p, SearchPattern::regex("^t")), vec!["two", "three"]);
    }

    #[test]
    fn invalid_regex_and_missing_file() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("x.txt");
        fs::write(&p, "x\n").unwrap();
        assert!(matches!(grep(&p, &SearchPattern::regex("(")), Err(FileError::Pattern(_))));
        let missing = tmp.path().join("missing.txt");
        assert!(matches!(grep(&missing, &"x".into()), Err(FileError::NotFound(_))));
    }

    #[test]
    fn counts_lines() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("l.txt");
        fs::write(&p, "").unwrap();
        assert_eq!(line_count(&p).unwrap(), 0);
        fs::write(&p, "a\nb\n").unwrap();
        assert_eq!(line_count(&p).unwrap(), 2);
        fs::write(&p, "a\nb").unwrap();
        assert_eq!(line_count(&p).unwrap(), 2);
    }
}
