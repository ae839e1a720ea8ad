use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::PathBuf,
    sync::Arc,
};

use crate::{Error, Result};

/// Where the lines to count come from.
#[derive(Debug, Clone)]
pub struct Corpus {
    source: Source,
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Memory(Arc<str>),
}

impl Corpus {
    /// Opens a corpus file. A missing or non-regular file is rejected here rather than on first read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let meta = fs::metadata(&path).map_err(|e| Error::unreadable(&path, e))?;
        if !meta.is_file() {
            let e = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
            return Err(Error::unreadable(path, e));
        }
        Ok(Self {
            source: Source::File(path),
        })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: Source::Memory(Arc::from(text.into())),
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        Self::from_text(text)
    }

    /// Human readable name used in logs and reports.
    pub fn name(&self) -> String {
        match &self.source {
            Source::File(path) => path.display().to_string(),
            Source::Memory(_) => "<memory>".to_string(),
        }
    }

    /// A fresh lazy pass over the lines. Every call starts from the first line.
    pub fn lines(&self) -> Result<Lines> {
        let inner = match &self.source {
            Source::File(path) => {
                let file = File::open(path).map_err(|e| Error::unreadable(path, e))?;
                Inner::File {
                    path: path.clone(),
                    lines: BufReader::new(file).lines(),
                }
            }
            Source::Memory(text) => Inner::Memory {
                text: Arc::clone(text),
                pos: 0,
            },
        };
        Ok(Lines { inner })
    }

    pub fn read_lines(&self) -> Result<Vec<String>> {
        self.lines()?.collect()
    }
}

/// Lazy line sequence produced by [`Corpus::lines`].
pub struct Lines {
    inner: Inner,
}

enum Inner {
    File {
        path: PathBuf,
        lines: io::Lines<BufReader<File>>,
    },
    Memory {
        text: Arc<str>,
        pos: usize,
    },
}

impl Iterator for Lines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::File { path, lines } => {
                let line = lines.next()?;
                Some(line.map_err(|e| Error::unreadable(path.as_path(), e)))
            }
            Inner::Memory { text, pos } => {
                if *pos >= text.len() {
                    return None;
                }
                let rest = &text[*pos..];
                let (line, advance) = match rest.find('\n') {
                    Some(end) => (&rest[..end], end + 1),
                    None => (rest, rest.len()),
                };
                *pos += advance;
                Some(Ok(line.strip_suffix('\r').unwrap_or(line).to_owned()))
            }
        }
    }
}
