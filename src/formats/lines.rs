use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::Point;

/// Line cursor over one text input file, keeping the path for error messages
pub(crate) struct Lines {
    path: PathBuf,
    lines: Vec<String>,
    pos: usize,
}

impl Lines {
    pub fn open(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_contents(path, &contents))
    }

    fn from_contents(path: &Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: contents.lines().map(str::to_string).collect(),
            pos: 0,
        }
    }

    /// 1-based number of the line `next_line` returns next
    pub fn line_no(&self) -> usize {
        self.pos + 1
    }

    pub fn next_line(&mut self) -> Result<String> {
        let line = self
            .lines
            .get(self.pos)
            .map(|l| l.trim().to_string())
            .ok_or_else(|| anyhow!("{}: unexpected end of file", self.path.display()))?;
        self.pos += 1;
        Ok(line)
    }

    /// Next non-blank line, or `None` at end of file
    pub fn next_non_blank(&mut self) -> Option<String> {
        while let Some(line) = self.lines.get(self.pos) {
            self.pos += 1;
            if !line.trim().is_empty() {
                return Some(line.trim().to_string());
            }
        }
        None
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.next_line()?;
        }
        Ok(())
    }

    /// Value after the `:` separator, e.g. `Name : demo`
    pub fn labeled_value(&mut self) -> Result<String> {
        let line_no = self.line_no();
        let line = self.next_line()?;
        line.split_once(':')
            .map(|(_, v)| v.trim().to_string())
            .ok_or_else(|| self.error(line_no, "expected '<label> : <value>'"))
    }

    pub fn last_token<T: FromStr>(&mut self) -> Result<T> {
        let line_no = self.line_no();
        let line = self.next_line()?;
        self.parse_last_token(&line, line_no)
    }

    pub fn parse_last_token<T: FromStr>(&self, line: &str, line_no: usize) -> Result<T> {
        line.split_whitespace()
            .last()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| self.error(line_no, format!("cannot read number from '{}'", line)))
    }

    /// `count` lines of whitespace-separated `x y`
    pub fn points(&mut self, count: usize) -> Result<Vec<Point>> {
        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            let line_no = self.line_no();
            let line = self.next_line()?;
            let mut coords = line.split_whitespace().map(str::parse::<f64>);
            match (coords.next(), coords.next()) {
                (Some(Ok(x)), Some(Ok(y))) => points.push(Point::new(x, y)),
                _ => return Err(self.error(line_no, format!("expected 'x y', found '{}'", line))),
            }
        }
        Ok(points)
    }

    pub fn error(&self, line_no: usize, message: impl std::fmt::Display) -> anyhow::Error {
        anyhow!("{}:{}: {}", self.path.display(), line_no, message)
    }
}
