//! Append-only trajectory output
//!
//! The run loop hands every pre-step sample `(t, x, y)` to a
//! [`TrajectorySink`]. [`TextTrajectory`] writes them as plain text, one
//! `time position height` line per sample, ready for gnuplot.

use std::io::{self, Write};

pub trait TrajectorySink {
    fn record(&mut self, t: f64, x: f64, y: f64) -> io::Result<()>;
}

/// Whitespace separated text lines over any writer
pub struct TextTrajectory<W: Write> {
    writer: W,
}

impl<W: Write> TextTrajectory<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and hand back the writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TrajectorySink for TextTrajectory<W> {
    fn record(&mut self, t: f64, x: f64, y: f64) -> io::Result<()> {
        writeln!(self.writer, "{t} {x} {y}")
    }
}

/// In-memory samples, handy for inspecting a run
impl TrajectorySink for Vec<(f64, f64, f64)> {
    fn record(&mut self, t: f64, x: f64, y: f64) -> io::Result<()> {
        self.push((t, x, y));
        Ok(())
    }
}
