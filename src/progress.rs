use std::io::{self, Write};
use std::sync::LazyLock;

use indicatif::{MultiProgress, ProgressBar};

/// Every progress bar the process draws is registered here, so log output can
/// clear the bars before writing and redraw them afterwards.
pub static BARS: LazyLock<MultiProgress> = LazyLock::new(MultiProgress::new);

/// Register `pb` with the shared set.
pub fn attach(pb: ProgressBar) -> ProgressBar {
    BARS.add(pb)
}

/// Stdout writer for the tracing subscriber that suspends drawing while a
/// log line goes out.
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        BARS.suspend(|| io::stdout().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        BARS.suspend(|| io::stdout().lock().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ── Tests ──
