//! Progress output for ISO builds
//!
//! Every line the orchestrator reports goes through an [`OutputManager`]. On a terminal the
//! lines are colored; any other `Write` sink receives plain text, one line per message.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

enum Sink {
    Terminal(BufferWriter),
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

/// Output manager for build progress lines
pub struct OutputManager {
    sink: Sink,
    verbose: bool,
    quiet: bool,
}

impl fmt::Debug for OutputManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Terminal(_) => "terminal",
            Sink::Writer(_) => "writer",
        };
        f.debug_struct("OutputManager")
            .field("sink", &sink)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish()
    }
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        let sink = match &self.sink {
            Sink::Terminal(_) => Sink::Terminal(BufferWriter::stdout(ColorChoice::Auto)),
            Sink::Writer(writer) => Sink::Writer(Arc::clone(writer)),
        };
        Self {
            sink,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

impl OutputManager {
    /// Create an output manager printing to stdout
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            sink: Sink::Terminal(BufferWriter::stdout(ColorChoice::Auto)),
            verbose,
            quiet,
        }
    }

    /// Create an output manager appending plain lines to `writer`
    pub fn with_writer<W>(writer: W, verbose: bool) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            sink: Sink::Writer(Arc::new(Mutex::new(Box::new(writer)))),
            verbose,
            quiet: false,
        }
    }

    /// Create an output manager over an in-memory buffer.
    ///
    /// The returned [`CapturedOutput`] shares the buffer and can be read at any time.
    pub fn captured(verbose: bool) -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::with_writer(captured.clone(), verbose), captured)
    }

    /// Print an info message (normal output)
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit("ℹ", Some(ColorSpec::new().set_fg(Some(Color::Cyan)).clone()), message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit(
            "✓",
            Some(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true).clone()),
            message,
        );
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit(
            "⚠",
            Some(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true).clone()),
            message,
        );
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        match &self.sink {
            Sink::Terminal(_) => {
                let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
                let mut buffer = bufwtr.buffer();

                if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
                    || write!(&mut buffer, "✗").is_err()
                    || buffer.reset().is_err()
                    || writeln!(&mut buffer, " {}", message).is_err()
                    || bufwtr.print(&buffer).is_err()
                {
                    // Stderr failed - fallback to stdout as last resort
                    println!("[STDERR ERROR] ✗ {}", message);
                }
            }
            Sink::Writer(_) => self.emit("✗", None, message),
        }
    }

    /// Print a verbose/debug message (only in verbose mode)
    pub fn verbose(&self, message: &str) {
        if !self.verbose || self.quiet {
            return;
        }
        self.emit("→", Some(ColorSpec::new().set_fg(Some(Color::Blue)).clone()), message);
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit("⋯", Some(ColorSpec::new().set_fg(Some(Color::Magenta)).clone()), message);
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write_line(&format!("    {}", message));
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.write_line(message);
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn emit(&self, symbol: &str, color: Option<ColorSpec>, message: &str) {
        let result = match &self.sink {
            Sink::Terminal(bufwtr) => {
                let mut buffer = bufwtr.buffer();
                if let Some(spec) = &color {
                    let _ = buffer.set_color(spec);
                }
                let _ = write!(&mut buffer, "{}", symbol);
                let _ = buffer.reset();
                let _ = writeln!(&mut buffer, " {}", message);
                bufwtr.print(&buffer)
            }
            Sink::Writer(writer) => Self::append(writer, &format!("{} {}", symbol, message)),
        };
        if let Err(e) = result {
            log::warn!("Failed to write output line: {}", e);
        }
    }

    fn write_line(&self, line: &str) {
        let result = match &self.sink {
            Sink::Terminal(bufwtr) => {
                let mut buffer = bufwtr.buffer();
                let _ = writeln!(&mut buffer, "{}", line);
                bufwtr.print(&buffer)
            }
            Sink::Writer(writer) => Self::append(writer, line),
        };
        if let Err(e) = result {
            log::warn!("Failed to write output line: {}", e);
        }
    }

    fn append(writer: &Mutex<Box<dyn Write + Send>>, line: &str) -> io::Result<()> {
        let mut writer = writer
            .lock()
            .map_err(|_| io::Error::other("output sink lock poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()
    }
}

/// In-memory sink shared between an [`OutputManager`] and its reader
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    /// Everything written so far
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Written lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::other("captured output lock poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
