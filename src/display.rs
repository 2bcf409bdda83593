// src/display.rs

//! Terminal output: frame presentation and terminal state management.
//!
//! `ConsolePresenter` turns a finished framebuffer into text. Each frame
//! starts with an ANSI cursor-home so successive frames overwrite in place
//! instead of scrolling, then emits the glyph grid row-major, optionally
//! wrapped in a one-character border. The presenter is generic over any
//! `Write` sink so tests can capture frames in a buffer.
//!
//! `TerminalGuard` is the RAII half: it hides the cursor and saves the
//! terminal attributes on install, and restores both when dropped, so the
//! shell gets its terminal back even when a frame write fails mid-run.

use std::io::{self, Write};
use std::mem;
use std::os::unix::io::RawFd;

use anyhow::{Context, Result};
use bitflags::bitflags;
use libc::{STDIN_FILENO, TIOCGWINSZ, winsize};
use log::{debug, info, warn};
use termios::{TCSANOW, Termios, tcsetattr};

use crate::framebuffer::FrameBuffer;

const CURSOR_HOME: &str = "\x1b[H";
const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";

bitflags! {
    /// How a frame is framed and positioned on the terminal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameStyle: u8 {
        /// Wrap the grid in a `/-\` `|` border.
        const BORDER      = 1 << 0;
        /// Emit the ANSI cursor-home sequence before each frame.
        const CURSOR_HOME = 1 << 1;
    }
}

/// Writes finished frames to a text sink.
pub struct ConsolePresenter<W: Write> {
    sink: W,
    style: FrameStyle,
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(sink: W, style: FrameStyle) -> Self {
        ConsolePresenter { sink, style }
    }

    /// Emits one frame: optional cursor-home, then `height` lines of exactly
    /// `width` glyphs (plus the border when enabled), each newline-terminated,
    /// flushed once at the end.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
        let mut frame = String::with_capacity((fb.width() + 3) * (fb.height() + 3));
        if self.style.contains(FrameStyle::CURSOR_HOME) {
            frame.push_str(CURSOR_HOME);
            frame.push('\n');
        }
        let bordered = self.style.contains(FrameStyle::BORDER);
        if bordered {
            frame.push('/');
            for _ in 0..fb.width() {
                frame.push('-');
            }
            frame.push('\\');
            frame.push('\n');
        }
        for row in fb.rows() {
            if bordered {
                frame.push('|');
            }
            frame.extend(row.iter());
            if bordered {
                frame.push('|');
            }
            frame.push('\n');
        }
        if bordered {
            frame.push('\\');
            for _ in 0..fb.width() {
                frame.push('-');
            }
            frame.push('/');
            frame.push('\n');
        }
        self.sink
            .write_all(frame.as_bytes())
            .context("failed to write frame to output")?;
        self.sink.flush().context("failed to flush frame output")
    }
}

/// Saved terminal state, restored on drop.
pub struct TerminalGuard {
    original_termios: Option<Termios>,
}

impl TerminalGuard {
    /// Hides the cursor and saves the current terminal attributes.
    ///
    /// Failing to read the attributes (stdin not a tty, for instance) is
    /// downgraded to a warning; the animation still runs, it just cannot
    /// restore what it could not save.
    pub fn install() -> Result<Self> {
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!("failed to read termios state: {}; continuing without", e);
                None
            }
        };
        print!("{}", CURSOR_HIDE);
        io::stdout()
            .flush()
            .context("failed to flush cursor-hide sequence")?;
        debug!("terminal guard installed");
        Ok(TerminalGuard { original_termios })
    }

    /// Warns when the configured frame will not fit the attached terminal.
    /// Purely advisory; the frame is written either way.
    pub fn check_fit(&self, frame_width: usize, frame_height: usize) {
        match terminal_size_cells(STDIN_FILENO) {
            Ok((cols, rows)) => {
                if frame_width > cols as usize || frame_height > rows as usize {
                    warn!(
                        "frame {}x{} exceeds terminal {}x{}; output will wrap",
                        frame_width, frame_height, cols, rows
                    );
                }
            }
            Err(e) => debug!("could not query terminal size: {}", e),
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        print!("{}", CURSOR_SHOW);
        let _ = io::stdout().flush();
        if let Some(ref original) = self.original_termios {
            if let Err(e) = tcsetattr(STDIN_FILENO, TCSANOW, original) {
                warn!("failed to restore terminal attributes: {}", e);
            }
        }
        info!("terminal state restored");
    }
}

fn terminal_size_cells(fd: RawFd) -> Result<(u16, u16)> {
    unsafe {
        let mut winsz: winsize = mem::zeroed();
        if libc::ioctl(fd, TIOCGWINSZ, &mut winsz) == -1 {
            return Err(anyhow::Error::from(io::Error::last_os_error())
                .context("ioctl(TIOCGWINSZ) failed"));
        }
        Ok((winsz.ws_col, winsz.ws_row))
    }
}
