use std::io;

use tracing::{Level, Metadata};
use wasm_bindgen::JsValue;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Buffers one formatted event and hands it to the console on drop.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let message = JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}

pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Routes the editor core's `tracing` events to the browser console.
/// Warnings always show; `?debug=1` adds debug events.
pub fn init_logging(debug: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    // No clock on wasm32-unknown-unknown, so no timestamps.
    let fmt_layer = fmt::layer()
        .without_time()
        .with_target(true)
        .with_level(true)
        .with_writer(MakeConsoleWriter);

    if tracing_subscriber::registry()
        .with(level)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}
