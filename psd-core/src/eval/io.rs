use std::{cell::RefCell, collections::VecDeque, io::Write, rc::Rc};

/// Receives interpreter output, one chunk per output/outputf statement.
/// Chunks arrive in evaluation order.
pub trait OutputSink {
    fn write_chunk(&mut self, chunk: &str);
}

/// Supplies one line of input, blocking until the host has one.
pub trait InputSource {
    fn read_line(&mut self) -> String;
}

pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn write_chunk(&mut self, chunk: &str) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(chunk.as_bytes());
        // outputf chunks carry no newline, flush so prompts show up
        let _ = stdout.flush();
    }
}

pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn read_line(&mut self) -> String {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);

        line
    }
}

/// In-memory sink that shares its buffer with the caller, for tests and
/// embedders that capture program output.
#[derive(Debug, Default, Clone)]
pub struct BufferOutput {
    buffer: Rc<RefCell<String>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.borrow().clone()
    }
}

impl OutputSink for BufferOutput {
    fn write_chunk(&mut self, chunk: &str) {
        self.buffer.borrow_mut().push_str(chunk);
    }
}

/// Scripted input lines; once the script runs dry every further read
/// yields an empty line.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> String {
        self.lines.pop_front().unwrap_or_default()
    }
}
