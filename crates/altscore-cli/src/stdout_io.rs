use std::io::{self, Write};

/// Renderer output lands here. A closed pipe (`altscore ... | head`) is
/// treated as success so downstream consumers can stop reading early.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    emit(text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    emit(text, true)
}

fn emit(text: &str, trailing_newline: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    ignore_broken_pipe(write_fully(&mut handle, text, trailing_newline))
}

fn write_fully(writer: &mut impl Write, text: &str, trailing_newline: bool) -> io::Result<()> {
    writer.write_all(text.as_bytes())?;
    if trailing_newline {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn ignore_broken_pipe(outcome: io::Result<()>) -> io::Result<()> {
    match outcome {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
