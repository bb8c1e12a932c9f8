use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Read, StdinLock, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use skillfit_evaluator::config::NamedParams;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `value` pretty-printed, followed by a newline.
    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        self.finish_line()
    }

    /// Writes `value` as one compact JSON line and flushes, so a host
    /// reading the stream sees it immediately.
    pub fn write_json_line<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        self.finish_line()
    }

    fn finish_line(&mut self) -> anyhow::Result<()> {
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

#[derive(Debug)]
pub enum Input {
    Stdin {
        reader: StdinLock<'static>,
    },
    File {
        reader: BufReader<File>,
        path: PathBuf,
    },
}

impl Input {
    pub fn from_input_path(input_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match input_path {
            Some(path) => Input::open(path),
            None => Ok(Input::stdin()),
        }
    }

    pub fn stdin() -> Self {
        Input::Stdin {
            reader: io::stdin().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        Ok(Input::File {
            reader: BufReader::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Input::Stdin { .. } => "stdin".to_string(),
            Input::File { path, .. } => path.display().to_string(),
        }
    }
}

impl Read for Input {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Input::Stdin { reader } => reader.read(buf),
            Input::File { reader, .. } => reader.read(buf),
        }
    }
}

impl BufRead for Input {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Input::Stdin { reader } => reader.fill_buf(),
            Input::File { reader, .. } => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amount: usize) {
        match self {
            Input::Stdin { reader } => reader.consume(amount),
            Input::File { reader, .. } => reader.consume(amount),
        }
    }
}

/// Read a named parameters file (`key value` per line).
pub fn read_params_file<P>(path: P) -> anyhow::Result<NamedParams>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read params file: {}", path.display()))?;
    let params = NamedParams::parse(&text)
        .with_context(|| format!("Failed to parse params file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), keys = params.len(), "params loaded");
    Ok(params)
}
