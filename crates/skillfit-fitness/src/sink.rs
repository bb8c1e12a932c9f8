use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Destination of the final fitness value.
pub trait FitnessSink {
    /// Writes `fitness`. Called at most twice per run (one retry).
    fn write_fitness(&mut self, fitness: f64) -> io::Result<()>;
}

impl<S> FitnessSink for &mut S
where
    S: FitnessSink + ?Sized,
{
    fn write_fitness(&mut self, fitness: f64) -> io::Result<()> {
        (**self).write_fitness(fitness)
    }
}

/// Collects written values in memory.
impl FitnessSink for Vec<f64> {
    fn write_fitness(&mut self, fitness: f64) -> io::Result<()> {
        self.push(fitness);
        Ok(())
    }
}

/// Writes the fitness as a plain-text file holding one number and a newline.
///
/// The file is replaced on every write.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FitnessSink for FileSink {
    fn write_fitness(&mut self, fitness: f64) -> io::Result<()> {
        fs::write(&self.path, format!("{fitness}\n"))
    }
}
