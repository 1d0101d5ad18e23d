use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MpkError, Result, io_error_at};
use crate::write::MpkWriter;

/// Extension appended to the directory name for the default output path.
pub const CONTAINER_EXTENSION: &str = ".mpk";

#[derive(Debug, Clone)]
pub enum PackEvent {
    Start { total: usize },
    FileDone { index: usize, path: PathBuf },
    Finish { entries: usize },
}

#[derive(Debug, Clone)]
pub struct PackReport {
    pub output: PathBuf,
    pub entries: usize,
}

/// Pack the regular files directly inside a directory into one container.
///
/// The container is written to a temporary file next to the output and
/// renamed into place once complete, so a failed run leaves nothing behind.
#[derive(Default)]
pub struct PackBuilder {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    on_event: Option<Arc<dyn Fn(PackEvent) + Send + Sync>>,
}

impl PackBuilder {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: impl AsRef<Path>) -> Self {
        self.input = Some(input.as_ref().to_path_buf());
        self
    }

    /// Output container path. Defaults to `<input>.mpk` beside the directory.
    pub fn output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn on_event<F>(mut self, on_event: F) -> Self
    where
        F: Fn(PackEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(on_event));
        self
    }

    pub fn run(self) -> Result<PackReport> {
        let input = self.input.ok_or_else(|| {
            MpkError::IO(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Missing input path",
            ))
        })?;

        let files = collect_inputs(&input)?;
        let output = match self.output {
            Some(output) => output,
            None => default_container_path(&input)?,
        };
        log::info!("packing {} files from {} into {}", files.len(), input.display(), output.display());

        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }

        let emit = |event: PackEvent| {
            if let Some(on_event) = &self.on_event {
                on_event(event);
            }
        };
        emit(PackEvent::Start { total: files.len() });

        // sized once for the largest input, reused for every file
        let mut buffer_size = 0u64;
        for path in &files {
            let len = path.metadata().map_err(|e| io_error_at(e, path))?.len();
            buffer_size = buffer_size.max(len);
        }
        let mut buffer = Vec::with_capacity(buffer_size as usize);

        let mut temp_builder = tempfile::Builder::new();
        temp_builder.prefix(".mpk-");
        // same mode a plain create would get, umask applied
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp_builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let temp = temp_builder.tempfile_in(parent).map_err(|e| io_error_at(e, parent))?;
        // an overwritten container keeps its mode
        if let Ok(existing) = std::fs::metadata(&output) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| io_error_at(e, temp.path()))?;
        }
        let mut writer = MpkWriter::new(BufWriter::new(temp), files.len() as u64)?;
        for (index, path) in files.iter().enumerate() {
            buffer.clear();
            File::open(path)
                .and_then(|mut file| file.read_to_end(&mut buffer))
                .map_err(|e| io_error_at(e, path))?;

            let name = path.file_name().map(|name| name.as_encoded_bytes()).unwrap_or_default();
            writer.start_file(name)?;
            writer.write_all(&buffer)?;

            emit(PackEvent::FileDone {
                index,
                path: path.clone(),
            });
        }
        let temp = writer.finish()?.into_inner().map_err(|e| e.into_error())?;
        temp.persist(&output)?;

        emit(PackEvent::Finish { entries: files.len() });
        log::info!("wrote {}", output.display());

        Ok(PackReport {
            output,
            entries: files.len(),
        })
    }
}

/// Regular files directly inside `input_dir`, sorted by path.
///
/// Subdirectories are skipped, not descended into.
pub fn collect_inputs(input_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let input_dir = input_dir.as_ref();
    if !input_dir.is_dir() {
        return Err(MpkError::InvalidInputDir(input_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(input_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    Ok(files)
}

/// `<parent>/<dir name>.mpk` for an input directory.
pub fn default_container_path(input_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let input_dir = input_dir.as_ref();
    // `..` and a bare `.` have no file name of their own
    let dir = match input_dir.file_name() {
        Some(_) => input_dir.to_path_buf(),
        None => input_dir.canonicalize().map_err(|e| io_error_at(e, input_dir))?,
    };
    let Some(name) = dir.file_name() else {
        return Err(MpkError::InvalidInputDir(input_dir.to_path_buf()));
    };

    let mut file_name = name.to_os_string();
    file_name.push(CONTAINER_EXTENSION);
    Ok(dir.with_file_name(file_name))
}
