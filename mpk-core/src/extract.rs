use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MpkError, Result, io_error_at};
use crate::mpk::CompressionPolicy;
use crate::mpkfile::{MpkBackend, MpkFile};

#[derive(Debug, Clone)]
pub enum ExtractEvent {
    Start { total: usize },
    FileDone { index: usize, path: PathBuf },
    Finish { extracted: usize },
}

#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub output_dir: PathBuf,
    pub extracted: usize,
}

pub struct MpkExtractBuilder<'a> {
    mpk: &'a MpkFile,
    output_dir: PathBuf,
    base_name: Option<String>,
    compression_policy: CompressionPolicy,
    on_event: Option<Arc<dyn Fn(ExtractEvent) + Send + Sync>>,
}

impl<'a> MpkExtractBuilder<'a> {
    pub fn new(mpk: &'a MpkFile, output_dir: impl AsRef<Path>) -> Self {
        Self {
            mpk,
            output_dir: output_dir.as_ref().to_path_buf(),
            base_name: None,
            compression_policy: CompressionPolicy::default(),
            on_event: None,
        }
    }

    /// Prefix of every extracted file name. Defaults to the container stem.
    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = Some(base_name.into());
        self
    }

    pub fn compression_policy(mut self, policy: CompressionPolicy) -> Self {
        self.compression_policy = policy;
        self
    }

    pub fn on_event<F>(mut self, on_event: F) -> Self
    where
        F: Fn(ExtractEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(on_event));
        self
    }

    pub fn run(self) -> Result<ExtractReport> {
        let entries = self.mpk.archive().entries();

        if self.compression_policy == CompressionPolicy::Reject
            && let Some((index, entry)) = self.mpk.archive().first_compressed()
        {
            return Err(MpkError::UnsupportedCompression {
                index: index as u32,
                code: entry.compression().code(),
            });
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(MpkError::OutputNotDir(self.output_dir));
        }
        std::fs::create_dir_all(&self.output_dir).map_err(|e| io_error_at(e, &self.output_dir))?;

        let base_name = match &self.base_name {
            Some(name) => name.clone(),
            None => container_stem(self.mpk.path()),
        };
        log::info!(
            "extracting {} entries from {} into {}",
            entries.len(),
            self.mpk.path().display(),
            self.output_dir.display()
        );

        self.emit(ExtractEvent::Start { total: entries.len() });

        // resized per entry, reused across the whole run
        let mut buffer = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if !entry.compression().is_stored() {
                log::warn!(
                    "entry {} has compression code 0x{:X}, writing stored bytes as-is",
                    index,
                    entry.compression().code()
                );
            }

            let out_path = self.output_dir.join(entry.unpacked_file_name(&base_name, index));
            self.mpk.read_entry(entry, &mut buffer)?;
            std::fs::write(&out_path, &buffer).map_err(|e| io_error_at(e, &out_path))?;
            log::debug!("entry {} -> {} ({} bytes)", index, out_path.display(), buffer.len());

            self.emit(ExtractEvent::FileDone { index, path: out_path });
        }

        self.emit(ExtractEvent::Finish {
            extracted: entries.len(),
        });

        Ok(ExtractReport {
            output_dir: self.output_dir,
            extracted: entries.len(),
        })
    }

    fn emit(&self, event: ExtractEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }
}

impl MpkFile {
    pub fn extractor(&self, output_dir: impl AsRef<Path>) -> MpkExtractBuilder<'_> {
        MpkExtractBuilder::new(self, output_dir)
    }
}

/// Highest-level unpack API: open the container + extract with builder configuration.
#[derive(Default)]
pub struct UnpackBuilder {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    backend: MpkBackend,
    compression_policy: CompressionPolicy,
    on_event: Option<Arc<dyn Fn(ExtractEvent) + Send + Sync>>,
}

impl UnpackBuilder {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: impl AsRef<Path>) -> Self {
        self.input = Some(input.as_ref().to_path_buf());
        self
    }

    /// Output directory. Defaults to `<parent>/<stem>` of the container.
    pub fn output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        self.output_dir = Some(output_dir.as_ref().to_path_buf());
        self
    }

    pub fn backend(mut self, backend: MpkBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn compression_policy(mut self, policy: CompressionPolicy) -> Self {
        self.compression_policy = policy;
        self
    }

    pub fn on_event<F>(mut self, on_event: F) -> Self
    where
        F: Fn(ExtractEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(on_event));
        self
    }

    pub fn run(self) -> Result<ExtractReport> {
        let input = self.input.ok_or_else(|| {
            MpkError::IO(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Missing input path",
            ))
        })?;
        let output_dir = self.output_dir.unwrap_or_else(|| default_output_dir(&input));

        let mpk = MpkFile::builder().backend(self.backend).open(&input)?;

        let mut extractor = mpk.extractor(&output_dir).compression_policy(self.compression_policy);
        if let Some(on_event) = self.on_event {
            extractor = extractor.on_event(move |event| on_event(event));
        }

        extractor.run()
    }
}

/// `<parent>/<stem>` of a container path.
pub fn default_output_dir(input: impl AsRef<Path>) -> PathBuf {
    let input = input.as_ref();
    input.with_file_name(container_stem(input))
}

fn container_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or("output".to_string())
}
