use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use mpk_core::extract::{ExtractEvent, UnpackBuilder, default_output_dir};
use mpk_core::mpk::CompressionPolicy;
use mpk_core::mpkfile::MpkBackend;

use crate::UnpackCommand;

pub fn unpack(cmd: &UnpackCommand) -> anyhow::Result<()> {
    let input_path = Path::new(&cmd.input);
    let output_path = match &cmd.output {
        // specified output directory
        Some(output) => output.into(),
        // next to the input file
        None => default_output_dir(input_path),
    };

    let policy = if cmd.passthrough_compressed {
        CompressionPolicy::Passthrough
    } else {
        CompressionPolicy::Reject
    };
    let backend = if cmd.mmap { MpkBackend::Mmap } else { MpkBackend::File };

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::default_bar().template("{pos}/{len} files written {wide_bar} elapsed: {elapsed}")?);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.println(format!("Output directory: `{}`", output_path.display()));

    let bar1 = bar.clone();
    let report = UnpackBuilder::builder()
        .input(input_path)
        .output_dir(&output_path)
        .backend(backend)
        .compression_policy(policy)
        .on_event(move |event| match event {
            ExtractEvent::Start { total } => bar1.set_length(total as u64),
            ExtractEvent::FileDone { .. } => bar1.inc(1),
            ExtractEvent::Finish { .. } => {}
        })
        .run()
        .with_context(|| format!("Failed to unpack `{}`", cmd.input));

    bar.finish_and_clear();
    let report = report?;
    println!("Extracted {} files to `{}`", report.extracted, report.output_dir.display());
    println!("Done.");

    Ok(())
}
