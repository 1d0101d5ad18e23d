use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use mpk_core::pack::{PackBuilder, PackEvent};

use crate::PackCommand;

pub fn package(cmd: &PackCommand) -> anyhow::Result<()> {
    let mut builder = PackBuilder::builder().input(&cmd.input);
    if let Some(output) = &cmd.output {
        builder = builder.output(output);
    }

    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::default_bar().template("{pos}/{len} files packed {wide_bar} elapsed: {elapsed}")?);
    bar.enable_steady_tick(Duration::from_millis(100));

    let bar1 = bar.clone();
    let report = builder
        .on_event(move |event| match event {
            PackEvent::Start { total } => bar1.set_length(total as u64),
            PackEvent::FileDone { path, .. } => {
                log::info!("Packed file: {}", path.display());
                bar1.inc(1);
            }
            PackEvent::Finish { .. } => {}
        })
        .run()
        .with_context(|| format!("Failed to pack `{}`", cmd.input));

    bar.finish_and_clear();
    let report = report?;
    if report.entries == 0 {
        log::warn!("input directory `{}` has no files, wrote an empty container", cmd.input);
    }
    println!("Output file: {} ({} files)", report.output.display(), report.entries);
    println!("Done!");

    Ok(())
}
