use anyhow::Context;
use mpk_core::mpkfile::MpkFile;

use crate::ListCommand;

pub fn list(cmd: &ListCommand) -> anyhow::Result<()> {
    let mpk = MpkFile::open(&cmd.input).with_context(|| format!("Failed to open `{}`", cmd.input))?;
    let archive = mpk.archive();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(archive)?);
        return Ok(());
    }

    let header = archive.header();
    println!(
        "{}: version {:#08x}, {} entries, {} bytes",
        cmd.input,
        header.version(),
        header.entry_count(),
        mpk.file_size()
    );
    println!("{:>6} {:>6} {:>12} {:>12}  name", "id", "comp", "offset", "size");
    for entry in archive.entries() {
        println!(
            "{:>6} {:>6} {:>#12x} {:>12}  {}",
            entry.entry_id(),
            entry.compression().code(),
            entry.offset(),
            entry.size(),
            entry.filename()
        );
    }

    Ok(())
}
