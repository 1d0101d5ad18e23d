mod list;
mod pack;
mod unpack;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about = "MPK container packer/unpacker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract an MPK file into a directory named after it
    #[command(short_flag = 'e', visible_alias = "extract")]
    Unpack(UnpackCommand),
    /// Pack the files of a directory into `<dir>.mpk`
    #[command(short_flag = 'c', visible_alias = "create")]
    Pack(PackCommand),
    /// Print the header and entry table of an MPK file
    #[command(short_flag = 'l')]
    List(ListCommand),
}

#[derive(Debug, Args)]
struct UnpackCommand {
    /// Input MPK file path
    input: String,
    /// Output directory path, defaults to the input path without extension
    #[arg(short, long)]
    output: Option<String>,
    /// Write entries with a non-zero compression code as stored bytes
    /// instead of failing
    #[arg(long)]
    passthrough_compressed: bool,
    /// Read payloads through a memory map
    #[arg(long)]
    mmap: bool,
}

#[derive(Debug, Args)]
struct PackCommand {
    /// Input directory path
    input: String,
    /// Output file path, defaults to `<input>.mpk`
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Args)]
struct ListCommand {
    /// Input MPK file path
    input: String,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Unpack(cmd) => unpack::unpack(cmd),
        Command::Pack(cmd) => pack::package(cmd),
        Command::List(cmd) => list::list(cmd),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["mpk-cli", "-e", "data/test.mpk"]).unwrap();
        assert!(matches!(cli.command, Command::Unpack(ref cmd) if cmd.input == "data/test.mpk"));

        let cli = Cli::try_parse_from(["mpk-cli", "-c", "data/test"]).unwrap();
        assert!(matches!(cli.command, Command::Pack(ref cmd) if cmd.input == "data/test"));

        let cli = Cli::try_parse_from(["mpk-cli", "extract", "a.mpk", "--mmap"]).unwrap();
        assert!(matches!(cli.command, Command::Unpack(ref cmd) if cmd.mmap));
    }

    #[test]
    fn test_mode_required() {
        assert!(Cli::try_parse_from(["mpk-cli"]).is_err());
        assert!(Cli::try_parse_from(["mpk-cli", "-e"]).is_err());
    }
}
