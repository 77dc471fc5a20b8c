use std::path::PathBuf;

use clap::Parser;

/// Upload files to a NASPi server in 5 MiB chunks.
///
/// While uploading, type `p` (pause), `r` (resume) or `c` (cancel)
/// followed by Enter. Ctrl-C cancels the batch.
#[derive(Debug, Parser)]
#[command(name = "naspi-upload", author, version, about, long_about = None)]
pub struct Cli {
    /// Server URL, overriding the config file.
    #[arg(long, env = "NASPI_SERVER")]
    pub server: Option<String>,

    /// Destination directory on the server (empty = root).
    #[arg(long, default_value = "")]
    pub dest: String,

    /// Config file to use instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chunk size in MiB, overriding the config file.
    #[arg(long)]
    pub chunk_size_mib: Option<u64>,

    /// List the destination directory and exit.
    #[arg(long)]
    pub list: bool,

    /// Files to upload, in order.
    #[arg(required_unless_present = "list")]
    pub files: Vec<PathBuf>,
}

/// An interactive command typed on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Pause,
    Resume,
    Cancel,
}

impl Control {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "c" | "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_files_and_flags() {
        let cli = Cli::try_parse_from([
            "naspi-upload",
            "--server",
            "http://nas:5000",
            "--dest",
            "videos",
            "a.mkv",
            "b.mkv",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://nas:5000"));
        assert_eq!(cli.dest, "videos");
        assert_eq!(cli.files, vec![PathBuf::from("a.mkv"), PathBuf::from("b.mkv")]);
        assert!(!cli.list);
    }

    #[test]
    fn files_required_unless_listing() {
        assert!(Cli::try_parse_from(["naspi-upload"]).is_err());
        let cli = Cli::try_parse_from(["naspi-upload", "--list"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.dest, "");
    }

    #[test]
    fn control_commands() {
        assert_eq!(Control::parse("p\n"), Some(Control::Pause));
        assert_eq!(Control::parse(" Resume "), Some(Control::Resume));
        assert_eq!(Control::parse("c"), Some(Control::Cancel));
        assert_eq!(Control::parse("x"), None);
    }
}
