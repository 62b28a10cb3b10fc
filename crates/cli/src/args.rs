use std::path::{Path, PathBuf};

use clap::Parser;
use mime_guess::mime::Mime;
use tracing::warn;

use thumbq_core::{BusKind, Config, FileTarget, Topology};

/// Request thumbnails from the Freedesktop thumbnailer service.
///
/// `thumbq <file> <mimetype>` queues a single file with a known MIME type;
/// `thumbq <file>...` queues every file, guessing each MIME type.
#[derive(Debug, Parser)]
#[command(name = "thumbq", version)]
pub struct Cli {
    /// Files to thumbnail, or a single file followed by its MIME type
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "THUMBQ_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Give up on a file after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Multiplex all requests over one bus connection
    #[arg(long)]
    pub shared_connection: bool,

    /// Talk to the thumbnailer on the system bus
    #[arg(long)]
    pub system_bus: bool,

    /// Thumbnail flavor to request (e.g. normal, large)
    #[arg(long, value_name = "FLAVOR")]
    pub flavor: Option<String>,

    /// Scheduler the service should use (e.g. default, foreground)
    #[arg(long, value_name = "NAME")]
    pub scheduler: Option<String>,

    /// Maximum number of requests in flight (0 = unbounded)
    #[arg(short = 'j', long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Print the results as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Files to queue, in the order given.
    ///
    /// Exactly two inputs where the second parses as a MIME type and is not
    /// an existing path are read as `<file> <mimetype>`.
    pub fn targets(&self) -> Vec<FileTarget> {
        if let [file, second] = self.inputs.as_slice() {
            if let Some(mime_type) = mime_hint(second) {
                warn!(
                    file = %file.display(),
                    mime_type,
                    "Second argument is not a file; using it as the MIME type"
                );
                return vec![FileTarget::new(file).with_mime_type(mime_type)];
            }
        }
        self.inputs.iter().map(FileTarget::new).collect()
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.session.timeout_secs = timeout;
        }
        if self.shared_connection {
            config.session.topology = Topology::Shared;
        }
        if self.system_bus {
            config.bus.bus = BusKind::System;
        }
        if let Some(flavor) = &self.flavor {
            config.request.priority = flavor.clone();
        }
        if let Some(scheduler) = &self.scheduler {
            config.request.backend = scheduler.clone();
        }
        if let Some(max) = self.max_concurrent {
            config.session.max_concurrent_sessions = max;
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

fn is_mime_type(value: &str) -> bool {
    value.parse::<Mime>().is_ok()
}

/// The argument as a MIME type, unless it names an existing path.
fn mime_hint(arg: &Path) -> Option<&str> {
    let value = arg.to_str()?;
    (is_mime_type(value) && !arg.exists()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("thumbq").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_file_with_mime_type() {
        let cli = parse(&["/tmp/photo.raw", "image/x-canon-cr2"]);
        let targets = cli.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].path, PathBuf::from("/tmp/photo.raw"));
        assert_eq!(targets[0].mime_type.as_deref(), Some("image/x-canon-cr2"));
    }

    #[test]
    fn test_two_files_are_two_targets() {
        let cli = parse(&["/tmp/a.png", "/tmp/b.png"]);
        let targets = cli.targets();
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| t.mime_type.is_none()));
    }

    #[test]
    fn test_existing_path_that_looks_like_mime_is_a_file() {
        // Tests run from the package root, where this relative path exists.
        assert!(is_mime_type("src/main.rs"));
        let cli = parse(&["a.png", "src/main.rs"]);
        assert_eq!(cli.targets().len(), 2);
    }

    #[test]
    fn test_many_files() {
        let cli = parse(&["a.png", "b.jpg", "c.mp4"]);
        assert_eq!(cli.targets().len(), 3);
    }

    #[test]
    fn test_requires_a_file() {
        assert!(Cli::try_parse_from(["thumbq"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "--timeout",
            "9",
            "--shared-connection",
            "--system-bus",
            "--flavor",
            "large",
            "--scheduler",
            "foreground",
            "-j",
            "2",
            "a.png",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.session.timeout_secs, 9);
        assert_eq!(config.session.topology, Topology::Shared);
        assert_eq!(config.bus.bus, BusKind::System);
        assert_eq!(config.request.priority, "large");
        assert_eq!(config.request.backend, "foreground");
        assert_eq!(config.session.max_concurrent_sessions, 2);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let cli = parse(&["a.png"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.session.timeout_secs, 120);
        assert_eq!(config.session.topology, Topology::Isolated);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_missing_second_file_is_read_as_mime_type() {
        let cli = parse(&["a.png", "sub/b.png"]);
        let targets = cli.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].mime_type.as_deref(), Some("sub/b.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_names_are_accepted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"/tmp/caf\xe9.png");
        let cli = Cli::try_parse_from([OsStr::new("thumbq"), name]).unwrap();
        let targets = cli.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].path.as_os_str(), name);
        assert!(targets[0].mime_type.is_none());
    }

    #[test]
    fn test_mime_detection() {
        assert!(is_mime_type("image/png"));
        assert!(is_mime_type("application/vnd.oasis.opendocument.text"));
        assert!(!is_mime_type("photo.png"));
        assert!(!is_mime_type("/tmp/a/b.png"));
    }
}
