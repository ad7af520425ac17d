mod commands;

use clap::{Args, Parser, Subcommand};
use commands::{EXIT_FAILURE, EXIT_LOCKFILE_ERROR};
use lockenv_core::{
    GenerateOptions, DEFAULT_ENV_NAME, DEFAULT_LOCK_PATH, DEFAULT_OUTPUT_PATH,
    DEFAULT_REGENERATE_COMMAND,
};
use lockenv_schema::types::{DEFAULT_MANAGER, DEFAULT_PLATFORM};
use lockenv_schema::Target;
use std::borrow::Cow;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "lockenv",
    version,
    about = "Generate an ASV benchmark environment file from conda-lock.yml"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the environment file derived from the lockfile.
    Generate(Selection),
    /// Exit non-zero if the environment file is missing or out of date.
    Check(Selection),
}

#[derive(Debug, Clone, Args)]
struct Selection {
    /// Path to the conda lockfile.
    #[arg(long, default_value = DEFAULT_LOCK_PATH)]
    lockfile: PathBuf,
    /// Path of the environment file to write.
    #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Conda platform whose pins are extracted.
    #[arg(long, default_value = DEFAULT_PLATFORM)]
    platform: String,
    /// Package manager whose pins are extracted.
    #[arg(long, default_value = DEFAULT_MANAGER)]
    manager: String,
    /// Environment name written to the file.
    #[arg(long, default_value = DEFAULT_ENV_NAME)]
    name: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            lockfile: PathBuf::from(DEFAULT_LOCK_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            platform: DEFAULT_PLATFORM.to_owned(),
            manager: DEFAULT_MANAGER.to_owned(),
            name: DEFAULT_ENV_NAME.to_owned(),
        }
    }
}

impl Selection {
    fn into_options(self) -> GenerateOptions {
        let target = Target::new(self.platform, self.manager);
        // Non-default selections must round-trip through the header's
        // regeneration hint.
        let mut regenerate = DEFAULT_REGENERATE_COMMAND.to_owned();
        let mut flag = |name: &str, value: &str| {
            regenerate.push_str(&format!(" --{name} {}", shell_quote(value)));
        };
        if self.lockfile != PathBuf::from(DEFAULT_LOCK_PATH) {
            flag("lockfile", &self.lockfile.to_string_lossy());
        }
        if self.output != PathBuf::from(DEFAULT_OUTPUT_PATH) {
            flag("output", &self.output.to_string_lossy());
        }
        if target.platform != *DEFAULT_PLATFORM {
            flag("platform", &target.platform);
        }
        if target.manager != *DEFAULT_MANAGER {
            flag("manager", &target.manager);
        }
        if self.name != DEFAULT_ENV_NAME {
            flag("name", &self.name);
        }
        GenerateOptions {
            lock_path: self.lockfile,
            output_path: self.output,
            target,
            env_name: self.name,
            regenerate_command: regenerate,
        }
    }
}

/// Single-quote values the shell would split or expand.
fn shell_quote(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@%,".contains(c));
    if plain {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', r"'\''")))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LOCKENV_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;
    let (check, options) = match cli.command {
        None => (false, Selection::default().into_options()),
        Some(Commands::Generate(sel)) => (false, sel.into_options()),
        Some(Commands::Check(sel)) => (true, sel.into_options()),
    };
    debug!("resolved options: {options:?}");

    let result = if check {
        commands::check::run(options, json_output)
    } else {
        commands::generate::run(options, json_output)
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("lockfile error:") {
                EXIT_LOCKFILE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
