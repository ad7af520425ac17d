use crate::CoreError;
use lockenv_schema::{parse_lock_file, EnvDocument, EnvHeader, PackageRecord, Platform, Target};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const DEFAULT_LOCK_PATH: &str = "conda-lock.yml";
pub const DEFAULT_OUTPUT_PATH: &str = "env.yml";
pub const DEFAULT_ENV_NAME: &str = "tardis-benchmark";
pub const DEFAULT_CHANNEL: &str = "conda-forge";
pub const DEFAULT_REGENERATE_COMMAND: &str = "lockenv generate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub lock_path: PathBuf,
    pub output_path: PathBuf,
    pub target: Target,
    pub env_name: String,
    /// Shown in the header as the way to refresh the file.
    pub regenerate_command: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            lock_path: PathBuf::from(DEFAULT_LOCK_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target: Target::default(),
            env_name: DEFAULT_ENV_NAME.to_owned(),
            regenerate_command: DEFAULT_REGENERATE_COMMAND.to_owned(),
        }
    }
}

/// Summary of a completed `generate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output_path: PathBuf,
    pub package_count: usize,
    pub channels: Vec<String>,
    pub platform: Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    UpToDate,
    Stale,
    Missing,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::UpToDate => "up-to-date",
            CheckStatus::Stale => "stale",
            CheckStatus::Missing => "missing",
        }
    }
}

pub struct EnvGenerator {
    options: GenerateOptions,
}

impl EnvGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Derive the environment from the lockfile without touching the output.
    pub fn load(&self) -> Result<EnvDocument, CoreError> {
        let lock_path = &self.options.lock_path;
        if !lock_path.exists() {
            return Err(CoreError::MissingInput {
                path: lock_path.clone(),
            });
        }

        info!("reading lockfile {}", lock_path.display());
        let lock = parse_lock_file(lock_path)?;

        let mut channels = lock.channel_urls();
        if channels.is_empty() {
            debug!("lockfile declares no channel urls, falling back to {DEFAULT_CHANNEL}");
            channels.push(DEFAULT_CHANNEL.to_owned());
        }

        let target = &self.options.target;
        let mut dependencies: Vec<String> = lock
            .packages_for(target)
            .filter_map(PackageRecord::pin)
            .collect();
        debug!(
            "{} of {} lock entries pinned for {target}",
            dependencies.len(),
            lock.package_count()
        );

        if dependencies.is_empty() {
            return Err(CoreError::NoPackagesFound {
                path: lock_path.clone(),
                platform: target.platform.to_string(),
                manager: target.manager.to_string(),
            });
        }
        dependencies.sort();

        Ok(EnvDocument {
            name: self.options.env_name.clone(),
            channels,
            dependencies,
        })
    }

    pub fn render(&self, env: &EnvDocument) -> Result<String, CoreError> {
        Ok(env.render(&self.header())?)
    }

    /// Atomically replace the output file with the rendered environment.
    pub fn write(&self, env: &EnvDocument) -> Result<PathBuf, CoreError> {
        let content = self.render(env)?;
        let dest = &self.options.output_path;
        info!("writing {}", dest.display());
        write_atomic(dest, &content).map_err(|source| CoreError::Write {
            path: dest.clone(),
            source,
        })?;
        Ok(dest.clone())
    }

    pub fn generate(&self) -> Result<GenerateReport, CoreError> {
        let env = self.load()?;
        let output_path = self.write(&env)?;
        Ok(GenerateReport {
            output_path,
            package_count: env.dependencies.len(),
            channels: env.channels,
            platform: self.options.target.platform.clone(),
        })
    }

    /// Compare the output file with what `generate` would write now.
    pub fn check(&self) -> Result<CheckStatus, CoreError> {
        let expected = self.render(&self.load()?)?;
        let dest = &self.options.output_path;
        if !dest.exists() {
            return Ok(CheckStatus::Missing);
        }
        let current = fs::read_to_string(dest)?;
        if current == expected {
            Ok(CheckStatus::UpToDate)
        } else {
            debug!("{} differs from regenerated content", dest.display());
            Ok(CheckStatus::Stale)
        }
    }

    fn header(&self) -> EnvHeader {
        let lock_path = &self.options.lock_path;
        let source = lock_path.file_name().map_or_else(
            || lock_path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        EnvHeader {
            source,
            platform: self.options.target.platform.clone(),
            regenerate: self.options.regenerate_command.clone(),
        }
    }
}

fn write_atomic(dest: &Path, content: &str) -> std::io::Result<()> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    // Temp files are created owner-only; keep the replaced file's mode.
    if let Ok(meta) = fs::metadata(dest) {
        tmp.as_file().set_permissions(meta.permissions())?;
    } else {
        set_default_mode(tmp.as_file())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
