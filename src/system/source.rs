use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Read-only access to the kernel's textual counter files.
///
/// Every read is a fresh snapshot; implementations hold no cached state.
pub trait ProcSource {
    /// Contents of the system-wide `stat` file.
    fn read_system_stat(&self) -> io::Result<String>;

    /// Pids of every process currently listed.
    fn list_pids(&self) -> io::Result<Vec<u32>>;

    /// Contents of `<pid>/stat`. Fails once the process has exited.
    fn read_pid_stat(&self, pid: u32) -> io::Result<String>;

    /// Contents of `meminfo`.
    fn read_meminfo(&self) -> io::Result<String>;

    /// Contents of `uptime`.
    fn read_uptime(&self) -> io::Result<String>;

    /// Contents of `loadavg`.
    fn read_loadavg(&self) -> io::Result<String>;
}

/// A procfs mount, `/proc` unless pointed elsewhere.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProcSource for ProcFs {
    fn read_system_stat(&self) -> io::Result<String> {
        fs::read_to_string(self.root.join("stat"))
    }

    fn list_pids(&self) -> io::Result<Vec<u32>> {
        let mut pids = Vec::new();
        for entry in fs::read_dir(&self.root)?.flatten() {
            // Only all-digit directory names are processes.
            if let Some(pid) = entry
                .file_name()
                .to_str()
                .filter(|name| name.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|name| name.parse::<u32>().ok())
                && pid > 0
            {
                pids.push(pid);
            }
        }
        Ok(pids)
    }

    fn read_pid_stat(&self, pid: u32) -> io::Result<String> {
        fs::read_to_string(self.root.join(pid.to_string()).join("stat"))
    }

    fn read_meminfo(&self) -> io::Result<String> {
        fs::read_to_string(self.root.join("meminfo"))
    }

    fn read_uptime(&self) -> io::Result<String> {
        fs::read_to_string(self.root.join("uptime"))
    }

    fn read_loadavg(&self) -> io::Result<String> {
        fs::read_to_string(self.root.join("loadavg"))
    }
}
