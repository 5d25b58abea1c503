//! Single-run lock.
//!
//! The rollover and review jobs run from cron and both write to the store;
//! overlapping runs would race the duplicate-instance check. A PID lockfile
//! in the system temp directory serializes them, with stale-lock recovery
//! for runs that died without cleaning up.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

pub struct RunLockGuard {
    path: PathBuf,
}

impl Drop for RunLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn lock_path() -> PathBuf {
    std::env::temp_dir().join("hearth.run.lock")
}

pub async fn acquire() -> anyhow::Result<RunLockGuard> {
    let lock_path = lock_path();
    let started = std::time::Instant::now();

    loop {
        match try_acquire(&lock_path) {
            Ok(guard) => return Ok(guard),
            Err(LockState::HeldBy(pid)) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    anyhow::bail!(
                        "another hearth run is in progress (pid {pid}); try again after it finishes"
                    );
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
            Err(LockState::Stale) => {
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(LockState::Unknown) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    anyhow::bail!(
                        "could not acquire run lock at {}; remove the file if no hearth process is running",
                        lock_path.display()
                    );
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(i32),
    Stale,
    Unknown,
}

fn try_acquire(lock_path: &Path) -> Result<RunLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let pid = std::process::id();
            let _ = writeln!(file, "{pid}");
            Ok(RunLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut pid_buf = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut pid_buf))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            let pid = pid_buf.trim().parse::<i32>().ok();
            match pid {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(_) => Err(LockState::Stale),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: i32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::try_acquire;

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join("hearth.run.lock");

        let guard = try_acquire(&lock_path).expect("lock should acquire");
        assert!(lock_path.is_file());
        drop(guard);
        assert!(!lock_path.exists());
    }

    #[test]
    fn second_acquire_sees_the_holder_pid() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join("hearth.run.lock");

        let _guard = try_acquire(&lock_path).expect("lock should acquire");
        let second = try_acquire(&lock_path);
        assert!(matches!(second, Err(super::LockState::HeldBy(_))));
    }
}
