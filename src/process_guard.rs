//! Lifetime management for menu processes
//!
//! A menu blocks until the user answers. If srch itself is interrupted while
//! a menu is open, the menu must go away too, and nothing may be saved.
//!
//! - Menu children are tracked in a global registry while they run
//! - SIGINT/SIGTERM/SIGHUP terminate every tracked child, then exit 128+signo
//! - Children also get `PR_SET_PDEATHSIG` so a hard crash still takes them down
//!
//! Children stay in srch's process group: terminal menus such as `fzf` need
//! the foreground terminal.

use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// How long an interrupted menu gets between SIGTERM and SIGKILL.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Registry of running menu processes
#[derive(Debug, Default)]
pub struct ChildRegistry {
    pids: HashSet<u32>,
    terminating: bool,
}

impl ChildRegistry {
    /// Get or create the global child registry
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        debug!("Tracking menu process {}", pid);
    }

    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        debug!("Menu process {} finished", pid);
    }

    pub fn count(&self) -> usize {
        self.pids.len()
    }

    /// SIGTERM every tracked child, wait up to `grace`, then SIGKILL stragglers.
    ///
    /// Runs at most once per registry.
    pub fn terminate_all(&mut self, grace: Duration) {
        if self.terminating {
            return;
        }
        self.terminating = true;

        let pids: Vec<u32> = self.pids.drain().collect();
        if pids.is_empty() {
            return;
        }
        info!("Terminating {} menu process(es)", pids.len());

        for &pid in &pids {
            if let Err(e) = send_signal(pid, Signal::SIGTERM) {
                debug!("SIGTERM to {} failed: {}", pid, e);
            }
        }

        let start = Instant::now();
        while start.elapsed() < grace {
            if !pids.iter().any(|&pid| is_process_alive(pid)) {
                return;
            }
            std::thread::sleep(Duration::from_millis(50));
        }

        for &pid in pids.iter().filter(|&&pid| is_process_alive(pid)) {
            warn!("Menu process {} ignored SIGTERM, sending SIGKILL", pid);
            let _ = send_signal(pid, Signal::SIGKILL);
        }
    }
}

/// Registration that lasts as long as the value is alive.
///
/// Created right after spawning a menu; dropping it (normally after `wait`)
/// removes the pid from the global registry.
pub struct TrackedChild {
    pid: u32,
}

impl TrackedChild {
    pub fn track(pid: u32) -> Self {
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }
        Self { pid }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for TrackedChild {
    fn drop(&mut self) {
        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(self.pid);
        }
    }
}

fn send_signal(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Alive means it exists and is not a zombie.
fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }
    match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        // The state field follows the parenthesised command name.
        Ok(stat) => match stat.rsplit_once(')') {
            Some((_, rest)) => !matches!(rest.split_whitespace().next(), Some("Z" | "X")),
            None => true,
        },
        Err(_) => true,
    }
}

/// Install SIGINT, SIGTERM and SIGHUP handlers. Call once at startup.
pub fn init_signal_handlers() -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            info!("Received signal {}, closing menus", sig);
            if let Ok(mut registry) = ChildRegistry::global().lock() {
                registry.terminate_all(SHUTDOWN_GRACE);
            }
            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// Extension trait for `std::process::Command`
pub trait CommandLifetime {
    /// Deliver SIGTERM to the child when srch dies.
    fn die_with_parent(&mut self) -> &mut Self;
}

impl CommandLifetime for std::process::Command {
    fn die_with_parent(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        // SAFETY: the closure only calls prctl, which is async-signal-safe.
        unsafe {
            self.pre_exec(|| {
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        self
    }
}
