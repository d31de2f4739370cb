//! Terminal launcher
//!
//! Opens `ssh <arguments>` in a terminal emulator. Strategies are tried in
//! order until one process starts:
//!
//! 1. the configured terminal (known id, custom command, or a raw command)
//! 2. command descriptors from the environment (`SSH_HELPER_TERMINAL`, `TERMINAL`)
//! 3. well-known terminals found on `PATH`
//! 4. `ssh` itself, detached
//!
//! Every step builds its own invocation. An identical program and argument
//! list is not retried within one launch.

mod terminals;

pub use terminals::{
    find_candidate, terminal_display_name, TerminalCandidate, FALLBACK_ORDER, TERMINAL_CANDIDATES,
};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use sh_core::TerminalPreference;

/// Environment variables consulted for a terminal command, in order
pub const DEFAULT_TERMINAL_ENV_VARS: &[&str] = &["SSH_HELPER_TERMINAL", "TERMINAL"];

/// Process-level operations the launcher needs
pub trait LaunchEnvironment: Send + Sync {
    /// Resolve `name` on `PATH`, or check an explicit path
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    fn env_var(&self, key: &str) -> Option<String>;

    /// Start `program` without waiting for it
    fn spawn_detached(&self, program: &Path, args: &[String]) -> std::io::Result<()>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl LaunchEnvironment for SystemEnvironment {
    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn spawn_detached(&self, program: &Path, args: &[String]) -> std::io::Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command.spawn()?;
        // Reap the child so long-running callers don't collect zombies
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

/// One concrete way to start the session
#[derive(Debug)]
struct Attempt {
    source: String,
    program: PathBuf,
    args: Vec<String>,
}

/// Runs ssh in the first terminal that starts
pub struct TerminalLauncher {
    env: Arc<dyn LaunchEnvironment>,
    env_vars: Vec<String>,
}

impl TerminalLauncher {
    pub fn new(env: Arc<dyn LaunchEnvironment>, env_vars: Vec<String>) -> Self {
        Self { env, env_vars }
    }

    /// Launch `ssh arguments`, honoring `preference` first.
    ///
    /// Returns false when every strategy failed.
    pub fn launch(&self, arguments: &[String], preference: &TerminalPreference) -> bool {
        if arguments.is_empty() {
            tracing::warn!("Refusing to launch ssh without arguments");
            return false;
        }

        let mut attempted = HashSet::new();

        if !preference.is_auto() {
            let id = preference.id.trim();
            let attempt = if id == TerminalPreference::CUSTOM {
                self.descriptor_attempt("custom command", &preference.custom_command, arguments)
            } else if let Some(candidate) = find_candidate(id) {
                self.candidate_attempt(candidate, arguments)
            } else {
                self.descriptor_attempt("preferred terminal", id, arguments)
            };
            if self.try_attempt(attempt, &mut attempted) {
                return true;
            }
        }

        for var in &self.env_vars {
            let Some(descriptor) = self.env.env_var(var) else {
                continue;
            };
            let attempt = self.descriptor_attempt(var, &descriptor, arguments);
            if self.try_attempt(attempt, &mut attempted) {
                return true;
            }
        }

        for id in FALLBACK_ORDER {
            let Some(candidate) = find_candidate(id) else {
                continue;
            };
            let attempt = self.candidate_attempt(candidate, arguments);
            if self.try_attempt(attempt, &mut attempted) {
                return true;
            }
        }

        let direct = self.env.find_executable("ssh").map(|program| Attempt {
            source: "direct".to_string(),
            program,
            args: arguments.to_vec(),
        });
        if self.try_attempt(direct, &mut attempted) {
            return true;
        }

        tracing::warn!(
            "Could not start a terminal for: ssh {}",
            arguments.join(" ")
        );
        false
    }

    /// Known terminals whose executable is installed
    pub fn available_terminals(&self) -> Vec<&'static TerminalCandidate> {
        TERMINAL_CANDIDATES
            .iter()
            .filter(|c| self.env.find_executable(c.executable).is_some())
            .collect()
    }

    fn candidate_attempt(
        &self,
        candidate: &TerminalCandidate,
        arguments: &[String],
    ) -> Option<Attempt> {
        let program = self.env.find_executable(candidate.executable)?;
        let args = candidate
            .exec_args
            .iter()
            .map(|a| a.to_string())
            .chain(ssh_command(arguments))
            .collect();
        Some(Attempt {
            source: candidate.id.to_string(),
            program,
            args,
        })
    }

    /// A shell-style command whose first word is the terminal
    fn descriptor_attempt(
        &self,
        source: &str,
        descriptor: &str,
        arguments: &[String],
    ) -> Option<Attempt> {
        let words = match shell_words::split(descriptor.trim()) {
            Ok(words) => words,
            Err(e) => {
                tracing::debug!("Ignoring {} {:?}: {}", source, descriptor, e);
                return None;
            }
        };
        let (program, rest) = words.split_first()?;
        let Some(resolved) = self.env.find_executable(program) else {
            tracing::debug!("{} executable {:?} not found", source, program);
            return None;
        };

        Some(Attempt {
            source: source.to_string(),
            program: resolved,
            args: rest.iter().cloned().chain(ssh_command(arguments)).collect(),
        })
    }

    fn try_attempt(
        &self,
        attempt: Option<Attempt>,
        attempted: &mut HashSet<(PathBuf, Vec<String>)>,
    ) -> bool {
        let Some(attempt) = attempt else {
            return false;
        };
        if !attempted.insert((attempt.program.clone(), attempt.args.clone())) {
            tracing::debug!(
                "Already tried {:?} {:?}, skipping {}",
                attempt.program,
                attempt.args,
                attempt.source
            );
            return false;
        }

        match self.env.spawn_detached(&attempt.program, &attempt.args) {
            Ok(()) => {
                tracing::debug!(
                    "Launched {:?} ({}) with {:?}",
                    attempt.program,
                    attempt.source,
                    attempt.args
                );
                true
            }
            Err(e) => {
                tracing::debug!("Failed to start {:?} ({}): {}", attempt.program, attempt.source, e);
                false
            }
        }
    }
}

fn ssh_command(arguments: &[String]) -> impl Iterator<Item = String> + '_ {
    std::iter::once("ssh".to_string()).chain(arguments.iter().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeEnvironment {
        installed: HashSet<String>,
        broken: HashSet<String>,
        failing_args: Vec<Vec<String>>,
        vars: HashMap<String, String>,
        spawned: Mutex<Vec<(PathBuf, Vec<String>)>>,
        tried: Mutex<Vec<PathBuf>>,
    }

    impl FakeEnvironment {
        fn with(installed: &[&str], broken: &[&str]) -> Self {
            Self {
                installed: installed.iter().map(|s| s.to_string()).collect(),
                broken: broken.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl LaunchEnvironment for FakeEnvironment {
        fn find_executable(&self, name: &str) -> Option<PathBuf> {
            self.installed
                .contains(name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }

        fn env_var(&self, key: &str) -> Option<String> {
            self.vars.get(key).cloned()
        }

        fn spawn_detached(&self, program: &Path, args: &[String]) -> std::io::Result<()> {
            self.tried.lock().push(program.to_path_buf());
            let name = program.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if self.broken.contains(name) || self.failing_args.iter().any(|a| a == args) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "broken"));
            }
            self.spawned.lock().push((program.to_path_buf(), args.to_vec()));
            Ok(())
        }
    }

    fn launcher(env: FakeEnvironment) -> (Arc<FakeEnvironment>, TerminalLauncher) {
        let env = Arc::new(env);
        let vars = DEFAULT_TERMINAL_ENV_VARS.iter().map(|v| v.to_string()).collect();
        (env.clone(), TerminalLauncher::new(env, vars))
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_preferred_known_terminal() {
        let (env, launcher) = launcher(FakeEnvironment::with(&["konsole", "xterm"], &[]));
        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::new("xterm")));

        let spawned = env.spawned.lock();
        assert_eq!(spawned[0].0, PathBuf::from("/usr/bin/xterm"));
        assert_eq!(spawned[0].1, args(&["-hold", "-e", "ssh", "box"]));
    }

    #[test]
    fn test_custom_command() {
        let (env, launcher) = launcher(FakeEnvironment::with(&["foot"], &[]));
        let preference = TerminalPreference::custom("foot --title 'remote shell'");
        assert!(launcher.launch(&args(&["-p", "22", "box"]), &preference));

        let spawned = env.spawned.lock();
        assert_eq!(
            spawned[0].1,
            args(&["--title", "remote shell", "ssh", "-p", "22", "box"])
        );
    }

    #[test]
    fn test_unknown_preference_is_a_descriptor() {
        let (env, launcher) = launcher(FakeEnvironment::with(&["foot"], &[]));
        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::new("foot")));
        assert_eq!(env.spawned.lock()[0].1, args(&["ssh", "box"]));
    }

    #[test]
    fn test_environment_descriptor() {
        let mut fake = FakeEnvironment::with(&["st", "konsole"], &[]);
        fake.vars.insert("TERMINAL".into(), "st -e".into());
        let (env, launcher) = launcher(fake);

        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::default()));
        let spawned = env.spawned.lock();
        assert_eq!(spawned[0].0, PathBuf::from("/usr/bin/st"));
        assert_eq!(spawned[0].1, args(&["-e", "ssh", "box"]));
    }

    #[test]
    fn test_helper_variable_before_terminal_variable() {
        let mut fake = FakeEnvironment::with(&["st", "foot"], &[]);
        fake.vars.insert("TERMINAL".into(), "st -e".into());
        fake.vars.insert("SSH_HELPER_TERMINAL".into(), "foot".into());
        let (env, launcher) = launcher(fake);

        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::default()));
        assert_eq!(env.spawned.lock()[0].0, PathBuf::from("/usr/bin/foot"));
    }

    #[test]
    fn test_falls_through_to_last_candidate() {
        let (env, launcher) = launcher(FakeEnvironment::with(
            &["konsole", "kitty", "xterm"],
            &["konsole", "kitty"],
        ));
        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::default()));

        let tried: Vec<_> = env.tried.lock().clone();
        assert_eq!(
            tried,
            vec![
                PathBuf::from("/usr/bin/konsole"),
                PathBuf::from("/usr/bin/kitty"),
                PathBuf::from("/usr/bin/xterm"),
            ]
        );
    }

    #[test]
    fn test_identical_invocation_not_retried() {
        let mut fake = FakeEnvironment::with(&["xterm", "ssh"], &["xterm"]);
        fake.vars.insert("TERMINAL".into(), "xterm -hold -e".into());
        let (env, launcher) = launcher(fake);

        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::new("xterm")));
        let tried = env.tried.lock().clone();
        assert_eq!(
            tried,
            vec![PathBuf::from("/usr/bin/xterm"), PathBuf::from("/usr/bin/ssh")]
        );
        assert_eq!(env.spawned.lock()[0].1, args(&["box"]));
    }

    #[test]
    fn test_failed_descriptor_keeps_known_invocation() {
        let mut fake = FakeEnvironment::with(&["xterm"], &[]);
        fake.vars.insert("TERMINAL".into(), "xterm -fa Mono".into());
        fake.failing_args.push(args(&["-fa", "Mono", "ssh", "box"]));
        let (env, launcher) = launcher(fake);

        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::default()));
        let tried = env.tried.lock().clone();
        assert_eq!(
            tried,
            vec![PathBuf::from("/usr/bin/xterm"), PathBuf::from("/usr/bin/xterm")]
        );
        assert_eq!(env.spawned.lock()[0].1, args(&["-hold", "-e", "ssh", "box"]));
    }

    #[test]
    fn test_unresolvable_preference_reaches_last_candidate() {
        let (env, launcher) = launcher(FakeEnvironment::with(&["xterm"], &[]));
        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::new("kitty")));

        assert_eq!(*env.tried.lock(), vec![PathBuf::from("/usr/bin/xterm")]);
        let spawned = env.spawned.lock();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].1, args(&["-hold", "-e", "ssh", "box"]));
    }

    #[test]
    fn test_everything_fails() {
        let (_env, launcher) = launcher(FakeEnvironment::with(&["xterm"], &["xterm"]));
        assert!(!launcher.launch(&args(&["box"]), &TerminalPreference::default()));
    }

    #[test]
    fn test_empty_arguments_rejected() {
        let (env, launcher) = launcher(FakeEnvironment::with(&["xterm"], &[]));
        assert!(!launcher.launch(&[], &TerminalPreference::default()));
        assert!(env.tried.lock().is_empty());
    }

    #[test]
    fn test_unparsable_descriptor_skipped() {
        let mut fake = FakeEnvironment::with(&["xterm"], &[]);
        fake.vars.insert("TERMINAL".into(), "'unterminated".into());
        let (env, launcher) = launcher(fake);

        assert!(launcher.launch(&args(&["box"]), &TerminalPreference::default()));
        assert_eq!(env.spawned.lock()[0].0, PathBuf::from("/usr/bin/xterm"));
    }

    #[test]
    fn test_available_terminals() {
        let (_env, launcher) = launcher(FakeEnvironment::with(&["kitty", "xterm"], &[]));
        let ids: Vec<_> = launcher.available_terminals().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["kitty", "xterm"]);
    }
}
