
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};


const HELPER_NAME : &str = "deskshift-scheduler";
const HELPER_WAIT : Duration = Duration::from_secs (20);
const POLL_STEP   : Duration = Duration::from_millis (50);


# [ derive (Debug, Clone, Copy, PartialEq, Eq) ]
pub enum SchedulerVerb { Register, Unregister, Start, Stop, Restart, HasTask, IsRunning }

impl SchedulerVerb {
    fn as_arg (self) -> &'static str {
        use SchedulerVerb::*;
        match self {
            Register => "register", Unregister => "unregister", Start => "start",
            Stop => "stop", Restart => "restart", HasTask => "hastask", IsRunning => "isrunning",
        }
    }
}


# [ derive (Debug, thiserror::Error) ]
pub enum SchedulerError {
    #[error ("could not launch scheduler helper: {0}")]
    Spawn (#[from] std::io::Error),
    #[error ("scheduler helper denied permission (needs elevation)")]
    PermissionDenied,
    #[error ("scheduler helper failed with code {0}")]
    Helper (i32),
    #[error ("scheduler helper did not exit within {0:?}")]
    Timeout (Duration),
}


/// Drives the privileged helper process that manages the run-at-startup scheduled
/// task. The helper takes a verb and the app path and talks back purely through its
/// exit code (0 ok, -1 permission denied, anything else a platform error code), so a
/// hung helper gets a bounded wait and then a kill.
pub struct StartupScheduler {
    app_path    : PathBuf,
    helper_path : PathBuf,
    wait        : Duration,
}

impl StartupScheduler {

    pub fn new (app_path: PathBuf) -> StartupScheduler {
        let helper_path = app_path.parent() .unwrap_or (Path::new(".")) .join (format! ("{}.exe", HELPER_NAME));
        StartupScheduler { app_path, helper_path, wait: HELPER_WAIT }
    }

    pub fn for_current_exe () -> Result <StartupScheduler, SchedulerError> {
        Ok ( StartupScheduler::new (std::env::current_exe()?) )
    }

    pub fn register   (&self) -> Result<(), SchedulerError> { self.run (SchedulerVerb::Register) }
    pub fn unregister (&self) -> Result<(), SchedulerError> { self.run (SchedulerVerb::Unregister) }
    pub fn start      (&self) -> Result<(), SchedulerError> { self.run (SchedulerVerb::Start) }
    pub fn stop       (&self) -> Result<(), SchedulerError> { self.run (SchedulerVerb::Stop) }
    pub fn restart    (&self) -> Result<(), SchedulerError> { self.run (SchedulerVerb::Restart) }

    /// queries never error .. an unreachable or hung helper just reads as "no"
    pub fn has_task   (&self) -> bool { self.query (SchedulerVerb::HasTask) }
    pub fn is_running (&self) -> bool { self.query (SchedulerVerb::IsRunning) }

    fn run (&self, verb: SchedulerVerb) -> Result<(), SchedulerError> {
        match self.exit_code (verb)? {
            0  => Ok(()),
            -1 => Err (SchedulerError::PermissionDenied),
            c  => Err (SchedulerError::Helper (c)),
        }
    }

    fn query (&self, verb: SchedulerVerb) -> bool {
        match self.exit_code (verb) {
            Ok (c) => c != 0,
            Err (e) => { log::debug! ("scheduler query {:?} failed: {}", verb, e); false }
        }
    }

    fn exit_code (&self, verb: SchedulerVerb) -> Result <i32, SchedulerError> {
        log::info! ("scheduler helper: {} {:?}", verb.as_arg(), self.app_path);
        let mut child = Command::new (&self.helper_path)
            .arg (verb.as_arg()) .arg (&self.app_path)
            .spawn()?;
        let deadline = Instant::now() + self.wait;
        loop {
            if let Some (status) = child.try_wait()? {
                return Ok (status.code().unwrap_or(-1))
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err (SchedulerError::Timeout (self.wait))
            }
            std::thread::sleep (POLL_STEP);
        }
    }

}




#[cfg (all (test, unix))]
mod test {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use super::*;

    // stands a shell script in for the helper binary
    fn scheduler_with_helper (script: &str, wait: Duration) -> (StartupScheduler, std::path::PathBuf) {
        let dir = std::env::temp_dir().join (format! ("deskshift-sched-{}-{:?}", std::process::id(), std::thread::current().id()));
        fs::create_dir_all (&dir).unwrap();
        let helper = dir.join (format! ("{}.exe", HELPER_NAME));
        fs::write (&helper, format! ("#!/bin/sh\n{}\n", script)).unwrap();
        fs::set_permissions (&helper, fs::Permissions::from_mode (0o755)).unwrap();
        let mut sched = StartupScheduler::new (dir.join ("app.exe"));
        sched.wait = wait;
        (sched, dir)
    }

    #[test]
    fn exit_codes_map_to_outcomes () {
        let (sched, dir) = scheduler_with_helper ("case \"$1\" in register) exit 0;; *) exit 5;; esac", HELPER_WAIT);
        assert! (sched.register().is_ok());
        match sched.restart() { Err (SchedulerError::Helper (5)) => {}, other => panic! ("{:?}", other.err()) }
        let _ = fs::remove_dir_all (&dir);
    }

    #[test]
    fn queries_read_nonzero_as_yes_and_failure_as_no () {
        let (sched, dir) = scheduler_with_helper ("case \"$1\" in hastask) exit 1;; *) exit 0;; esac", HELPER_WAIT);
        assert! (sched.has_task());
        assert! (! sched.is_running());
        let _ = fs::remove_dir_all (&dir);

        let missing = StartupScheduler::new (PathBuf::from ("/nonexistent/app.exe"));
        assert! (! missing.has_task());
    }

    #[test]
    fn hung_helper_is_killed_after_the_bounded_wait () {
        let (sched, dir) = scheduler_with_helper ("sleep 30", Duration::from_millis (200));
        let started = Instant::now();
        match sched.register() { Err (SchedulerError::Timeout (_)) => {}, other => panic! ("{:?}", other.err()) }
        assert! (started.elapsed() < Duration::from_secs (5));
        let _ = fs::remove_dir_all (&dir);
    }

}
