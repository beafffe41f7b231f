use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;
use uuid::Uuid;

/// Test harness for running CLI commands with temporary databases
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
    user: Uuid,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database and user
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self {
            temp_dir,
            db_path,
            user: Uuid::now_v7(),
        }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = self.command_without_user();
        cmd.env("RIDEPOOL_USER", self.user.to_string());
        cmd
    }

    /// Same environment but with no requester identity configured
    pub fn command_without_user(&self) -> Command {
        let mut cmd = Command::cargo_bin("ridepool").expect("Failed to find ridepool binary");
        cmd.env("RIDEPOOL_DATABASE_PATH", &self.db_path);
        cmd.env_remove("RIDEPOOL_USER");
        // Run inside the temp dir so a developer's ridepool.toml is not
        // picked up
        cmd.current_dir(self.temp_dir.path());
        cmd
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Posts a weekly series and returns the first occurrence's id
    pub fn post_weekly_series(&self, count: u32) -> String {
        let output = self
            .command()
            .args([
                "post",
                "Oakland",
                "Sacramento",
                "--date",
                "2099-02-01",
                "--time",
                "07:30",
                "--every",
                "weekly",
                "--count",
                &count.to_string(),
            ])
            .output()
            .expect("Failed to run post");
        assert!(output.status.success(), "post failed: {output:?}");
        extract_ride_id(&output.stdout)
    }
}

/// Finds the first full UUID in command output, skipping any ANSI styling
pub fn extract_ride_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    for token in text.split(|c: char| !(c.is_ascii_hexdigit() || c == '-')) {
        if token.len() == 36 && token.chars().filter(|&c| c == '-').count() == 4 {
            return token.to_string();
        }
    }
    panic!("no ride id found in output: {text}");
}
