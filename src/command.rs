//! Synchronous driver for the `run_pd_rpc.py` control-plane tool.

use std::path::{PathBuf, MAIN_SEPARATOR};
use std::process::Command;

use crate::error::RelayError;

/// What to hand the tool: either a single string, or a pre-built
/// argument list passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// If the string starts with the path separator it is a filename,
    /// otherwise it is a snippet of control-plane code run via `--eval`.
    Code(String),
    /// Raw arguments, bypassing the no-wait/eval convention entirely.
    Args(Vec<String>),
}

impl From<&str> for CommandSpec {
    fn from(code: &str) -> Self {
        Self::Code(code.to_owned())
    }
}

impl From<String> for CommandSpec {
    fn from(code: String) -> Self {
        Self::Code(code)
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(args: Vec<String>) -> Self {
        Self::Args(args)
    }
}

/// Runs the tool to completion and captures its stdout.
///
/// Do not hand this a spec that would start the tool in interactive
/// mode; this caller never feeds it stdin and would hang forever.
#[derive(Debug, Clone)]
pub struct PdRpc {
    tool: PathBuf,
}

impl PdRpc {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Executes one invocation and returns its captured stdout with the
    /// trailing newline stripped. The strip is unconditional: the tool
    /// always terminates its output with a newline, and if it ever does
    /// not, the last real character is dropped instead.
    ///
    /// Unless `suppress_output` is set, the trimmed text is also
    /// mirrored to this process's stdout.
    pub fn run(&self, spec: &CommandSpec, suppress_output: bool) -> Result<String, RelayError> {
        let argv = self.build_argv(spec);
        tracing::debug!("running `{}`", argv.join(" "));
        let output = Command::new(&argv[0])
            .args(&argv[1..])
            .output()
            .map_err(|source| RelayError::Spawn {
                command: argv.clone(),
                source,
            })?;
        if !output.status.success() {
            let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(RelayError::Execution {
                command: argv,
                status: output.status,
                output: captured,
            });
        }
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.pop();
        if !suppress_output {
            println!("{text}");
        }
        Ok(text)
    }

    fn build_argv(&self, spec: &CommandSpec) -> Vec<String> {
        let mut argv = vec![self.tool.display().to_string()];
        match spec {
            CommandSpec::Code(code) if code.starts_with(MAIN_SEPARATOR) => {
                argv.push("--no-wait".to_owned());
                argv.push(code.clone());
            }
            CommandSpec::Code(code) => {
                argv.push("--no-wait".to_owned());
                argv.push("--eval".to_owned());
                argv.push(code.clone());
            }
            CommandSpec::Args(args) => {
                argv.extend(args.iter().cloned());
            }
        }
        argv
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::error::RelayError;

    fn rpc() -> PdRpc {
        PdRpc::new("/opt/tools/run_pd_rpc.py")
    }

    // write a stand-in tool script and make it executable
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("run_pd_rpc.py");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn filename_spec_gets_no_wait() {
        let argv = rpc().build_argv(&CommandSpec::from("/tmp/setup.py"));
        assert_eq!(
            argv,
            vec!["/opt/tools/run_pd_rpc.py", "--no-wait", "/tmp/setup.py"]
        );
    }

    #[test]
    fn code_spec_gets_no_wait_eval() {
        let argv = rpc().build_argv(&CommandSpec::from("tm.set_cpuport(128);"));
        assert_eq!(
            argv,
            vec![
                "/opt/tools/run_pd_rpc.py",
                "--no-wait",
                "--eval",
                "tm.set_cpuport(128);"
            ]
        );
    }

    #[test]
    fn args_spec_passes_through_verbatim() {
        let args = vec!["--reconnect".to_owned(), "-v".to_owned()];
        let argv = rpc().build_argv(&CommandSpec::from(args));
        assert_eq!(argv, vec!["/opt/tools/run_pd_rpc.py", "--reconnect", "-v"]);
    }

    #[test]
    fn captures_and_trims_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo result");
        let out = PdRpc::new(tool)
            .run(&CommandSpec::Args(vec![]), true)
            .unwrap();
        assert_eq!(out, "result");
    }

    #[test]
    fn eval_snippet_reaches_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), r#"echo "$@""#);
        let out = PdRpc::new(tool)
            .run(&CommandSpec::from("tm.set_cpuport(128);"), true)
            .unwrap();
        assert_eq!(out, "--no-wait --eval tm.set_cpuport(128);");
    }

    #[test]
    fn strip_is_unconditional() {
        let dir = tempfile::tempdir().unwrap();
        // printf emits no trailing newline, so the strip eats real data
        let tool = fake_tool(dir.path(), "printf result");
        let out = PdRpc::new(tool)
            .run(&CommandSpec::Args(vec![]), true)
            .unwrap();
        assert_eq!(out, "resul");
    }

    #[test]
    fn nonzero_exit_is_an_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_tool(dir.path(), "echo broken >&2\nexit 3");
        let err = PdRpc::new(tool)
            .run(&CommandSpec::Args(vec![]), true)
            .unwrap_err();
        match err {
            RelayError::Execution { status, output, .. } => {
                assert_eq!(status.code(), Some(3));
                assert!(output.contains("broken"));
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let err = PdRpc::new("/nonexistent/run_pd_rpc.py")
            .run(&CommandSpec::Args(vec![]), true)
            .unwrap_err();
        assert!(matches!(err, RelayError::Spawn { .. }));
    }
}
