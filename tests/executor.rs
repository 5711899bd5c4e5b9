use goname::core::{ExecutorError, RenameExecutor, RenameTarget, RenameTargets, RenameTool};
use std::cell::RefCell;

struct StubTool {
    available: bool,
    fail_on: Option<String>,
    calls: RefCell<Vec<(String, String)>>,
}

impl StubTool {
    fn new() -> Self {
        Self {
            available: true,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn missing() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    fn failing_on(to: &str) -> Self {
        Self {
            fail_on: Some(to.to_string()),
            ..Self::new()
        }
    }

    fn renamed(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(_, to)| to.clone()).collect()
    }
}

impl RenameTool for StubTool {
    fn name(&self) -> &str {
        "gorename"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), String> {
        self.calls
            .borrow_mut()
            .push((from.to_string(), to.to_string()));
        match &self.fail_on {
            Some(failing) if failing == to => Err("exit status: 1".to_string()),
            _ => Ok(()),
        }
    }
}

fn five_targets() -> RenameTargets {
    ["ONE_X", "TWO_X", "THREE_X", "FOUR_X", "FIVE_X"]
        .into_iter()
        .map(|name| RenameTarget::new("example.com/p", name, goname::core::rename(name)))
        .collect()
}

#[test]
fn list_writes_tab_separated_lines_in_order() {
    let targets = five_targets();
    let mut out = Vec::new();

    RenameExecutor::new().list(&targets, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "\"example.com/p\".ONE_X\tOneX\n\
         \"example.com/p\".TWO_X\tTwoX\n\
         \"example.com/p\".THREE_X\tThreeX\n\
         \"example.com/p\".FOUR_X\tFourX\n\
         \"example.com/p\".FIVE_X\tFiveX\n"
    );
}

#[test]
fn list_of_empty_targets_writes_nothing() {
    let mut out = Vec::new();
    RenameExecutor::new()
        .list(&RenameTargets::new(), &mut out)
        .unwrap();
    assert!(out.is_empty());
}

#[test]
fn apply_renames_every_target_in_order() {
    let tool = StubTool::new();

    let applied = RenameExecutor::new()
        .apply(&tool, &five_targets())
        .unwrap();

    assert_eq!(applied, 5);
    assert_eq!(
        tool.renamed(),
        vec!["OneX", "TwoX", "ThreeX", "FourX", "FiveX"]
    );
    assert_eq!(tool.calls.borrow()[0].0, "\"example.com/p\".ONE_X");
}

#[test]
fn apply_fails_before_any_target_when_tool_is_missing() {
    let tool = StubTool::missing();

    let err = RenameExecutor::new()
        .apply(&tool, &five_targets())
        .unwrap_err();

    assert!(matches!(err, ExecutorError::ToolMissing { .. }));
    assert!(err.to_string().contains("gorename not found in $PATH"));
    assert!(err
        .to_string()
        .contains("go install golang.org/x/tools/cmd/gorename"));
    assert!(tool.calls.borrow().is_empty());
}

#[test]
fn apply_stops_at_first_failure() {
    let tool = StubTool::failing_on("ThreeX");

    let err = RenameExecutor::new()
        .with_verbose(true)
        .apply(&tool, &five_targets())
        .unwrap_err();

    match &err {
        ExecutorError::RenameFailed {
            index,
            from,
            to,
            reason,
        } => {
            assert_eq!(*index, 2);
            assert_eq!(from, "\"example.com/p\".THREE_X");
            assert_eq!(to, "ThreeX");
            assert_eq!(reason, "exit status: 1");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "error replacing '\"example.com/p\".THREE_X': exit status: 1"
    );
    assert_eq!(tool.renamed(), vec!["OneX", "TwoX", "ThreeX"]);
}

#[test]
fn apply_with_no_targets_still_requires_the_tool() {
    let err = RenameExecutor::new()
        .apply(&StubTool::missing(), &RenameTargets::new())
        .unwrap_err();
    assert!(matches!(err, ExecutorError::ToolMissing { .. }));

    let applied = RenameExecutor::new()
        .apply(&StubTool::new(), &RenameTargets::new())
        .unwrap();
    assert_eq!(applied, 0);
}

#[cfg(unix)]
mod gorename_process {
    use super::five_targets;
    use goname::core::executor::find_on_path;
    use goname::core::{ExecutorError, Gorename, RenameExecutor, RenameTool};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&path, permissions).unwrap();
        path
    }

    #[test]
    fn gorename_passes_from_and_to_flags() {
        let dir = tempfile::TempDir::new().unwrap();
        let log = dir.path().join("calls.log");
        let program = script(
            dir.path(),
            "fake-gorename",
            &format!("echo \"$@\" >> '{}'", log.display()),
        );

        let tool = Gorename::with_program(&program);
        assert!(tool.is_available());
        tool.rename("\"example.com/p\".MAX_SIZE", "MaxSize").unwrap();

        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls, "-from \"example.com/p\".MAX_SIZE -to MaxSize\n");
    }

    #[test]
    fn gorename_failure_surfaces_stderr() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = script(
            dir.path(),
            "fake-gorename",
            "echo 'rename conflicts with existing MaxSize' >&2\nexit 1",
        );

        let err = RenameExecutor::new()
            .apply(&Gorename::with_program(&program), &five_targets())
            .unwrap_err();

        match err {
            ExecutorError::RenameFailed { index, reason, .. } => {
                assert_eq!(index, 0);
                assert_eq!(reason, "rename conflicts with existing MaxSize");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn gorename_missing_program_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let program = dir.path().join("no-such-gorename");
        let tool = Gorename::with_program(&program);
        assert!(!tool.is_available());
        assert!(!tool.searches_path());

        let err = RenameExecutor::new()
            .apply(&tool, &five_targets())
            .unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::ToolMissing {
                searched_path: false,
                ..
            }
        ));
        let message = err.to_string();
        assert!(message.starts_with(&format!("{} not found.", program.display())), "{message}");
        assert!(!message.contains("$PATH"), "{message}");
    }

    #[test]
    fn gorename_bare_name_is_looked_up_on_path() {
        let tool = Gorename::with_program("goname-test-no-such-tool");
        assert!(tool.searches_path());
        assert!(!tool.is_available());

        let err = RenameExecutor::new()
            .apply(&tool, &five_targets())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "goname-test-no-such-tool not found in $PATH. \
             Run 'go install golang.org/x/tools/cmd/gorename@latest' to install."
        );
    }

    #[test]
    fn find_on_path_requires_executable_bit() {
        let dir = tempfile::TempDir::new().unwrap();
        script(dir.path(), "gorename", "exit 0");
        fs::write(dir.path().join("plain"), "not executable").unwrap();

        let path_var = Some(dir.path().as_os_str().to_os_string());
        assert_eq!(
            find_on_path("gorename".as_ref(), path_var.clone()),
            Some(dir.path().join("gorename"))
        );
        assert_eq!(find_on_path("plain".as_ref(), path_var), None);
        assert_eq!(find_on_path("gorename".as_ref(), None), None);
    }
}
