//! Running script definitions through the interpreter.

use tracing::info;

use super::{inherited_env, launch_checked, ExecError, Invocation, Launcher, Result};
use crate::commands::Bindings;
use crate::config::Settings;

/// Run a script definition.
///
/// The script path is resolved against the workspace and checked before
/// anything is spawned. Bindings are passed as `--key value` pairs in
/// schema order; null values are skipped. The workspace is exported to the
/// child through the module search variable.
pub fn run_script<L: Launcher>(
    launcher: &L,
    settings: &Settings,
    path: Option<&str>,
    bindings: &Bindings,
) -> Result<()> {
    let rel_path = path
        .filter(|p| !p.is_empty())
        .ok_or(ExecError::MissingPath)?;
    let script_path = settings.workspace.join(rel_path);

    if !script_path.exists() {
        return Err(ExecError::NotFound(script_path));
    }
    if !script_path.is_file() {
        return Err(ExecError::InvalidPath(script_path));
    }

    let mut invocation = Invocation::new(&settings.interpreter).arg(&script_path);
    for (key, value) in bindings {
        if value.is_null() {
            continue;
        }
        invocation = invocation.arg(format!("--{}", key)).arg(value.to_string());
    }
    let invocation = invocation.env_map(inherited_env([(
        settings.module_path_var.as_str(),
        settings.workspace.as_os_str(),
    )]));

    info!(
        script = %script_path.display(),
        interpreter = %settings.interpreter,
        "Running script"
    );
    launch_checked(launcher, &invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::args::ArgValue;
    use crate::exec::RecordingLauncher;
    use std::ffi::{OsStr, OsString};
    use std::fs;
    use tempfile::tempdir;

    fn bindings(pairs: &[(&str, ArgValue)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_path() {
        let launcher = RecordingLauncher::succeeding();
        let settings = Settings::new("/nonexistent");

        let result = run_script(&launcher, &settings, None, &Bindings::new());
        assert!(matches!(result, Err(ExecError::MissingPath)));

        let result = run_script(&launcher, &settings, Some(""), &Bindings::new());
        assert!(matches!(result, Err(ExecError::MissingPath)));
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_script_not_found_before_spawn() {
        let temp = tempdir().unwrap();
        let launcher = RecordingLauncher::succeeding();
        let settings = Settings::new(temp.path());

        let result = run_script(&launcher, &settings, Some("missing.py"), &Bindings::new());
        match result {
            Err(ExecError::NotFound(path)) => assert_eq!(path, temp.path().join("missing.py")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_script_directory_is_invalid_path() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("tools")).unwrap();
        let launcher = RecordingLauncher::succeeding();
        let settings = Settings::new(temp.path());

        let result = run_script(&launcher, &settings, Some("tools"), &Bindings::new());
        assert!(matches!(result, Err(ExecError::InvalidPath(_))));
        assert!(launcher.calls().is_empty());
    }

    #[test]
    fn test_invocation_shape() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("build.py"), "").unwrap();
        let launcher = RecordingLauncher::succeeding();
        let settings = Settings::new(temp.path()).with_interpreter("python3.11");

        let b = bindings(&[
            ("target", ArgValue::Str("release".to_string())),
            ("jobs", ArgValue::Int(4)),
            ("skip", ArgValue::Null),
            ("ratio", ArgValue::Float(0.5)),
        ]);
        run_script(&launcher, &settings, Some("build.py"), &b).unwrap();

        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        let inv = &calls[0];
        assert_eq!(inv.program, OsString::from("python3.11"));

        let args: Vec<String> = inv
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                temp.path().join("build.py").to_string_lossy().into_owned(),
                "--target".to_string(),
                "release".to_string(),
                "--jobs".to_string(),
                "4".to_string(),
                "--ratio".to_string(),
                "0.5".to_string(),
            ]
        );

        let env = inv.env.as_ref().unwrap();
        assert_eq!(
            env.get(OsStr::new("PYTHONPATH")),
            Some(&temp.path().as_os_str().to_os_string())
        );
    }

    #[test]
    fn test_values_rendered_like_python() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("tune.py"), "").unwrap();
        let launcher = RecordingLauncher::succeeding();
        let settings = Settings::new(temp.path());

        let b = bindings(&[
            ("flag", ArgValue::Bool(true)),
            ("big", ArgValue::Float(1e20)),
            ("small", ArgValue::Float(0.00001)),
        ]);
        run_script(&launcher, &settings, Some("tune.py"), &b).unwrap();

        let calls = launcher.calls();
        let args: Vec<String> = calls[0]
            .args
            .iter()
            .skip(1)
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["--flag", "True", "--big", "1e+20", "--small", "1e-05"]
        );
    }

    #[test]
    fn test_nonzero_exit_is_execution_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("fail.py"), "").unwrap();
        let launcher = RecordingLauncher::exiting_with(7);
        let settings = Settings::new(temp.path());

        let result = run_script(&launcher, &settings, Some("fail.py"), &Bindings::new());
        assert!(matches!(
            result,
            Err(ExecError::Execution { code: Some(7), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_real_script_receives_arguments() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("check.sh"),
            "test \"$1\" = --name && test \"$2\" = bob && test -n \"$PYTHONPATH\"\n",
        )
        .unwrap();
        let settings = Settings::new(temp.path()).with_interpreter("sh");
        let b = bindings(&[("name", ArgValue::Str("bob".to_string()))]);

        run_script(&crate::exec::SystemLauncher, &settings, Some("check.sh"), &b).unwrap();
    }
}
