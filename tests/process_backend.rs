#![cfg(unix)]

mod common;
use crate::common::{init_tracing, Project};

use std::error::Error;

use webapp_rebuild::errors::{RebuildError, StepKind};
use webapp_rebuild::exec::{trigger_build, BuildBackend, BuildStep, ProcessBackend};

type TestResult = Result<(), Box<dyn Error>>;

fn sh(kind: StepKind, script: &str, project: &Project) -> BuildStep {
    BuildStep::new(
        kind,
        "sh",
        vec!["-c".to_string(), script.to_string()],
        project.path("webapp"),
    )
}

#[tokio::test]
async fn step_runs_in_configured_working_dir() -> TestResult {
    init_tracing();

    let project = Project::new();
    let cwd_before = std::env::current_dir()?;

    let step = sh(StepKind::Build, "pwd > built.txt", &project);
    ProcessBackend::new().run_step(&step).await?;

    let recorded = std::fs::read_to_string(project.path("webapp/built.txt"))?;
    assert_eq!(
        std::fs::canonicalize(recorded.trim())?,
        std::fs::canonicalize(project.path("webapp"))?
    );
    assert_eq!(std::env::current_dir()?, cwd_before);

    Ok(())
}

#[tokio::test]
async fn non_zero_exit_reports_code_and_output() -> TestResult {
    init_tracing();

    let project = Project::new();
    let step = sh(
        StepKind::Install,
        "echo resolving packages; echo 'error: lockfile outdated' >&2; exit 3",
        &project,
    );

    match ProcessBackend::new().run_step(&step).await {
        Err(RebuildError::BuildStepFailed { step, code, output }) => {
            assert_eq!(step, StepKind::Install);
            assert_eq!(code, Some(3));
            assert!(output.contains("resolving packages"));
            assert!(output.contains("error: lockfile outdated"));
        }
        other => panic!("expected BuildStepFailed, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn non_utf8_output_does_not_break_a_successful_step() -> TestResult {
    init_tracing();

    let project = Project::new();
    let step = sh(
        StepKind::Build,
        "printf '\\377\\n'; sleep 0.2; i=0; while [ $i -lt 20000 ]; do echo \"chunk $i\"; i=$((i+1)); done; touch built.txt; exit 0",
        &project,
    );

    ProcessBackend::new().run_step(&step).await?;
    assert!(project.path("webapp/built.txt").exists());

    Ok(())
}

#[tokio::test]
async fn failure_output_survives_non_utf8_lines() -> TestResult {
    init_tracing();

    let project = Project::new();
    let step = sh(
        StepKind::Build,
        "printf 'bad \\377 byte\\n' >&2; echo 'after the bad line' >&2; exit 2",
        &project,
    );

    match ProcessBackend::new().run_step(&step).await {
        Err(RebuildError::BuildStepFailed { code, output, .. }) => {
            assert_eq!(code, Some(2));
            assert!(output.contains("bad \u{FFFD} byte"));
            assert!(output.contains("after the bad line"));
        }
        other => panic!("expected BuildStepFailed, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn install_failure_stops_the_sequence() -> TestResult {
    init_tracing();

    let project = Project::new();
    let steps = vec![
        sh(StepKind::Install, "exit 1", &project),
        sh(StepKind::Build, "touch built.txt", &project),
    ];

    let result = trigger_build(&mut ProcessBackend::new(), &steps).await;
    assert!(matches!(
        result,
        Err(RebuildError::BuildStepFailed {
            step: StepKind::Install,
            ..
        })
    ));
    assert!(!project.path("webapp/built.txt").exists());

    Ok(())
}

#[tokio::test]
async fn missing_program_is_tool_unavailable() -> TestResult {
    init_tracing();

    let project = Project::new();
    let step = BuildStep::new(
        StepKind::Install,
        "definitely-not-a-package-manager-4711",
        vec!["install".to_string()],
        project.path("webapp"),
    );

    match ProcessBackend::new().run_step(&step).await {
        Err(RebuildError::ToolUnavailable { tool }) => {
            assert_eq!(tool, "definitely-not-a-package-manager-4711");
        }
        other => panic!("expected ToolUnavailable, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn missing_working_dir_is_not_mistaken_for_missing_tool() -> TestResult {
    init_tracing();

    let project = Project::new();
    let step = BuildStep::new(
        StepKind::Build,
        "sh",
        vec!["-c".to_string(), "true".to_string()],
        project.path("frontend"),
    );

    assert!(matches!(
        ProcessBackend::new().run_step(&step).await,
        Err(RebuildError::ConfigError(_))
    ));

    Ok(())
}
