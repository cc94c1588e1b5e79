use anyhow::Result;
use async_trait::async_trait;
use go_scaffold::domain::ports::ToolRunner;
use go_scaffold::{
    ProjectRequest, ScaffoldEngine, ScaffoldError, Stage, TemplateConfig, TemplatePipeline,
    ToolCommand,
};
use httpmock::prelude::*;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use zip::write::{FileOptions, ZipWriter};

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    command: String,
    working_dir: Option<PathBuf>,
}

/// Records tool invocations instead of spawning git and go.
#[derive(Clone, Default)]
struct RecordingRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    fail_program: Option<String>,
}

#[async_trait]
impl ToolRunner for RecordingRunner {
    async fn run(
        &self,
        command: &ToolCommand,
        working_dir: Option<&Path>,
    ) -> go_scaffold::Result<()> {
        self.invocations.lock().await.push(Invocation {
            command: command.to_string(),
            working_dir: working_dir.map(Path::to_path_buf),
        });
        if self.fail_program.as_deref() == Some(command.program.as_str()) {
            return Err(ScaffoldError::ToolFailed {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

fn template_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.add_directory::<_, ()>("go-template-main/", FileOptions::default())
        .unwrap();
    for (name, body) in entries {
        zip.start_file::<_, ()>(format!("go-template-main/{}", name), FileOptions::default())
            .unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn config_for(server: &MockServer, workdir: &Path) -> TemplateConfig {
    let mut config = TemplateConfig::default();
    config.template.url = server.url("/ralphvw/go-template/archive/main.zip");
    config.download.archive_path = workdir.join("template.zip");
    config.project.output_dir = workdir.to_path_buf();
    config
}

#[tokio::test]
async fn test_end_to_end_scaffold_rewrites_go_mod() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let archive = template_zip(&[("go.mod", "module github.com/ralphvw/go-template")]);
    let template_mock = server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(200)
            .header("Content-Type", "application/zip")
            .body(archive);
    });

    let config = config_for(&server, temp_dir.path());
    let runner = RecordingRunner::default();
    let pipeline = TemplatePipeline::new(&config, runner.clone())?;
    let engine = ScaffoldEngine::new(pipeline);
    let request = ProjectRequest::new("demo", "example.com/demo", temp_dir.path());

    let outcome = engine.run(&request).await?;

    template_mock.assert();
    let project_dir = temp_dir.path().join("demo");
    assert_eq!(outcome.project_dir, project_dir);
    assert_eq!(
        std::fs::read_to_string(project_dir.join("go.mod"))?,
        "module example.com/demo"
    );
    assert_eq!(outcome.install.files_written, 1);
    assert_eq!(outcome.rewrite.replacements, 1);
    assert!(!temp_dir.path().join("template.zip").exists());

    let invocations = runner.invocations.lock().await.clone();
    assert_eq!(
        invocations,
        vec![
            Invocation {
                command: format!("git init {}", project_dir.display()),
                working_dir: None,
            },
            Invocation {
                command: "go mod tidy".to_string(),
                working_dir: Some(project_dir.clone()),
            },
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_nested_tree_is_extracted_and_rewritten() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let archive = template_zip(&[
        ("go.mod", "module github.com/ralphvw/go-template\n\ngo 1.21\n"),
        (
            "cmd/server/main.go",
            "package main\n\nimport \"github.com/ralphvw/go-template/internal/api\"\n",
        ),
        ("internal/api/api.go", "package api\n"),
        ("README.md", "# go-template\n"),
    ]);
    server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(200).body(archive);
    });

    let config = config_for(&server, temp_dir.path());
    let engine = ScaffoldEngine::new(TemplatePipeline::new(&config, RecordingRunner::default())?);
    let request = ProjectRequest::new("svc", "example.com/team/svc", temp_dir.path());

    let outcome = engine.run(&request).await?;

    let root = temp_dir.path().join("svc");
    let mut files: Vec<String> = walkdir_files(&root);
    files.sort();
    assert_eq!(
        files,
        vec![
            "README.md",
            "cmd/server/main.go",
            "go.mod",
            "internal/api/api.go"
        ]
    );
    assert_eq!(
        std::fs::read_to_string(root.join("cmd/server/main.go"))?,
        "package main\n\nimport \"example.com/team/svc/internal/api\"\n"
    );
    assert_eq!(std::fs::read_to_string(root.join("README.md"))?, "# go-template\n");
    assert_eq!(outcome.rewrite.files_changed, 2);

    Ok(())
}

fn walkdir_files(root: &Path) -> Vec<String> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[tokio::test]
async fn test_error_page_download_fails_at_extraction() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let template_mock = server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(404).body("Not Found");
    });

    let config = config_for(&server, temp_dir.path());
    let runner = RecordingRunner::default();
    let engine = ScaffoldEngine::new(TemplatePipeline::new(&config, runner.clone())?);
    let request = ProjectRequest::new("demo", "example.com/demo", temp_dir.path());

    let err = engine.run(&request).await.unwrap_err();

    template_mock.assert();
    assert!(matches!(
        err,
        ScaffoldError::StageFailed {
            stage: Stage::Install,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Error extracting template repository"));
    assert!(!temp_dir.path().join("demo").exists());
    assert!(!temp_dir.path().join("template.zip").exists());
    assert!(runner.invocations.lock().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unwritable_archive_path_aborts_before_extraction() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let template_mock = server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(200).body(template_zip(&[("go.mod", "module x")]));
    });

    let mut config = config_for(&server, temp_dir.path());
    config.download.archive_path = temp_dir.path().join("missing-dir").join("template.zip");
    let engine = ScaffoldEngine::new(TemplatePipeline::new(&config, RecordingRunner::default())?);
    let request = ProjectRequest::new("demo", "example.com/demo", temp_dir.path());

    let err = engine.run(&request).await.unwrap_err();

    assert!(matches!(
        err,
        ScaffoldError::StageFailed {
            stage: Stage::Fetch,
            ..
        }
    ));
    template_mock.assert_hits(0);
    assert!(!temp_dir.path().join("demo").exists());

    Ok(())
}

#[tokio::test]
async fn test_tool_failure_keeps_project_unless_cleanup_requested() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(200)
            .body(template_zip(&[("go.mod", "module github.com/ralphvw/go-template")]));
    });
    let config = config_for(&server, temp_dir.path());
    let failing_go = RecordingRunner {
        fail_program: Some("go".to_string()),
        ..RecordingRunner::default()
    };

    let kept = ProjectRequest::new("kept", "example.com/kept", temp_dir.path());
    let engine = ScaffoldEngine::new(TemplatePipeline::new(&config, failing_go.clone())?);
    let err = engine.run(&kept).await.unwrap_err();
    assert!(matches!(
        err,
        ScaffoldError::StageFailed {
            stage: Stage::ResolveDependencies,
            ..
        }
    ));
    assert!(kept.project_dir.join("go.mod").exists());

    let removed = ProjectRequest::new("removed", "example.com/removed", temp_dir.path());
    let engine = ScaffoldEngine::new(TemplatePipeline::new(&config, failing_go)?)
        .with_cleanup_on_failure(true);
    assert!(engine.run(&removed).await.is_err());
    assert!(!removed.project_dir.exists());
    assert!(!temp_dir.path().join("template.zip").exists());

    Ok(())
}

#[tokio::test]
async fn test_renamed_branch_needs_detected_prefix() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file::<_, ()>("go-template-develop/go.mod", FileOptions::default())?;
    zip.write_all(b"module github.com/ralphvw/go-template")?;
    let archive = zip.finish()?.into_inner();
    server.mock(|when, then| {
        when.method(GET).path("/ralphvw/go-template/archive/main.zip");
        then.status(200).body(archive);
    });

    let mut config = config_for(&server, temp_dir.path());
    let literal = ScaffoldEngine::new(TemplatePipeline::new(&config, RecordingRunner::default())?);
    let err = literal
        .run(&ProjectRequest::new("strict", "example.com/strict", temp_dir.path()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("root prefix 'go-template-main'"));

    config.template.root_prefix = "auto".to_string();
    let detecting =
        ScaffoldEngine::new(TemplatePipeline::new(&config, RecordingRunner::default())?);
    detecting
        .run(&ProjectRequest::new("auto", "example.com/auto", temp_dir.path()))
        .await?;
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("auto/go.mod"))?,
        "module example.com/auto"
    );

    Ok(())
}
