//! Build command implementation.

use super::Kinds;
use anyhow::{Context, Result};
use folio_core::{BlogBuild, Config, LegalBuild, Pipeline};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// A serialized output file, relative to the output directory
#[derive(Debug)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    fn json<T: Serialize>(path: &str, value: &T) -> Result<Self> {
        let contents =
            serde_json::to_string(value).with_context(|| format!("Failed to serialize {}", path))?;
        Ok(Self {
            path: PathBuf::from(path),
            contents,
        })
    }
}

/// Build the requested kinds and write their artifacts
pub fn build_content(config_path: &Path, kinds: Kinds) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let pipeline = Pipeline::new(config);

    // Nothing touches the output directory until every kind has built
    let artifacts = assemble(&pipeline, kinds)?;

    let output_dir = pipeline.config().output_dir();
    write_artifacts(&output_dir, &artifacts)?;

    tracing::info!("✓ Wrote {} artifacts to {:?}", artifacts.len(), output_dir);
    Ok(())
}

/// Run the pipeline for each kind and serialize everything in memory
pub fn assemble(pipeline: &Pipeline, kinds: Kinds) -> Result<Vec<Artifact>> {
    let mut artifacts = Vec::new();

    if kinds.blog() {
        let build = pipeline.build_blog().context("Failed to build blog")?;
        artifacts.extend(blog_artifacts(&build)?);
    }

    if kinds.legal() {
        let build = pipeline.build_legal().context("Failed to build legal documents")?;
        artifacts.push(legal_artifact(&build)?);
    }

    Ok(artifacts)
}

fn blog_artifacts(build: &BlogBuild) -> Result<Vec<Artifact>> {
    Ok(vec![
        Artifact::json("blog/posts.json", &build.posts)?,
        Artifact::json("blog/authors.json", &build.authors)?,
        Artifact::json("blog/tags.json", &build.tags)?,
        Artifact::json("blog/search.json", &build.search)?,
        Artifact::json("blog/index.json", &build.index)?,
    ])
}

fn legal_artifact(build: &LegalBuild) -> Result<Artifact> {
    Artifact::json("legal.json", build)
}

/// Write every artifact beside its target first, then move them into place
///
/// A failed write removes the staged files and leaves existing output as it
/// was.
fn write_artifacts(output_dir: &Path, artifacts: &[Artifact]) -> Result<()> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let path = output_dir.join(&artifact.path);
        let temp = staging_path(&path);
        if let Err(err) = stage(&temp, &artifact.contents) {
            discard(&staged);
            return Err(err);
        }
        staged.push((temp, path));
    }

    for (temp, path) in &staged {
        fs::rename(temp, path).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Wrote {:?}", path);
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(temp: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = temp.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(temp, contents).with_context(|| format!("Failed to write {:?}", temp))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        if let Err(err) = fs::remove_file(temp) {
            tracing::warn!("Failed to remove staged file {:?}: {}", temp, err);
        }
    }
}
