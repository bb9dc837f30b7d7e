//! Validate content and report what a build would produce.

use super::Kinds;
use anyhow::{Context, Result};
use folio_core::{Config, Pipeline, PipelineError};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize, Default)]
struct CheckSummary {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    blog: Option<BlogSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CheckFailure>,
}

#[derive(Serialize)]
struct BlogSummary {
    posts: usize,
    authors: usize,
    tags: usize,
}

#[derive(Serialize)]
struct CheckFailure {
    file: Option<String>,
    message: String,
}

/// Run the pipeline without writing output and summarize the result.
pub fn check_content(config_path: &Path, kinds: Kinds, json: bool) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let pipeline = Pipeline::new(config);

    let mut summary = CheckSummary::default();
    let outcome = run_checks(&pipeline, kinds, &mut summary);

    if let Err(err) = &outcome {
        summary.error = Some(CheckFailure {
            file: err.file().map(str::to_string),
            message: err.to_string(),
        });
    }
    summary.ok = outcome.is_ok();

    if json {
        let payload = serde_json::to_string_pretty(&summary)?;
        println!("{}", payload);
    } else if summary.ok {
        let mut parts = Vec::new();
        if let Some(blog) = &summary.blog {
            parts.push(format!(
                "{} posts, {} authors, {} tags",
                blog.posts, blog.authors, blog.tags
            ));
        }
        if let Some(legal) = summary.legal {
            parts.push(format!("{} legal documents", legal));
        }
        println!("Check passed: {}", parts.join("; "));
    }

    outcome.context("Content check failed")
}

fn run_checks(
    pipeline: &Pipeline,
    kinds: Kinds,
    summary: &mut CheckSummary,
) -> Result<(), PipelineError> {
    if kinds.blog() {
        let build = pipeline.build_blog()?;
        summary.blog = Some(BlogSummary {
            posts: build.posts.len(),
            authors: build.authors.len(),
            tags: build.tags.len(),
        });
    }

    if kinds.legal() {
        let build = pipeline.build_legal()?;
        summary.legal = Some(build.documents.len());
    }

    Ok(())
}
