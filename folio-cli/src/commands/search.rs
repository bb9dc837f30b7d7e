//! Search command implementation
use anyhow::{bail, Context, Result};
use folio_core::{Config, SearchEntry, SearchHit, SearchIndex};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub limit: Option<usize>,
    pub json: bool,
}

#[derive(Serialize)]
struct SearchResult<'a> {
    slug: &'a str,
    title: &'a str,
    preview: &'a str,
    score: f64,
    matched: &'a [String],
}

/// Search the built blog index
pub fn search_content(config_path: &Path, query: &str, args: SearchArgs) -> Result<()> {
    let config = Config::load_or_default(config_path).context("Failed to load configuration")?;
    let blog_dir = config.output_dir().join("blog");
    let index_path = blog_dir.join("index.json");

    if !index_path.exists() {
        bail!(
            "Search index not found at {:?}. Run `folio build` first.",
            index_path
        );
    }

    let index_json = fs::read_to_string(&index_path).context("Failed to read search index")?;
    let index = SearchIndex::from_json(&index_json).context("Failed to load search index")?;

    let entries_json =
        fs::read_to_string(blog_dir.join("search.json")).context("Failed to read search.json")?;
    let entries: Vec<SearchEntry> =
        serde_json::from_str(&entries_json).context("Failed to parse search.json")?;

    let mut opts = config.search_options();
    if let Some(limit) = args.limit {
        opts.limit = limit;
    }

    let hits = index.search(query, &opts);
    let results: Vec<SearchResult> = hits
        .iter()
        .filter_map(|hit| result_for(hit, &entries))
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&results)?;
        println!("{json}");
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found for '{}'", query);
        return Ok(());
    }

    println!("Found {} results for '{}':\n", results.len(), query);
    for result in &results {
        println!("[{:.2}] {}", result.score, result.title);
        println!("  {}", result.slug);
        println!("  {}", result.preview);
        println!();
    }

    Ok(())
}

fn result_for<'a>(hit: &'a SearchHit, entries: &'a [SearchEntry]) -> Option<SearchResult<'a>> {
    let Some(entry) = entries.get(hit.position) else {
        tracing::warn!("Index refers to missing entry {} ({})", hit.position, hit.slug);
        return None;
    };

    Some(SearchResult {
        slug: &hit.slug,
        title: &entry.title,
        preview: &entry.preview,
        score: hit.score,
        matched: &hit.matched,
    })
}
