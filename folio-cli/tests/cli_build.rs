use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_post(dir: &Path, file: &str, title: &str, slug: &str, preview: &str, date: &str) {
    let tags = if slug.contains("results") {
        "tags: [Announcement, Update]\n"
    } else {
        ""
    };
    fs::write(
        dir.join("blog").join(file),
        format!(
            "---\ntitle: {title}\nslug: {slug}\npreview: {preview}\npublished_at: {date}\nauthors:\n  - osu_user_id: 2\n    osu_username: peppy\n{tags}---\n\nBody text.\n"
        ),
    )
    .unwrap();
}

fn site() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("blog")).unwrap();
    fs::create_dir_all(dir.path().join("legal")).unwrap();

    write_post(
        dir.path(),
        "2024-01-digest.md",
        "Weekly digest",
        "weekly-digest",
        "Notes about the tournament season",
        "2024-01-05",
    );
    write_post(
        dir.path(),
        "2024-02-results.md",
        "Tournament results",
        "tournament-results",
        "Everything from the finals",
        "2024-02-10",
    );
    write_post(
        dir.path(),
        "2024-03-lazer.md",
        "Lazer update",
        "lazer-update",
        "New features in the client",
        "2024-03-15T12:00:00Z",
    );

    fs::write(
        dir.path().join("legal").join("privacy.md"),
        "---\ntitle: Privacy Policy\nslug: privacy\n---\n\nWe keep little.\n",
    )
    .unwrap();

    dir
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[allow(deprecated)]
fn folio(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn build_writes_all_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    folio(dir.path()).arg("build").assert().success();

    let blog = dir.path().join(".dist").join("blog");
    let posts = read_json(&blog.join("posts.json"));
    let posts = posts.as_array().expect("posts array");
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["slug"], "weekly-digest");
    assert_eq!(posts[0]["authors"], serde_json::json!(["2"]));
    assert_eq!(posts[0]["tags"], serde_json::json!([]));
    assert_eq!(posts[1]["tags"], serde_json::json!(["1", "2"]));
    assert_eq!(posts[2]["published_at"], "2024-03-15");

    let authors = read_json(&blog.join("authors.json"));
    assert_eq!(authors, serde_json::json!({ "2": "peppy" }));

    let tags = read_json(&blog.join("tags.json"));
    assert_eq!(tags["1"]["name"], "Announcement");
    assert_eq!(tags["2"]["slug"], "update");

    let search = read_json(&blog.join("search.json"));
    assert_eq!(search[1]["title"], "Tournament results");

    let index = read_json(&blog.join("index.json"));
    assert_eq!(index["version"], 1);

    let legal = read_json(&dir.path().join(".dist").join("legal.json"));
    assert_eq!(legal["documents"][0]["slug"], "privacy");
    assert_eq!(legal["tags"].as_array().map(Vec::len), Some(4));

    Ok(())
}

#[test]
fn build_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    let blog = dir.path().join(".dist").join("blog");

    folio(dir.path()).arg("build").assert().success();
    let first: Vec<String> = ["posts", "authors", "tags", "search", "index"]
        .iter()
        .map(|name| fs::read_to_string(blog.join(format!("{name}.json"))).unwrap())
        .collect();

    folio(dir.path()).arg("build").assert().success();
    let second: Vec<String> = ["posts", "authors", "tags", "search", "index"]
        .iter()
        .map(|name| fs::read_to_string(blog.join(format!("{name}.json"))).unwrap())
        .collect();

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn invalid_post_fails_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    write_post(
        dir.path(),
        "2024-04-broken.md",
        "Broken",
        "broken",
        "Has a bad date",
        "sometime soon",
    );

    folio(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2024-04-broken.md"))
        .stderr(predicate::str::contains("published_at"));

    assert!(!dir.path().join(".dist").exists());
    Ok(())
}

#[test]
fn invalid_legal_document_blocks_blog_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    fs::write(
        dir.path().join("legal").join("terms.md"),
        "---\ntitle: Terms\nslug: Terms Of Service\n---\n",
    )?;

    folio(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("terms.md"));

    assert!(!dir.path().join(".dist").exists());
    Ok(())
}

#[test]
fn failed_write_leaves_no_partial_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    let blog = dir.path().join(".dist").join("blog");
    // A directory where the index would be staged makes that write fail
    fs::create_dir_all(blog.join("index.json.tmp"))?;

    folio(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("index.json.tmp"));

    for name in ["posts", "authors", "tags", "search", "index"] {
        assert!(!blog.join(format!("{name}.json")).exists());
        assert!(!blog.join(format!("{name}.json.tmp")).is_file());
    }
    assert!(!dir.path().join(".dist").join("legal.json").exists());
    Ok(())
}

#[test]
fn build_single_kind_with_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();
    fs::write(
        dir.path().join("folio.yml"),
        "paths:\n  output: public/data\nblog:\n  date_format: timestamp\n",
    )?;

    folio(dir.path())
        .args(["build", "--kind", "blog"])
        .assert()
        .success();

    let out = dir.path().join("public").join("data");
    let posts = read_json(&out.join("blog").join("posts.json"));
    assert_eq!(posts[0]["published_at"], "2024-01-05T00:00:00.000Z");
    assert!(!out.join("legal.json").exists());
    Ok(())
}

#[test]
fn check_reports_counts_and_failures() -> Result<(), Box<dyn std::error::Error>> {
    let dir = site();

    folio(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 posts, 1 authors, 2 tags"));
    assert!(!dir.path().join(".dist").exists());

    fs::copy(
        dir.path().join("blog").join("2024-01-digest.md"),
        dir.path().join("blog").join("2024-05-copy.md"),
    )?;

    let assert = folio(dir.path())
        .args(["check", "--kind", "blog", "--json"])
        .assert()
        .failure();
    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["ok"], false);
    assert_eq!(value["error"]["file"], "2024-05-copy.md");
    assert!(value["error"]["message"]
        .as_str()
        .expect("message")
        .contains("weekly-digest"));
    Ok(())
}
