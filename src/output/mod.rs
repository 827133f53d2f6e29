mod templates;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::{BundleOutput, ModuleRecord};

/// Title used when no package specifier was given
pub const DEFAULT_TITLE: &str = "unnamed package";

/// Name prefix of scratch directories created by [`write_scratch`]
pub const SCRATCH_PREFIX: &str = "elm-postiche-";

/// What a writer put on disk
#[derive(Debug)]
pub struct WriteReport {
    pub dir: PathBuf,
    pub created_dir: bool,
    pub modules_written: usize,
}

/// `--spec` as given, even when empty; the default only when it was omitted
pub fn page_title(spec: Option<&str>) -> &str {
    spec.unwrap_or(DEFAULT_TITLE)
}

/// Write `index.html`, `README.md` and one Markdown file per module into `dir`.
///
/// Not transactional: a failure partway through leaves the files written so far.
pub fn write_site(bundle: &BundleOutput, dir: &Path, title: &str) -> Result<WriteReport> {
    check_slugs(bundle)?;
    let created_dir = ensure_dir(dir)?;

    write_file(&dir.join("index.html"), &templates::render_index(title)?)?;
    write_file(&dir.join("README.md"), &templates::render_readme(title, bundle)?)?;
    let modules_written = write_modules(bundle, dir)?;

    info!("Wrote {} modules to {}", modules_written, dir.display());
    Ok(WriteReport {
        dir: dir.to_path_buf(),
        created_dir,
        modules_written,
    })
}

/// Write the module files into a fresh `<base>/elm-postiche-XXXXXX` directory
pub fn write_scratch(bundle: &BundleOutput, base: &Path) -> Result<WriteReport> {
    check_slugs(bundle)?;
    ensure_dir(base)?;

    let dir = tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir_in(base)
        .with_context(|| format!("Failed to create a scratch directory in {}", base.display()))?
        .keep();

    let modules_written = write_modules(bundle, &dir)?;

    info!("Wrote {} modules to {}", modules_written, dir.display());
    Ok(WriteReport {
        dir,
        created_dir: true,
        modules_written,
    })
}

fn write_modules(bundle: &BundleOutput, dir: &Path) -> Result<usize> {
    for module in &bundle.bundle {
        write_file(&dir.join(module.file_name()), &module.markdown)?;
    }
    Ok(bundle.len())
}

/// Create `dir` if it is missing (parent must exist); returns whether it was created
fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.exists() {
        return Ok(false);
    }

    fs::create_dir(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    debug!("Created {}", dir.display());
    Ok(true)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

// Slugs come from the engine and must stay inside the output directory
fn check_slugs(bundle: &BundleOutput) -> Result<()> {
    for module in &bundle.bundle {
        if !is_plain_slug(module) {
            anyhow::bail!(
                "Refusing to write module {}: slug {:?} is not a plain file name",
                module.fqn,
                module.slug
            );
        }
    }
    Ok(())
}

fn is_plain_slug(module: &ModuleRecord) -> bool {
    let slug = module.slug.as_str();
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(fqn: &str, slug: &str, markdown: &str) -> ModuleRecord {
        ModuleRecord {
            fqn: fqn.into(),
            slug: slug.into(),
            markdown: markdown.into(),
        }
    }

    fn bundle(records: Vec<ModuleRecord>) -> BundleOutput {
        BundleOutput {
            name: None,
            bundle: records,
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(Some("elm/core")), "elm/core");
        assert_eq!(page_title(Some("")), "");
        assert_eq!(page_title(Some("  ")), "  ");
        assert_eq!(page_title(None), DEFAULT_TITLE);
    }

    #[test]
    fn test_write_site_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let docs = bundle(vec![
            record("Json.Decode", "json-decode", "# Json.Decode"),
            record("Json.Encode", "json-encode", "# Json.Encode"),
        ]);

        let report = write_site(&docs, &out, "elm/json").unwrap();

        assert!(report.created_dir);
        assert_eq!(report.modules_written, 2);
        assert_eq!(
            file_names(&out),
            vec!["README.md", "index.html", "json-decode.md", "json-encode.md"]
        );
        assert_eq!(
            fs::read_to_string(out.join("json-decode.md")).unwrap(),
            "# Json.Decode"
        );
        let readme = fs::read_to_string(out.join("README.md")).unwrap();
        assert!(readme.starts_with("# elm/json"));
        assert!(readme.contains("(json-encode.md)"));
    }

    #[test]
    fn test_write_site_reuses_existing_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep.txt"), "x").unwrap();

        let report = write_site(&bundle(vec![record("A", "a", "# A")]), temp.path(), "t").unwrap();

        assert!(!report.created_dir);
        assert!(temp.path().join("keep.txt").exists());
        assert!(temp.path().join("a.md").exists());
    }

    #[test]
    fn test_write_site_does_not_create_parents() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("missing").join("out");
        assert!(write_site(&bundle(vec![]), &out, "t").is_err());
        assert!(!temp.path().join("missing").exists());
    }

    #[test]
    fn test_duplicate_slugs_last_write_wins() {
        let temp = TempDir::new().unwrap();
        let docs = bundle(vec![record("A", "a", "first"), record("A2", "a", "second")]);

        write_site(&docs, temp.path(), "t").unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("a.md")).unwrap(), "second");
    }

    #[test]
    fn test_unsafe_slug_is_rejected() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        for slug in ["", ".", "..", "../escape", "nested/path", "back\\slash"] {
            let docs = bundle(vec![record("A", "a", "# A"), record("Evil", slug, "x")]);
            let err = write_site(&docs, &out, "t").unwrap_err();
            assert!(err.to_string().contains("not a plain file name"));
        }
        assert!(!out.exists());
        assert!(!temp.path().join("escape.md").exists());
    }

    #[test]
    fn test_write_scratch() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("output");
        let docs = bundle(vec![record("A", "a", "# A"), record("B", "b", "# B")]);

        let first = write_scratch(&docs, &base).unwrap();
        let second = write_scratch(&docs, &base).unwrap();

        assert_ne!(first.dir, second.dir);
        assert!(first.dir.starts_with(&base));
        let name = first.dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(SCRATCH_PREFIX));
        assert_eq!(file_names(&first.dir), vec!["a.md", "b.md"]);
        assert_eq!(fs::read_to_string(first.dir.join("b.md")).unwrap(), "# B");
    }
}
