//! Collecting bind inputs from directories and manifests

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use deckbind_layout::{PageImage, SourceKind};
use deckbind_merge::BindInput;

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Chunk {
    /// Value, then digit count so `01` sorts after `1`
    Number(u64, usize),
    Text(String),
}

fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut chars = name.chars().peekable();
    while let Some(&first) = chars.peek() {
        let digits = first.is_ascii_digit();
        let mut run = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_ascii_digit() != digits {
                break;
            }
            run.push(ch);
            chars.next();
        }
        if digits {
            let value = run.parse().unwrap_or(u64::MAX);
            chunks.push(Chunk::Number(value, run.len()));
        } else {
            chunks.push(Chunk::Text(run.to_lowercase()));
        }
    }
    chunks
}

/// Compare names treating digit runs as numbers: `slide2` < `slide10`
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Page images in `dir`, in natural file-name order
pub fn page_images(dir: &Path) -> Result<Vec<PageImage>> {
    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Cannot read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort_by_cached_key(|path| {
        natural_key(&path.file_name().unwrap_or_default().to_string_lossy())
    });

    Ok(files
        .into_iter()
        .enumerate()
        .map(|(i, path)| PageImage::from_path(i + 1, path))
        .collect())
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// An image-directory input titled after the directory
pub fn image_input(dir: &Path, kind: SourceKind, order: i64) -> Result<BindInput> {
    let pages = page_images(dir)?;
    Ok(BindInput::images(title_from_path(dir), order, kind, pages))
}

/// A pass-through PDF input titled after the file
pub fn document_input(path: &Path, order: i64) -> BindInput {
    BindInput::document(title_from_path(path), order, path)
}

/// Read a manifest with `order,title,kind,path` columns.
///
/// `kind` is `slides`, `pages` or `pdf`. Relative paths are resolved
/// against the manifest's directory.
pub async fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<BindInput>> {
    let path = path.as_ref().to_owned();
    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Cannot read manifest {}", path.display()))?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

    tokio::task::spawn_blocking(move || parse_manifest(&contents, &base)).await?
}

fn parse_manifest(contents: &str, base: &Path) -> Result<Vec<BindInput>> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut inputs = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        // Header is row 1
        let line = row + 2;
        if record.len() < 4 {
            bail!("Manifest row {line}: expected order,title,kind,path");
        }

        let order: i64 = record[0]
            .trim()
            .parse()
            .with_context(|| format!("Manifest row {line}: bad order '{}'", &record[0]))?;
        let title = record[1].trim().to_string();
        let target = resolve(base, record[3].trim());

        let input = match record[2].trim().to_ascii_lowercase().as_str() {
            "slides" => BindInput::images(title, order, SourceKind::Slides, page_images(&target)?),
            "pages" => BindInput::images(title, order, SourceKind::Pages, page_images(&target)?),
            "pdf" => BindInput::document(title, order, target),
            other => bail!("Manifest row {line}: unknown kind '{other}'"),
        };
        inputs.push(input);
    }

    Ok(inputs)
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() { path } else { base.join(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckbind_merge::InputContent;

    #[test]
    fn test_natural_order() {
        let mut names = vec!["slide10.png", "Slide2.png", "slide1.png", "slide02.png"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["slide1.png", "Slide2.png", "slide02.png", "slide10.png"]);
    }

    #[test]
    fn test_page_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["p10.png", "p9.PNG", "p1.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let images = page_images(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|image| image.path().unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["p1.jpg", "p9.PNG", "p10.png"]);
        assert_eq!(images[2].ordinal, 3);
    }

    #[test]
    fn test_manifest_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("deck")).unwrap();
        let manifest = "order,title,kind,path\n2,Appendix,pdf,appendix.pdf\n1,Kickoff,slides,deck\n";

        let inputs = parse_manifest(manifest, dir.path()).unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].order, 2);
        match &inputs[0].content {
            InputContent::Document(path) => assert_eq!(path, &dir.path().join("appendix.pdf")),
            _ => panic!("Expected a document input"),
        }
        assert_eq!(inputs[1].title, "Kickoff");
        assert!(!inputs[1].is_pass_through());
    }

    #[test]
    fn test_manifest_unknown_kind() {
        let manifest = "order,title,kind,path\n1,Odd,video,clip.mp4\n";
        assert!(parse_manifest(manifest, Path::new(".")).is_err());
    }
}
