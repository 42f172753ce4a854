//! Review prompt loading and request rendering
//!
//! A prompt is a plain text file (.md or .txt) whose content becomes the
//! review instructions sent to the completion endpoint. The file name,
//! minus its extension and a trailing `.review` qualifier, names the
//! review and appears verbatim inside the provenance marker.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// System message sent with every completion request. The user message
/// carries the review instructions, a `---` separator, and the file body.
pub const FIXED_INSTRUCTIONS: &str = "You are a code transformation assistant. \
The user message contains review instructions, a `---` separator on its own line, \
and the complete content of one source file. Apply the instructions to the file \
and reply with the complete transformed file in exactly one fenced code block. \
Do not write any text before or after the block, and do not omit or abbreviate \
any part of the file.";

/// A loaded review prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Review name derived from the file name; appears in markers.
    pub name: String,
    pub path: PathBuf,
    /// Instruction text with trailing whitespace trimmed.
    pub body: String,
}

/// The two message bodies of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Derives the review name from a prompt file name: the extension is
/// dropped, then a trailing `.review` qualifier if present. Interior dots
/// survive, so `a.b.c.review.md` names the review `a.b.c`.
pub fn derive_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.strip_suffix(".review")
        .filter(|s| !s.is_empty())
        .unwrap_or(stem)
        .to_string()
}

/// Reads a prompt file from disk.
pub fn load_prompt(path: &Path) -> Result<Prompt> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read prompt file {}", path.display()))?;
    let body = raw.trim_end().to_string();
    if body.is_empty() {
        bail!("prompt file {} is empty", path.display());
    }
    let name = derive_name(path);
    if name.is_empty() {
        bail!("cannot derive a review name from {}", path.display());
    }
    Ok(Prompt {
        name,
        path: path.to_path_buf(),
        body,
    })
}

/// Collects every .md and .txt prompt under `dir`, sorted by name.
/// Files that fail to load (unreadable, empty) are skipped with a warning.
pub fn discover_prompts(dir: &Path) -> Result<Vec<Prompt>> {
    if !dir.is_dir() {
        bail!("prompts directory {} does not exist", dir.display());
    }
    let mut prompts = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).follow_links(false) {
        let entry = entry
            .with_context(|| format!("failed to walk prompts directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.path().extension().and_then(|e| e.to_str()) {
            Some("md") | Some("txt") => match load_prompt(entry.path()) {
                Ok(prompt) => prompts.push(prompt),
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), error = %err, "skipping unloadable prompt file");
                }
            },
            _ => continue,
        }
    }
    prompts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(prompts)
}

/// Resolves a prompt argument: a path to an existing file wins, otherwise
/// the name is looked up in the prompts directory, trying the bare name
/// and the conventional extensions in order.
pub fn resolve_prompt(spec: &str, prompts_dir: &Path) -> Result<Prompt> {
    let direct = Path::new(spec);
    if direct.is_file() {
        return load_prompt(direct);
    }

    let candidates = [
        prompts_dir.join(spec),
        prompts_dir.join(format!("{spec}.md")),
        prompts_dir.join(format!("{spec}.txt")),
        prompts_dir.join(format!("{spec}.review.md")),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            return load_prompt(candidate);
        }
    }

    match discover_prompts(prompts_dir) {
        Ok(found) if found.is_empty() => bail!(
            "prompt '{}' not found; no prompt files in {}",
            spec,
            prompts_dir.display()
        ),
        Ok(found) => {
            let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
            bail!(
                "prompt '{}' not found in {} (available: {})",
                spec,
                prompts_dir.display(),
                names.join(", ")
            )
        }
        Err(err) => Err(err.context(format!("prompt '{spec}' not found"))),
    }
}

/// Builds the request messages for one file: the fixed system instructions
/// plus a user message of instructions, separator, and file content.
pub fn render_request(prompt: &Prompt, file_content: &str) -> RenderedPrompt {
    RenderedPrompt {
        system: FIXED_INSTRUCTIONS.to_string(),
        user: format!("{}\n\n---\n\n{}", prompt.body, file_content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn name_drops_extension() {
        assert_eq!(derive_name(Path::new("prompts/modernize.md")), "modernize");
        assert_eq!(derive_name(Path::new("tighten-docs.txt")), "tighten-docs");
    }

    #[test]
    fn name_drops_trailing_review_qualifier() {
        assert_eq!(derive_name(Path::new("modernize.review.md")), "modernize");
        assert_eq!(derive_name(Path::new("notes.review")), "notes");
    }

    #[test]
    fn name_keeps_interior_dots() {
        assert_eq!(derive_name(Path::new("a.b.c.md")), "a.b.c");
        assert_eq!(derive_name(Path::new("a.b.c.review.md")), "a.b.c");
    }

    #[test]
    fn load_trims_trailing_whitespace_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("style.md");
        fs::write(&path, "  Fix the style.\n\n").unwrap();
        let prompt = load_prompt(&path).unwrap();
        assert_eq!(prompt.name, "style");
        assert_eq!(prompt.body, "  Fix the style.");
    }

    #[test]
    fn load_rejects_empty_prompt_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.md");
        fs::write(&path, "\n  \n").unwrap();
        let err = load_prompt(&path).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn discovery_is_sorted_and_ignores_other_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zeta.md"), "z").unwrap();
        fs::write(dir.path().join("alpha.txt"), "a").unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();
        let prompts = discover_prompts(dir.path()).unwrap();
        let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn discovery_skips_unloadable_prompt_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("good.md"), "Fix the docs.").unwrap();
        fs::write(dir.path().join("broken.md"), "\n  \n").unwrap();
        let prompts = discover_prompts(dir.path()).unwrap();
        let names: Vec<&str> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn resolve_finds_prompt_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("modernize.md"), "Modernize the code.").unwrap();
        let prompt = resolve_prompt("modernize", dir.path()).unwrap();
        assert_eq!(prompt.name, "modernize");
        assert_eq!(prompt.body, "Modernize the code.");
    }

    #[test]
    fn resolve_finds_prompt_by_file_name_and_txt_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("style.txt"), "Fix style.").unwrap();
        assert_eq!(resolve_prompt("style", dir.path()).unwrap().name, "style");
        assert_eq!(resolve_prompt("style.txt", dir.path()).unwrap().name, "style");
    }

    #[test]
    fn resolve_accepts_a_direct_path_outside_the_prompts_dir() {
        let dir = TempDir::new().unwrap();
        let elsewhere = dir.path().join("elsewhere");
        fs::create_dir(&elsewhere).unwrap();
        let path = elsewhere.join("adhoc.review.md");
        fs::write(&path, "Ad hoc review.").unwrap();
        let prompt = resolve_prompt(path.to_str().unwrap(), &dir.path().join("prompts")).unwrap();
        assert_eq!(prompt.name, "adhoc");
    }

    #[test]
    fn resolve_lists_available_prompts_on_miss() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("alpha.md"), "a").unwrap();
        fs::write(dir.path().join("beta.md"), "b").unwrap();
        let err = resolve_prompt("gamma", dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gamma"));
        assert!(message.contains("alpha, beta"));
    }

    #[test]
    fn rendered_request_sandwiches_content_after_separator() {
        let prompt = Prompt {
            name: "modernize".to_string(),
            path: PathBuf::from("prompts/modernize.md"),
            body: "Modernize the code.".to_string(),
        };
        let rendered = render_request(&prompt, "fn main() {}\n");
        assert_eq!(rendered.system, FIXED_INSTRUCTIONS);
        assert_eq!(rendered.user, "Modernize the code.\n\n---\n\nfn main() {}\n");
    }
}
