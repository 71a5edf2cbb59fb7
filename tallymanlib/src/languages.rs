//! Language registry - maps file extensions and filenames to language metadata.
//!
//! The registry is a process-wide static table. Descriptors are immutable
//! `Copy` values whose identity covers every field, so two descriptors that
//! share a name but differ in category (Markdown/docs vs Markdown/specs)
//! are distinct entities.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::TallymanError;
use crate::Result;

/// Summary bucket a language belongs to.
///
/// Variant order is the fixed display order for category totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Design,
    Docs,
    Specs,
    Data,
}

impl Category {
    /// All categories in display order.
    pub const DISPLAY_ORDER: [Category; 5] = [
        Category::Code,
        Category::Design,
        Category::Docs,
        Category::Specs,
        Category::Data,
    ];

    /// Human-readable name used in report output.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Code => "Code",
            Category::Design => "Design",
            Category::Docs => "Docs",
            Category::Specs => "Specs",
            Category::Data => "Data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable descriptor for one language/category pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    /// Display name, e.g. "Python"
    pub name: &'static str,
    /// Summary bucket
    pub category: Category,
    /// xterm-256 palette index for terminal rendering
    pub color: u8,
    /// Single-line comment marker, e.g. "#", "//", "--"; None if the
    /// language has no simple marker-based detection
    pub comment_marker: Option<&'static str>,
    /// Matched extensions, lowercase, with leading dot
    pub extensions: &'static [&'static str],
}

const fn lang(
    name: &'static str,
    category: Category,
    color: u8,
    comment_marker: Option<&'static str>,
    extensions: &'static [&'static str],
) -> Language {
    Language {
        name,
        category,
        color,
        comment_marker,
        extensions,
    }
}

use Category::{Code, Data, Design, Docs};

/// The full language table.
#[rustfmt::skip]
pub static LANGUAGES: &[Language] = &[
    // --- Code ---
    lang("Python",           Code,   184, Some("#"),  &[".py"]),
    lang("Rust",             Code,   208, Some("//"), &[".rs"]),
    lang("Go",               Code,    45, Some("//"), &[".go"]),
    lang("JavaScript",       Code,   227, Some("//"), &[".js", ".jsx", ".mjs"]),
    lang("TypeScript",       Code,    33, Some("//"), &[".ts", ".tsx"]),
    lang("Java",             Code,   172, Some("//"), &[".java"]),
    lang("C",                Code,    67, Some("//"), &[".c"]),
    lang("C/C++ Header",     Code,    68, Some("//"), &[".h"]),
    lang("C++",              Code,    39, Some("//"), &[".cpp", ".hpp", ".cc", ".cxx"]),
    lang("C#",               Code,    40, Some("//"), &[".cs"]),
    lang("Swift",            Code,   202, Some("//"), &[".swift"]),
    lang("Kotlin",           Code,   104, Some("//"), &[".kt", ".kts"]),
    lang("Ruby",             Code,   196, Some("#"),  &[".rb"]),
    lang("Shell",            Code,    46, Some("#"),  &[".sh", ".bash", ".zsh"]),
    lang("Lua",              Code,    21, Some("--"), &[".lua"]),
    lang("PHP",              Code,    98, Some("//"), &[".php"]),
    lang("Perl",             Code,   247, Some("#"),  &[".pl", ".pm"]),
    lang("R",                Code,    69, Some("#"),  &[".r"]),
    lang("Dart",             Code,    43, Some("//"), &[".dart"]),
    lang("Scala",            Code,   160, Some("//"), &[".scala"]),
    lang("Elixir",           Code,   128, Some("#"),  &[".ex", ".exs"]),
    lang("Zig",              Code,   214, Some("//"), &[".zig"]),
    lang("Haskell",          Code,    93, Some("--"), &[".hs"]),
    lang("Erlang",           Code,   209, Some("%"),  &[".erl"]),
    lang("OCaml",            Code,   215, None,       &[".ml", ".mli"]),
    lang("Nim",              Code,   178, Some("#"),  &[".nim", ".nims"]),
    lang("V",                Code,   117, Some("//"), &[".v", ".vv"]),
    lang("Terraform",        Code,    54, Some("#"),  &[".tf", ".tfvars"]),
    lang("Makefile",         Code,    15, Some("#"),  &[".mk"]),
    lang("Docker",           Code,    38, Some("#"),  &[".dockerfile"]),
    // --- Design ---
    lang("CSS",              Design, 201, None,       &[".css"]),
    lang("SCSS",             Design, 205, Some("//"), &[".scss"]),
    lang("LESS",             Design, 164, Some("//"), &[".less"]),
    lang("HTML",             Design, 166, None,       &[".html", ".htm", ".xhtml", ".shtml", ".pt", ".jinja", ".jinja2", ".j2", ".njk", ".hbs", ".ejs", ".mustache"]),
    lang("SVG",              Design, 220, None,       &[".svg"]),
    // --- Docs ---
    lang("Markdown",         Docs,     7, None,       &[".md", ".mdx"]),
    lang("reStructuredText", Docs,   249, None,       &[".rst"]),
    // --- Data ---
    lang("TOML",             Data,   244, Some("#"),  &[".toml"]),
    lang("YAML",             Data,   174, Some("#"),  &[".yml", ".yaml"]),
    lang("JSON",             Data,   154, None,       &[".json"]),
    lang("XML",              Data,   246, None,       &[".xml"]),
    lang("SQL",              Data,    51, Some("--"), &[".sql"]),
];

fn extension_map() -> &'static HashMap<&'static str, &'static Language> {
    static MAP: OnceLock<HashMap<&'static str, &'static Language>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for language in LANGUAGES {
            for ext in language.extensions {
                map.insert(*ext, language);
            }
        }
        map
    })
}

/// Filenames identified by name rather than extension.
fn filename_map() -> &'static HashMap<&'static str, &'static Language> {
    static MAP: OnceLock<HashMap<&'static str, &'static Language>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for language in LANGUAGES {
            let filenames: &[&str] = match language.name {
                "Docker" => &[
                    "Dockerfile",
                    "docker-compose.yml",
                    "docker-compose.yaml",
                    "compose.yml",
                    "compose.yaml",
                ],
                "Makefile" => &["Makefile", "makefile", "GNUmakefile"],
                _ => &[],
            };
            for filename in filenames {
                map.insert(*filename, language);
            }
        }
        map
    })
}

/// Return the language for a file path, or None if unrecognized.
///
/// Checks exact filename matches first (e.g. Makefile, docker-compose.yml),
/// then Dockerfile prefix variants (Dockerfile.dev, Dockerfile.prod), then
/// falls back to case-insensitive extension matching. An unrecognized file
/// is not an error; it simply drops out of the tally.
pub fn identify(path: &Path) -> Option<&'static Language> {
    let name = path.file_name()?.to_str()?;
    if let Some(language) = filename_map().get(name) {
        return Some(language);
    }
    if name.starts_with("Dockerfile") {
        return filename_map().get("Dockerfile").copied();
    }
    let ext = path.extension()?.to_str()?.to_lowercase();
    extension_map().get(format!(".{ext}").as_str()).copied()
}

/// Return a specs-category variant of a docs-category language.
///
/// The result is identical to the input in every field except category,
/// which is forced to `Specs`. Reclassifying anything other than a docs
/// language is a caller bug and fails with
/// [`TallymanError::InvalidReclassification`].
pub fn as_spec(language: &Language) -> Result<Language> {
    if language.category != Category::Docs {
        return Err(TallymanError::InvalidReclassification {
            name: language.name.to_string(),
            category: language.category,
        });
    }
    Ok(Language {
        category: Category::Specs,
        ..*language
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn test_identify_by_extension() {
        let language = identify(Path::new("main.py")).unwrap();
        assert_eq!(language.name, "Python");
        assert_eq!(language.category, Category::Code);

        let language = identify(Path::new("src/lib.rs")).unwrap();
        assert_eq!(language.name, "Rust");

        let language = identify(Path::new("App.jsx")).unwrap();
        assert_eq!(language.name, "JavaScript");

        let language = identify(Path::new("component.tsx")).unwrap();
        assert_eq!(language.name, "TypeScript");
    }

    #[test]
    fn test_identify_docs_and_design() {
        let language = identify(Path::new("README.md")).unwrap();
        assert_eq!(language.name, "Markdown");
        assert_eq!(language.category, Category::Docs);

        let language = identify(Path::new("styles.css")).unwrap();
        assert_eq!(language.category, Category::Design);
    }

    #[test]
    fn test_identify_case_insensitive_extension() {
        let language = identify(Path::new("README.MD")).unwrap();
        assert_eq!(language.name, "Markdown");

        let language = identify(Path::new("stats.R")).unwrap();
        assert_eq!(language.name, "R");
    }

    #[test]
    fn test_identify_by_filename() {
        let language = identify(Path::new("Makefile")).unwrap();
        assert_eq!(language.name, "Makefile");

        let language = identify(Path::new("GNUmakefile")).unwrap();
        assert_eq!(language.name, "Makefile");

        let language = identify(Path::new("docker-compose.yml")).unwrap();
        assert_eq!(language.name, "Docker");
    }

    #[test]
    fn test_identify_dockerfile_prefix() {
        let language = identify(Path::new("Dockerfile")).unwrap();
        assert_eq!(language.name, "Docker");

        let language = identify(Path::new("Dockerfile.prod")).unwrap();
        assert_eq!(language.name, "Docker");
    }

    #[test]
    fn test_identify_unknown() {
        assert!(identify(Path::new("photo.png")).is_none());
        assert!(identify(Path::new("LICENSE")).is_none());
        assert!(identify(Path::new("no_extension")).is_none());
    }

    #[test]
    fn test_no_duplicate_extensions() {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for language in LANGUAGES {
            for ext in language.extensions {
                if let Some(previous) = seen.insert(ext, language.name) {
                    panic!("extension {ext} is mapped to both {previous} and {}", language.name);
                }
            }
        }
    }

    #[test]
    fn test_all_languages_have_extensions() {
        for language in LANGUAGES {
            assert!(
                !language.extensions.is_empty(),
                "{} has no extensions",
                language.name
            );
        }
    }

    #[test]
    fn test_categories_are_closed_set() {
        for language in LANGUAGES {
            assert!(Category::DISPLAY_ORDER.contains(&language.category));
        }
    }

    #[test]
    fn test_as_spec_docs_language() {
        let markdown = identify(Path::new("README.md")).unwrap();
        let spec = as_spec(markdown).unwrap();
        assert_eq!(spec.name, "Markdown");
        assert_eq!(spec.category, Category::Specs);
        assert_eq!(spec.color, markdown.color);
        assert_eq!(spec.comment_marker, markdown.comment_marker);
        assert_eq!(spec.extensions, markdown.extensions);
    }

    #[test]
    fn test_as_spec_rejects_non_docs() {
        let python = identify(Path::new("main.py")).unwrap();
        let err = as_spec(python).unwrap_err();
        assert!(matches!(
            err,
            TallymanError::InvalidReclassification { .. }
        ));
    }

    #[test]
    fn test_descriptor_identity_includes_category() {
        let markdown = *identify(Path::new("README.md")).unwrap();
        let spec = as_spec(&markdown).unwrap();
        assert_eq!(markdown.name, spec.name);
        assert_ne!(markdown, spec);
    }
}
