//! Language classification, validity and proficiency tiers.
//!
//! All lookups are pure functions over a fixed table. Language names are
//! stored raw and only normalized when aggregating, so every entry point here
//! normalizes its input first.

use std::fmt;

use serde::Serialize;

/// What kind of file a language identifier describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageClass {
    Code,
    Config,
    Data,
    Markup,
    Doc,
    Meta,
    Other,
}

/// Lowercases and trims a language name.
pub fn normalize(language: &str) -> String {
    language.trim().to_lowercase()
}

/// False for empty or placeholder language names.
pub fn is_valid_language(language: &str) -> bool {
    !matches!(
        normalize(language).as_str(),
        "" | "unknown" | "undefined" | "null" | "none" | "n/a" | "na"
    )
}

/// Classifies a language name, defaulting to [`LanguageClass::Other`].
pub fn class(language: &str) -> LanguageClass {
    let normalized = normalize(language);
    let key = normalized.strip_prefix('.').unwrap_or(&normalized);
    match key {
        // General-purpose languages
        "ada" | "apex" | "assembly" | "bash" | "beef" | "blitzbasic" | "c" | "clojure"
        | "cobol" | "coffeescript" | "cpp" | "crystal" | "csharp" | "dart" | "delphi"
        | "dlang" | "elixir" | "elm" | "erlang" | "fennel" | "fortran" | "gleam" | "go"
        | "groovy" | "hack" | "haskell" | "idris" | "java" | "javascript" | "julia"
        | "kotlin" | "lua" | "matlab" | "mojo" | "nim" | "nix" | "objectivec"
        | "objectivecplus" | "ocaml" | "perl" | "php" | "powershell" | "python" | "racket"
        | "reasonml" | "ruby" | "rust" | "scala" | "scheme" | "solidity" | "swift"
        | "typescript" | "v" | "vala" | "wolfram" | "zig" => LanguageClass::Code,
        // Web and UI framework languages count as code
        "astro" | "svelte" | "vue" | "javascriptreact" | "typescriptreact" => {
            LanguageClass::Code
        }
        // Shell and scripting count as code
        "fish" | "make" | "makefile" | "nu" | "sh" | "zsh" | "just" => LanguageClass::Code,
        // Infra DSLs count as code
        "cue" | "hcl" | "terraform" => LanguageClass::Code,
        "conf" | "dockerfile" | "env" | "ini" | "properties" | "toml" | "yaml" | "yml" => {
            LanguageClass::Config
        }
        "csv" | "graphql" | "json" | "json5" | "jsonc" | "parquet" | "protobuf" | "sql"
        | "sqlite" | "xml" => LanguageClass::Data,
        "css" | "html" | "less" | "scss" => LanguageClass::Markup,
        "asciidoc" | "md" | "markdown" | "rst" => LanguageClass::Doc,
        "bazel" | "cmake" | "gitconfig" | "gitignore" | "lock" | "meson" | "ninja" => {
            LanguageClass::Meta
        }
        _ => LanguageClass::Other,
    }
}

/// True when the language counts as programming for identity purposes.
pub fn is_code(language: &str) -> bool {
    class(language) == LanguageClass::Code
}

/// Piecewise-constant classification of lifetime hours in a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Proficiency {
    Beginner,
    #[serde(rename = "Beginner+")]
    BeginnerPlus,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

impl Proficiency {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::BeginnerPlus => "Beginner+",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
            Self::Master => "Master",
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier for a lifetime hour count.
pub fn proficiency(hours: f64) -> Proficiency {
    match hours {
        h if h >= 10_000.0 => Proficiency::Master,
        h if h >= 5_000.0 => Proficiency::Expert,
        h if h >= 1_000.0 => Proficiency::Advanced,
        h if h >= 500.0 => Proficiency::Intermediate,
        h if h >= 50.0 => Proficiency::BeginnerPlus,
        _ => Proficiency::Beginner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_languages() {
        assert_eq!(class("rust"), LanguageClass::Code);
        assert_eq!(class("Go"), LanguageClass::Code);
        assert_eq!(class(" TypeScript "), LanguageClass::Code);
        assert_eq!(class("yaml"), LanguageClass::Config);
        assert_eq!(class("json"), LanguageClass::Data);
        assert_eq!(class("html"), LanguageClass::Markup);
        assert_eq!(class("markdown"), LanguageClass::Doc);
        assert_eq!(class("gitignore"), LanguageClass::Meta);
        assert_eq!(class("klingon"), LanguageClass::Other);
    }

    #[test]
    fn class_strips_leading_dot() {
        assert_eq!(class(".env"), LanguageClass::Config);
        assert_eq!(class(".gitignore"), LanguageClass::Meta);
    }

    #[test]
    fn is_code_rejects_non_code() {
        assert!(is_code("rust"));
        assert!(is_code("sh"));
        assert!(!is_code("markdown"));
        assert!(!is_code("toml"));
        assert!(!is_code(""));
    }

    #[test]
    fn validity_rejects_placeholders() {
        for bad in ["", "unknown", "Unknown", "undefined", "null", "NONE", "n/a", "NA", "  "] {
            assert!(!is_valid_language(bad), "{bad:?} should be invalid");
        }
        assert!(is_valid_language("go"));
        assert!(is_valid_language("C++"));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Rust "), "rust");
        assert_eq!(normalize("PYTHON"), "python");
    }

    #[test]
    fn proficiency_tiers() {
        assert_eq!(proficiency(0.0), Proficiency::Beginner);
        assert_eq!(proficiency(49.9), Proficiency::Beginner);
        assert_eq!(proficiency(50.0), Proficiency::BeginnerPlus);
        assert_eq!(proficiency(500.0), Proficiency::Intermediate);
        assert_eq!(proficiency(1_000.0), Proficiency::Advanced);
        assert_eq!(proficiency(5_000.0), Proficiency::Expert);
        assert_eq!(proficiency(10_000.0), Proficiency::Master);
    }

    #[test]
    fn proficiency_serializes_display_names() {
        let json = serde_json::to_string(&Proficiency::BeginnerPlus).unwrap();
        assert_eq!(json, "\"Beginner+\"");
        let json = serde_json::to_string(&Proficiency::Master).unwrap();
        assert_eq!(json, "\"Master\"");
    }
}
