//! Language and project detection for the ingest path.
//!
//! Both are best-effort collaborators of the tracker: the language falls back
//! to the file extension itself when unmapped, and the project falls back to
//! the parent directory name when the file is not inside a git repository.

use std::path::Path;
use std::process::Command;

/// Resolves a language name from a file path's extension.
pub fn language_for_path(path: &str) -> String {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    language_from_extension(&ext)
}

fn language_from_extension(ext: &str) -> String {
    let lang = match ext {
        "" => "unknown",
        "go" => "go",
        "rs" => "rust",
        "js" => "javascript",
        "mjs" => "javascript",
        "ts" => "typescript",
        "jsx" => "javascriptreact",
        "tsx" => "typescriptreact",
        "py" => "python",
        "rb" => "ruby",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        "lua" => "lua",
        "vim" => "vim",
        "sh" | "bash" => "sh",
        "zsh" => "zsh",
        "fish" => "fish",
        "nu" => "nu",
        "md" | "markdown" => "markdown",
        "rst" => "rst",
        "adoc" => "asciidoc",
        "json" => "json",
        "jsonc" => "jsonc",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" => "ini",
        "env" => "env",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "sql" => "sql",
        "graphql" | "gql" => "graphql",
        "proto" => "protobuf",
        "xml" => "xml",
        "csv" => "csv",
        "jl" => "julia",
        "clj" | "cljs" => "clojure",
        "scm" => "scheme",
        "rkt" => "racket",
        "erl" => "erlang",
        "ex" | "exs" => "elixir",
        "hs" => "haskell",
        "nim" => "nim",
        "nix" => "nix",
        "cr" => "crystal",
        "scala" => "scala",
        "ml" | "mli" => "ocaml",
        "dart" => "dart",
        "zig" => "zig",
        "v" => "v",
        "elm" => "elm",
        "gleam" => "gleam",
        "vue" => "vue",
        "svelte" => "svelte",
        "astro" => "astro",
        "tf" => "terraform",
        "hcl" => "hcl",
        "cue" => "cue",
        "ps1" => "powershell",
        "pl" | "pm" => "perl",
        "groovy" => "groovy",
        "dockerfile" => "dockerfile",
        "mk" => "make",
        "just" => "just",
        other => other,
    };
    lang.to_string()
}

/// Resolves a project name for a file path.
///
/// Prefers the basename of the enclosing git repository; otherwise the
/// file's parent directory name; otherwise "unknown".
pub fn project_for_path(path: &str) -> String {
    if let Some(root) = git_toplevel(path) {
        if let Some(name) = Path::new(&root).file_name().and_then(|n| n.to_str()) {
            return name.to_string();
        }
    }

    Path::new(path)
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_toplevel(path: &str) -> Option<String> {
    let dir = Path::new(path).parent()?;
    let output = Command::new("git")
        .arg("rev-parse")
        .arg("--show-toplevel")
        .current_dir(dir)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8(output.stdout).ok()?;
    let root = root.trim();
    if root.is_empty() {
        None
    } else {
        Some(root.to_string())
    }
}
