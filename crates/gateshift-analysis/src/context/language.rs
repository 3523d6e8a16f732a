//! Language detection from file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages with dedicated extraction support. Everything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "php")]
    Php,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "csharp")]
    CSharp,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "c-family")]
    CFamily,
    #[serde(rename = "html")]
    Html,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    /// Detect language from a file extension string (case-insensitive).
    pub fn from_extension(ext: Option<&str>) -> Language {
        let Some(ext) = ext else {
            return Language::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "php" | "phtml" => Language::Php,
            "py" | "pyi" => Language::Python,
            "java" => Language::Java,
            "cs" => Language::CSharp,
            "rb" | "rake" => Language::Ruby,
            "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Language::CFamily,
            "html" | "htm" => Language::Html,
            _ => Language::Unknown,
        }
    }

    /// Detect language from a path. Never fails; unknown extensions map to `Unknown`.
    pub fn from_path(path: &str) -> Language {
        Self::from_extension(Path::new(path).extension().and_then(|e| e.to_str()))
    }

    /// Stable lowercase tag, e.g. `"c-family"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Php => "php",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::CFamily => "c-family",
            Language::Html => "html",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table() {
        let cases = [
            ("checkout.js", Language::JavaScript),
            ("Widget.jsx", Language::JavaScript),
            ("pay.ts", Language::TypeScript),
            ("Form.tsx", Language::TypeScript),
            ("gateway.php", Language::Php),
            ("client.py", Language::Python),
            ("Payment.java", Language::Java),
            ("Service.cs", Language::CSharp),
            ("charge.rb", Language::Ruby),
            ("pos.cpp", Language::CFamily),
            ("pos.c", Language::CFamily),
            ("index.html", Language::Html),
            ("README", Language::Unknown),
            ("notes.txt", Language::Unknown),
            ("LOUD.PY", Language::Python),
        ];
        for (path, expected) in cases {
            assert_eq!(Language::from_path(path), expected, "{path}");
        }
    }

    #[test]
    fn serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Language::CFamily).unwrap(), "\"c-family\"");
        assert_eq!(serde_json::to_string(&Language::Unknown).unwrap(), "\"unknown\"");
    }
}
