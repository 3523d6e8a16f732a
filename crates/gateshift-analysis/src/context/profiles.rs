//! Per-language extraction table: import, function and class patterns.
//!
//! A language without an entry extracts nothing. Every pattern captures the
//! name of interest in its first non-empty group.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::language::Language;

/// Compiled extraction patterns for one language.
pub struct LanguageProfile {
    pub imports: Vec<Regex>,
    pub function: Option<Regex>,
    pub class: Option<Regex>,
}

/// Nearest enclosing function and class preceding an offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub function: Option<String>,
    pub class: Option<String>,
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        self.function.is_none() && self.class.is_none()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.class, &self.function) {
            (Some(class), Some(function)) => write!(f, "{class}::{function}"),
            (Some(class), None) => f.write_str(class),
            (None, Some(function)) => f.write_str(function),
            (None, None) => f.write_str("<top level>"),
        }
    }
}

/// Declarations of one file, extracted once and queried per offset.
#[derive(Debug, Default)]
pub struct ScopeIndex {
    functions: Vec<(usize, String)>,
    classes: Vec<(usize, String)>,
}

impl ScopeIndex {
    /// Last function and class declared before `offset`.
    pub fn scope_at(&self, offset: usize) -> Scope {
        Scope {
            function: last_before(&self.functions, offset),
            class: last_before(&self.classes, offset),
        }
    }
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in extraction pattern must compile")
}

fn profile(imports: &[&str], function: Option<&str>, class: Option<&str>) -> LanguageProfile {
    LanguageProfile {
        imports: imports.iter().map(|p| re(p)).collect(),
        function: function.map(re),
        class: class.map(re),
    }
}

const JS_IMPORTS: &[&str] = &[
    r#"(?m)^\s*import\s+(?:[\w*{}\s,]+\s+from\s+)?['"]([^'"]+)['"]"#,
    r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
    r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
];
const JS_FUNCTION: &str = r"(?m)(?:\bfunction\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(|\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>)|^\s*(?:async\s+)?([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*\{)";
const JS_CLASS: &str = r"\bclass\s+([A-Za-z_$][\w$]*)";

static PROFILES: Lazy<FxHashMap<Language, LanguageProfile>> = Lazy::new(|| {
    let mut table = FxHashMap::default();
    table.insert(
        Language::JavaScript,
        profile(JS_IMPORTS, Some(JS_FUNCTION), Some(JS_CLASS)),
    );
    table.insert(
        Language::TypeScript,
        profile(JS_IMPORTS, Some(JS_FUNCTION), Some(JS_CLASS)),
    );
    table.insert(
        Language::Php,
        profile(
            &[
                r"(?m)^\s*use\s+([\w\\]+)",
                r#"\b(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"]+)['"]"#,
            ],
            Some(r"\bfunction\s+&?\s*([A-Za-z_]\w*)\s*\("),
            Some(r"\b(?:class|trait|interface)\s+([A-Za-z_]\w*)"),
        ),
    );
    table.insert(
        Language::Python,
        profile(
            &[r"(?m)^\s*from\s+([\w.]+)\s+import\b", r"(?m)^\s*import\s+([\w.]+)"],
            Some(r"(?m)^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\("),
            Some(r"(?m)^\s*class\s+([A-Za-z_]\w*)"),
        ),
    );
    table.insert(
        Language::Java,
        profile(
            &[r"(?m)^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;"],
            Some(r"(?m)^\s*(?:(?:public|protected|private|static|final|synchronized|abstract)\s+)*[\w<>\[\],\s]+?\s+([A-Za-z_]\w*)\s*\([^)]*\)\s*(?:throws\s+[\w.,\s]+)?\{"),
            Some(r"\b(?:class|interface|enum|record)\s+([A-Za-z_]\w*)"),
        ),
    );
    table.insert(
        Language::CSharp,
        profile(
            &[r"(?m)^\s*using\s+(?:static\s+)?([\w.]+)\s*;"],
            Some(r"(?m)^\s*(?:(?:public|protected|private|internal|static|async|virtual|override|sealed)\s+)+[\w<>\[\],\s]+?\s+([A-Za-z_]\w*)\s*\([^)]*\)"),
            Some(r"\b(?:class|interface|struct|record)\s+([A-Za-z_]\w*)"),
        ),
    );
    table.insert(
        Language::Ruby,
        profile(
            &[r#"(?m)^\s*require(?:_relative)?\s*\(?\s*['"]([^'"]+)['"]"#],
            Some(r"(?m)^\s*def\s+(?:self\.)?([A-Za-z_]\w*[?!]?)"),
            Some(r"(?m)^\s*(?:class|module)\s+([A-Z]\w*(?:::\w+)*)"),
        ),
    );
    table.insert(
        Language::CFamily,
        profile(
            &[r#"(?m)^\s*#\s*include\s*[<"]([^>"]+)[>"]"#],
            Some(r"(?m)^[\w:<>\*&\s]+?\b([A-Za-z_]\w*)\s*\([^;{)]*\)\s*(?:const\s*)?\{"),
            Some(r"\b(?:class|struct)\s+([A-Za-z_]\w*)\s*(?::[^{;]*)?\{"),
        ),
    );
    table.insert(
        Language::Html,
        profile(
            &[r#"<script\b[^>]*\bsrc\s*=\s*['"]([^'"]+)['"]"#],
            Some(r"\bfunction\s+([A-Za-z_$][\w$]*)\s*\("),
            None,
        ),
    );
    table
});

/// Extraction profile for `language`, if one is registered.
pub fn profile_for(language: Language) -> Option<&'static LanguageProfile> {
    PROFILES.get(&language)
}

fn first_group<'a>(caps: &regex::Captures<'a>) -> Option<&'a str> {
    caps.iter().skip(1).flatten().next().map(|m| m.as_str())
}

/// Names captured by `regex` in order of appearance, with their byte offsets.
fn captures_with_offsets(regex: &Regex, source: &str) -> Vec<(usize, String)> {
    regex
        .captures_iter(source)
        .filter_map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            first_group(&caps).map(|name| (start, name.to_string()))
        })
        .collect()
}

/// Control-flow words that loose declaration patterns can pick up (`if (x) {`).
const CONTROL_WORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "else", "foreach", "using", "lock",
];

fn push_unique(out: &mut Vec<String>, value: String) {
    if !out.contains(&value) {
        out.push(value);
    }
}

impl LanguageProfile {
    /// Deduplicated import specifiers in order of first appearance.
    pub fn extract_imports(&self, source: &str) -> Vec<String> {
        let mut hits: Vec<(usize, String)> = self
            .imports
            .iter()
            .flat_map(|regex| captures_with_offsets(regex, source))
            .collect();
        hits.sort_by_key(|(offset, _)| *offset);

        let mut imports = Vec::new();
        for (_, name) in hits {
            push_unique(&mut imports, name);
        }
        imports
    }

    pub fn extract_functions(&self, source: &str) -> Vec<String> {
        extract_names(self.function.as_ref(), source)
    }

    pub fn extract_classes(&self, source: &str) -> Vec<String> {
        extract_names(self.class.as_ref(), source)
    }

    /// Declaration index for `source`, for repeated scope queries.
    pub fn scope_index(&self, source: &str) -> ScopeIndex {
        ScopeIndex {
            functions: declarations(self.function.as_ref(), source),
            classes: declarations(self.class.as_ref(), source),
        }
    }

    /// Last function and class declared before `offset`.
    pub fn enclosing_scope(&self, source: &str, offset: usize) -> Scope {
        self.scope_index(source).scope_at(offset)
    }
}

fn declarations(regex: Option<&Regex>, source: &str) -> Vec<(usize, String)> {
    match regex {
        Some(regex) => captures_with_offsets(regex, source)
            .into_iter()
            .filter(|(_, name)| !CONTROL_WORDS.contains(&name.as_str()))
            .collect(),
        None => Vec::new(),
    }
}

fn extract_names(regex: Option<&Regex>, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for (_, name) in declarations(regex, source) {
        push_unique(&mut names, name);
    }
    names
}

/// `declarations` is sorted by offset.
fn last_before(declarations: &[(usize, String)], offset: usize) -> Option<String> {
    let end = declarations.partition_point(|(start, _)| *start < offset);
    end.checked_sub(1).map(|i| declarations[i].1.clone())
}
