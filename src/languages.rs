//! The closed catalog of languages the execution service accepts.

use serde::{Deserialize, Serialize};

/// One catalog entry. `api_id` goes over the wire verbatim and is
/// case-sensitive.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: &'static str,
    pub label: &'static str,
    pub mode: &'static str,
    pub api_id: &'static str,
    pub boilerplate: &'static str,
}

/// The persisted shape of a language selection. Only `id` is trusted on
/// read; the rest of the record is re-resolved from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub api_id: String,
}

impl From<&Language> for LanguageRecord {
    fn from(lang: &Language) -> Self {
        Self {
            id: lang.id.to_string(),
            label: lang.label.to_string(),
            api_id: lang.api_id.to_string(),
        }
    }
}

pub const CATALOG: &[Language] = &[
    Language {
        id: "python",
        label: "Python",
        mode: "python",
        api_id: "Python",
        boilerplate: "# Python Code\nprint(\"Hello World\")",
    },
    Language {
        id: "c",
        label: "C",
        mode: "c_cpp",
        api_id: "C",
        boilerplate: "#include <stdio.h>\n\nint main() {\n    printf(\"Hello World\\n\");\n    return 0;\n}",
    },
    Language {
        id: "cpp",
        label: "C++",
        mode: "c_cpp",
        api_id: "C++",
        boilerplate: "#include <iostream>\n\nint main() {\n    std::cout << \"Hello World\" << std::endl;\n    return 0;\n}",
    },
    Language {
        id: "go",
        label: "Go",
        mode: "golang",
        api_id: "Go",
        boilerplate: "package main\n\nimport \"fmt\"\n\nfunc main() {\n    fmt.Println(\"Hello World\")\n}",
    },
    Language {
        id: "java",
        label: "Java",
        mode: "java",
        api_id: "Java",
        boilerplate: "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello World\");\n    }\n}",
    },
    Language {
        id: "javascript",
        label: "JavaScript",
        mode: "javascript",
        api_id: "JavaScript",
        boilerplate: "// JavaScript Code\nconsole.log(\"Hello World\");",
    },
];

/// The first catalog entry; used when nothing usable is persisted.
pub fn default_language() -> &'static Language {
    &CATALOG[0]
}

pub fn find(id: &str) -> Option<&'static Language> {
    CATALOG.iter().find(|lang| lang.id == id)
}

/// Resolve a persisted record, falling back to the default for ids that are
/// no longer in the catalog.
pub fn resolve(record: &LanguageRecord) -> &'static Language {
    find(&record.id).unwrap_or_else(default_language)
}

/// Guess a language from a file extension (`py`, `cpp`, ...).
pub fn from_extension(ext: &str) -> Option<&'static Language> {
    let id = match ext.to_ascii_lowercase().as_str() {
        "py" => "python",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "go" => "go",
        "java" => "java",
        "js" | "mjs" => "javascript",
        _ => return None,
    };
    find(id)
}

pub fn ids() -> Vec<&'static str> {
    CATALOG.iter().map(|lang| lang.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_python() {
        assert_eq!(default_language().id, "python");
    }

    #[test]
    fn api_ids_match_service_spelling() {
        let api: Vec<_> = CATALOG.iter().map(|l| l.api_id).collect();
        assert_eq!(api, ["Python", "C", "C++", "Go", "Java", "JavaScript"]);
    }

    #[test]
    fn ids_are_unique() {
        let ids = ids();
        let mut seen = Vec::new();
        for id in &ids {
            assert!(!seen.contains(id), "duplicate id: {id}");
            seen.push(id);
        }
    }

    #[test]
    fn every_language_has_boilerplate() {
        for lang in CATALOG {
            assert!(lang.boilerplate.contains("Hello World"), "{}", lang.id);
        }
    }

    #[test]
    fn find_is_case_sensitive() {
        assert!(find("go").is_some());
        assert!(find("Go").is_none());
    }

    #[test]
    fn extension_lookup() {
        assert_eq!(from_extension("py").unwrap().id, "python");
        assert_eq!(from_extension("CPP").unwrap().api_id, "C++");
        assert_eq!(from_extension("mjs").unwrap().id, "javascript");
        assert!(from_extension("rs").is_none());
    }

    #[test]
    fn resolve_unknown_falls_back() {
        let record = LanguageRecord {
            id: "cobol".to_string(),
            label: "COBOL".to_string(),
            api_id: "COBOL".to_string(),
        };
        assert_eq!(resolve(&record).id, "python");
    }

    #[test]
    fn record_needs_only_an_id() {
        let json = r#"{"id":"java","mode":"java"}"#;
        let record: LanguageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(resolve(&record).api_id, "Java");
    }

    #[test]
    fn serialized_language_round_trips_through_record() {
        let json = serde_json::to_string(find("cpp").unwrap()).unwrap();
        let record: LanguageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.id, "cpp");
    }
}
