use serde::{Deserialize, Serialize};

/// Initialization payload handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    /// Package specifier, `<author>/<project>`; may be empty
    pub spec: String,
}

/// One unit of generated documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub fqn: String,
    pub slug: String,
    pub markdown: String,
}

impl ModuleRecord {
    /// File name the record is persisted under
    pub fn file_name(&self) -> String {
        format!("{}.md", self.slug)
    }
}

/// A completed documentation pass for one package specifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOutput {
    #[serde(default)]
    pub name: Option<String>,
    pub bundle: Vec<ModuleRecord>,
}

impl BundleOutput {
    pub fn len(&self) -> usize {
        self.bundle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundle.is_empty()
    }
}

/// Terminal fatal condition reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbortSignal {
    pub code: i32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_decodes_without_name() {
        let bundle: BundleOutput = serde_json::from_str(
            r##"{"bundle":[{"fqn":"Html.Attributes","slug":"html-attributes","markdown":"# Html.Attributes"}]}"##,
        )
        .unwrap();

        assert_eq!(bundle.name, None);
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.bundle[0].file_name(), "html-attributes.md");
    }

    #[test]
    fn test_abort_signal_decodes() {
        let abort: AbortSignal =
            serde_json::from_str(r#"{"code":2,"message":"not found"}"#).unwrap();
        assert_eq!(abort.code, 2);
        assert_eq!(abort.message, "not found");
    }
}
