//! Typed YAML loading for structure and baseline files

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Deserialize a YAML document, keeping the source for diagnostics
pub fn parse_yaml<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content).map_err(|e| {
        YamlError::Syntax(YamlSyntaxError::from_serde_error(&e, content, filename))
    })
}

/// Read and deserialize a YAML file; errors name the file
pub fn parse_yaml_file<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, YamlError> {
    let filename = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: filename.clone(),
        source,
    })?;
    parse_yaml(&content, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::part::PartLink;

    #[test]
    fn test_parse_valid_link() {
        let yaml = "id: 7\ncomponent: PART-001\namount: 2";
        let link: PartLink = parse_yaml(yaml, "link.yaml").unwrap();
        assert_eq!(link.id, 7);
        assert_eq!(link.component, "PART-001");
        assert_eq!(link.amount, 2.0);
        assert!(!link.optional);
    }

    #[test]
    fn test_parse_invalid_yaml_names_file() {
        let yaml = "id: 7\n  component: [unclosed";
        let result: Result<PartLink, _> = parse_yaml(yaml, "broken.yaml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<PartLink, _> =
            parse_yaml_file(Path::new("/nonexistent/structure.yaml"));
        match result {
            Err(YamlError::Io { path, .. }) => assert_eq!(path, "/nonexistent/structure.yaml"),
            other => panic!("expected an IO error, got {other:?}"),
        }
    }
}
