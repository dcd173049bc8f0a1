//! Configuration document loader
//!
//! Parses the declarative TOML target document into build targets and resolves
//! every parameter's allowed values eagerly. Loading is all-or-nothing: the
//! first failure aborts the whole load and the caller keeps whatever snapshot
//! was active before.
//!
//! Document shape:
//!
//! ```toml
//! [[target]]
//! id = "9f54a4a6-7e3c-4f76-9e3d-0f2c6f0a1b2d"
//! name = "Nightly"
//! description = "Nightly installer"
//! script = "/opt/build/nightly.sh"
//!
//! [[target.parameter]]
//! name = "branch"
//! description = "Branch to build"
//! source = "List"
//! values = "main,develop"
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use buildman_core::domain::target::{BuildParameter, BuildTarget, ValueSource};

use crate::error::ConfigError;

/// Raw document, exactly as written by the operator.
///
/// Validation and value resolution happen in a second pass so that errors can
/// name the offending target and parameter.
#[derive(Debug, Deserialize)]
struct TargetDocument {
    #[serde(default, rename = "target")]
    targets: Vec<TargetRecord>,
}

#[derive(Debug, Deserialize)]
struct TargetRecord {
    id: uuid::Uuid,
    name: String,
    description: String,
    script: PathBuf,
    #[serde(default, rename = "parameter")]
    parameters: Vec<ParameterRecord>,
}

#[derive(Debug, Deserialize)]
struct ParameterRecord {
    name: String,
    description: String,
    source: String,
    values: String,
}

/// Loads and resolves the target document at `path`.
pub fn load_document(path: &Path) -> Result<Vec<BuildTarget>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&raw)
}

/// Parses and resolves a target document from its text.
pub fn parse_document(raw: &str) -> Result<Vec<BuildTarget>, ConfigError> {
    let document: TargetDocument =
        toml::from_str(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;

    let mut targets = Vec::with_capacity(document.targets.len());
    let mut seen = HashSet::new();

    for record in document.targets {
        let target = resolve_target(record)?;

        if !seen.insert(target.id) {
            return Err(ConfigError::Malformed(format!(
                "duplicate target id '{}'",
                target.id
            )));
        }

        targets.push(target);
    }

    Ok(targets)
}

fn resolve_target(record: TargetRecord) -> Result<BuildTarget, ConfigError> {
    if record.name.trim().is_empty() {
        return Err(ConfigError::Malformed(format!(
            "target '{}' has an empty name",
            record.id
        )));
    }

    if record.description.trim().is_empty() {
        return Err(ConfigError::Malformed(format!(
            "target '{}' has an empty description",
            record.name
        )));
    }

    let parameters = record
        .parameters
        .into_iter()
        .map(|parameter| resolve_parameter(parameter, &record.name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BuildTarget {
        id: record.id,
        name: record.name,
        description: record.description,
        script_path: record.script,
        parameters,
        running: false,
    })
}

/// Resolves one parameter's allowed values from its declared source.
///
/// `List` payloads are split on `,` with no trimming; `File` payloads name a
/// file read line by line. Order is preserved in both cases.
fn resolve_parameter(record: ParameterRecord, target: &str) -> Result<BuildParameter, ConfigError> {
    if record.name.trim().is_empty() {
        return Err(ConfigError::Malformed(format!(
            "a parameter of target '{target}' has an empty name"
        )));
    }

    if record.description.trim().is_empty() {
        return Err(ConfigError::Malformed(format!(
            "parameter '{}' of target '{target}' has an empty description",
            record.name
        )));
    }

    let (source, source_values) = match record.source.as_str() {
        "List" => {
            let values = record.values.split(',').map(str::to_owned).collect();
            (ValueSource::List, values)
        }
        "File" => {
            let path = PathBuf::from(&record.values);

            if !path.exists() {
                return Err(ConfigError::MissingValueFile {
                    target: target.to_string(),
                    parameter: record.name,
                    path,
                });
            }

            let contents =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;

            let values = contents.lines().map(str::to_owned).collect();
            (ValueSource::File, values)
        }
        other => {
            return Err(ConfigError::InvalidValueSource {
                target: target.to_string(),
                parameter: record.name,
                kind: other.to_string(),
            });
        }
    };

    Ok(BuildParameter {
        name: record.name,
        description: record.description,
        source,
        source_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NIGHTLY_ID: &str = "9f54a4a6-7e3c-4f76-9e3d-0f2c6f0a1b2d";

    fn document(body: &str) -> String {
        format!(
            r#"
[[target]]
id = "{NIGHTLY_ID}"
name = "Nightly"
description = "Nightly installer"
script = "/opt/build/nightly.sh"
{body}
"#
        )
    }

    #[test]
    fn test_parse_minimal_target() {
        let targets = parse_document(&document("")).unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id.to_string(), NIGHTLY_ID);
        assert_eq!(targets[0].name, "Nightly");
        assert!(targets[0].parameters.is_empty());
        assert!(!targets[0].running);
    }

    #[test]
    fn test_list_source_preserves_order() {
        let targets = parse_document(&document(
            r#"
[[target.parameter]]
name = "branch"
description = "Branch to build"
source = "List"
values = "a,b,c"
"#,
        ))
        .unwrap();

        let parameter = &targets[0].parameters[0];
        assert_eq!(parameter.source, ValueSource::List);
        assert_eq!(parameter.source_values, ["a", "b", "c"]);
    }

    #[test]
    fn test_list_source_does_not_trim() {
        let targets = parse_document(&document(
            r#"
[[target.parameter]]
name = "branch"
description = "Branch to build"
source = "List"
values = "x, y"
"#,
        ))
        .unwrap();

        assert_eq!(targets[0].parameters[0].source_values, ["x", " y"]);
    }

    #[test]
    fn test_file_source_reads_lines_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha").unwrap();
        writeln!(file, "beta").unwrap();

        let targets = parse_document(&document(&format!(
            r#"
[[target.parameter]]
name = "edition"
description = "Edition to build"
source = "File"
values = "{}"
"#,
            file.path().display()
        )))
        .unwrap();

        let parameter = &targets[0].parameters[0];
        assert_eq!(parameter.source, ValueSource::File);
        assert_eq!(parameter.source_values, ["alpha", "beta"]);
    }

    #[test]
    fn test_file_source_missing_file_fails_whole_load() {
        let result = parse_document(&document(
            r#"
[[target.parameter]]
name = "edition"
description = "Edition to build"
source = "File"
values = "/definitely/not/here.txt"
"#,
        ));

        assert!(matches!(
            result,
            Err(ConfigError::MissingValueFile { ref parameter, .. }) if parameter == "edition"
        ));
    }

    #[test]
    fn test_invalid_value_source_names_parameter_and_target() {
        let result = parse_document(&document(
            r#"
[[target.parameter]]
name = "branch"
description = "Branch to build"
source = "Database"
values = "whatever"
"#,
        ));

        match result {
            Err(ConfigError::InvalidValueSource {
                target,
                parameter,
                kind,
            }) => {
                assert_eq!(target, "Nightly");
                assert_eq!(parameter, "branch");
                assert_eq!(kind, "Database");
            }
            other => panic!("expected InvalidValueSource, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_attribute_is_malformed() {
        // No script path
        let result = parse_document(&format!(
            r#"
[[target]]
id = "{NIGHTLY_ID}"
name = "Nightly"
description = "Nightly installer"
"#
        ));

        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_empty_name_is_malformed() {
        let result = parse_document(&format!(
            r#"
[[target]]
id = "{NIGHTLY_ID}"
name = "  "
description = "Nightly installer"
script = "/opt/build/nightly.sh"
"#
        ));

        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let one = document("");
        let result = parse_document(&format!("{one}\n{one}"));

        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_loaded_ids_are_pairwise_distinct() {
        let raw = format!(
            r#"
[[target]]
id = "{NIGHTLY_ID}"
name = "Nightly"
description = "Nightly installer"
script = "/opt/build/nightly.sh"

[[target]]
id = "0c0ffee0-aaaa-bbbb-cccc-000000000001"
name = "Release"
description = "Release installer"
script = "/opt/build/release.sh"
"#
        );

        let targets = parse_document(&raw).unwrap();
        let ids: HashSet<_> = targets.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), targets.len());
    }

    #[test]
    fn test_load_document_missing_file() {
        let result = load_document(Path::new("/no/such/BuildTargets.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
