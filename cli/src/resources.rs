use crate::CliError;
use anyhow::Context;
use log::debug;
use query_expr::{FieldSpec, FieldType, SortOrder, Sorting};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Kinds of result sets the CLI can show, each with its own field spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Definitions,
    Entries,
    MetadataChanges,
    MetadataFs,
    SearchResults,
    Operations,
    Schedules,
    RulesMatched,
    RulesUnmatched,
    /// Field spec supplied by the user with `--spec-file`
    Custom,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Definitions,
        Resource::Entries,
        Resource::MetadataChanges,
        Resource::MetadataFs,
        Resource::SearchResults,
        Resource::Operations,
        Resource::Schedules,
        Resource::RulesMatched,
        Resource::RulesUnmatched,
        Resource::Custom,
    ];

    /// Built-in spec of the resource; `None` for [`Resource::Custom`].
    pub fn spec(&self) -> Option<ResourceSpec> {
        use FieldType::*;

        let spec = match self {
            Resource::Definitions => ResourceSpec::new(
                &[
                    ("definition", Str),
                    ("info", Str),
                    ("device", Str),
                    ("copies", Int),
                    ("existing_versions", Str),
                    ("removed_versions", Str),
                ],
                None,
            ),
            Resource::Entries => ResourceSpec::new(
                &[
                    ("entry", Str),
                    ("definition", Str),
                    ("device", Str),
                    ("crates", Int),
                    ("metadata", Str),
                    ("created", Str),
                ],
                Some(Sorting::new("created", SortOrder::Desc)),
            ),
            Resource::MetadataChanges => ResourceSpec::new(
                &[
                    ("changed", Str),
                    ("file", Str),
                    ("size", Int),
                    ("link", Str),
                    ("hidden", Str),
                    ("created", Str),
                    ("updated", Str),
                    ("owner", Str),
                    ("group", Str),
                    ("permissions", Str),
                    ("checksum", Str),
                    ("crate", Str),
                ],
                None,
            ),
            Resource::MetadataFs => {
                ResourceSpec::new(&[("file", Str), ("state", Str), ("entry", Str)], None)
            }
            Resource::SearchResults => ResourceSpec::new(
                &[
                    ("definition", Str),
                    ("info", Str),
                    ("file", Str),
                    ("state", Str),
                    ("entry", Str),
                ],
                None,
            ),
            Resource::Operations => ResourceSpec::new(
                &[
                    ("operation", Str),
                    ("type", Str),
                    ("stages", Int),
                    ("failures", Int),
                    ("completed", Str),
                ],
                None,
            ),
            Resource::Schedules => ResourceSpec::new(
                &[
                    ("schedule", Str),
                    ("info", Str),
                    ("start", Str),
                    ("interval", Int),
                    ("next_invocation", Str),
                ],
                Some(Sorting::new("next_invocation", SortOrder::Asc)),
            ),
            Resource::RulesMatched => ResourceSpec::new(
                &[("state", Str), ("entity", Str), ("explanation", Str)],
                Some(Sorting::new("entity", SortOrder::Asc)),
            ),
            Resource::RulesUnmatched => ResourceSpec::new(
                &[("line", Int), ("rule", Str), ("failure", Str)],
                Some(Sorting::new("line", SortOrder::Asc)),
            ),
            Resource::Custom => return None,
        };

        Some(spec)
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .find(|resource| resource.to_string() == s.to_lowercase())
            .copied()
            .ok_or_else(|| {
                let names: Vec<String> = Resource::ALL.iter().map(|r| r.to_string()).collect();
                format!("Unknown resource [{}]; expected one of: {}", s, names.join(", "))
            })
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Definitions => "definitions",
            Resource::Entries => "entries",
            Resource::MetadataChanges => "metadata-changes",
            Resource::MetadataFs => "metadata-fs",
            Resource::SearchResults => "search-results",
            Resource::Operations => "operations",
            Resource::Schedules => "schedules",
            Resource::RulesMatched => "rules-matched",
            Resource::RulesUnmatched => "rules-unmatched",
            Resource::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

/// Field types of a resource and the sorting used when the user asks for none.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSpec {
    pub fields: FieldSpec,
    pub default_sorting: Option<Sorting>,
}

#[derive(Deserialize)]
struct SpecFile {
    fields: serde_json::Map<String, Value>,
    #[serde(default)]
    sorting: Option<SpecFileSorting>,
}

#[derive(Deserialize)]
struct SpecFileSorting {
    field: String,
    #[serde(default)]
    ordering: Option<String>,
}

impl ResourceSpec {
    fn new(fields: &[(&str, FieldType)], default_sorting: Option<Sorting>) -> Self {
        let fields = fields
            .iter()
            .fold(FieldSpec::new(), |spec, (name, field_type)| spec.with(*name, *field_type));
        ResourceSpec {
            fields,
            default_sorting,
        }
    }

    /// Parses a spec document of the form
    /// `{"fields": {"name": "str", "size": "int"}, "sorting": {"field": "size", "ordering": "asc"}}`.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let spec_file: SpecFile = serde_json::from_str(raw)?;

        let fields = FieldSpec::from_json(&spec_file.fields)?;

        let default_sorting = match spec_file.sorting {
            Some(sorting) => {
                let ordering = match sorting.ordering {
                    Some(ordering) => ordering.parse::<SortOrder>()?,
                    None => SortOrder::default(),
                };
                Some(Sorting::new(sorting.field, ordering))
            }
            None => None,
        };

        Ok(ResourceSpec {
            fields,
            default_sorting,
        })
    }

    pub fn load(path: &str) -> Result<Self, CliError> {
        fs_err::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| Self::from_json_str(&raw).context("Invalid field spec document"))
            .map_err(|source| CliError::SpecFileLoad {
                path: path.to_string(),
                source,
            })
    }
}

/// Picks the spec for `resource`: the built-in one, or the `--spec-file` for custom records.
///
/// A spec file given for a built-in resource replaces its built-in spec.
pub fn resolve_spec(resource: Resource, spec_file: Option<&str>) -> Result<ResourceSpec, CliError> {
    match (spec_file, resource.spec()) {
        (Some(path), _) => {
            debug!("Loading field spec for {} from {}", resource, path);
            ResourceSpec::load(path)
        }
        (None, Some(spec)) => Ok(spec),
        (None, None) => Err(CliError::MissingSpecFile),
    }
}
