//! The naming and literal conventions that shape generated builders.
//!
//! Every value has a default matching the Kubernetes-style layout the generator
//! was built for. A TOML file can override any subset of them:
//!
//! ```toml
//! api_version = "apps.example.com/v1"
//! identity_exempt = ["Spec", "Status", "List"]
//! guard_nil_maps = false
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::BuilderGenError;

/// The API version written into `TypeMeta` by default.
pub const DEFAULT_API_VERSION: &str = "stack.civo.com/v1alpha1";

/// Overridable convention table used by the scanner and the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Conventions {
    /// Substring in a declaration's documentation that selects it.
    pub marker: String,
    /// Substring in a field's comment that omits its option function.
    pub field_skip_marker: String,
    /// Prefix of constructor names (`New` + type).
    pub constructor_prefix: String,
    /// Prefix of option names (`With` + field).
    pub option_prefix: String,
    /// Literal assigned to `APIVersion` in top-level constructors.
    pub api_version: String,
    /// Member that holds `Kind` and `APIVersion`.
    pub type_meta_field: String,
    /// Package qualifier used for `TypeMeta` and `Time`.
    pub meta_package: String,
    /// Type names containing any of these get no identity block.
    pub identity_exempt: Vec<String>,
    /// Embedded relation that receives the metadata options.
    pub object_meta: String,
    /// Allocate `Labels`/`Annotations` before inserting into them.
    pub guard_nil_maps: bool,
    /// Write import aliases (`metav1 "..."`) into the generated import block.
    pub preserve_import_aliases: bool,
    /// Appended to the input file stem to name the output file.
    pub output_suffix: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            marker: "+builder".to_string(),
            field_skip_marker: "+builder:skip".to_string(),
            constructor_prefix: "New".to_string(),
            option_prefix: "With".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            type_meta_field: "TypeMeta".to_string(),
            meta_package: "v1".to_string(),
            identity_exempt: vec!["Spec".to_string(), "Status".to_string()],
            object_meta: "ObjectMeta".to_string(),
            guard_nil_maps: true,
            preserve_import_aliases: false,
            output_suffix: "_builder.go".to_string(),
        }
    }
}

impl Conventions {
    /// Parses a convention table from TOML; missing keys keep their defaults.
    ///
    /// ## Errors
    /// Returns `ConfigParse` when the text is not valid TOML or names an unknown key.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, BuilderGenError> {
        toml::from_str(text).map_err(|source| BuilderGenError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads a convention table from a TOML file.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, BuilderGenError> {
        let text = std::fs::read_to_string(path).map_err(|source| BuilderGenError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let conventions = Self::from_toml_str(&text, path)?;
        tracing::debug!(path = %path.display(), "Loaded builder conventions");
        Ok(conventions)
    }

    /// True when the constructor for `type_name` should pre-populate `TypeMeta`.
    pub fn wants_type_identity(&self, type_name: &str) -> bool {
        !self
            .identity_exempt
            .iter()
            .any(|exempt| !exempt.is_empty() && type_name.contains(exempt.as_str()))
    }

    pub fn constructor_name(&self, type_name: &str) -> String {
        format!("{}{}", self.constructor_prefix, type_name)
    }

    pub fn option_name(&self, member: &str) -> String {
        format!("{}{}", self.option_prefix, member)
    }

    /// Output file name for an input file stem (`pod_types` -> `pod_types_builder.go`).
    pub fn output_file_name(&self, stem: &str) -> String {
        format!("{stem}{}", self.output_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_and_status_types_are_exempt_from_identity() {
        let conventions = Conventions::default();
        assert!(conventions.wants_type_identity("Pod"));
        assert!(conventions.wants_type_identity("Cluster"));
        assert!(!conventions.wants_type_identity("PodSpec"));
        assert!(!conventions.wants_type_identity("PodStatus"));
        assert!(!conventions.wants_type_identity("SpecTemplate"));
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let conventions = Conventions::from_toml_str(
            r#"
            api_version = "apps.example.com/v1"
            identity_exempt = ["Spec", "Status", "List"]
            "#,
            Path::new("builder.toml"),
        )
        .unwrap();

        assert_eq!(conventions.api_version, "apps.example.com/v1");
        assert!(!conventions.wants_type_identity("PodList"));
        assert_eq!(conventions.option_prefix, "With");
        assert_eq!(conventions.marker, "+builder");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Conventions::from_toml_str("apiVersion = \"x\"", Path::new("builder.toml"))
            .unwrap_err();
        assert!(matches!(err, BuilderGenError::ConfigParse { .. }));
        assert!(err.to_string().contains("builder.toml"));
    }

    #[test]
    fn names_are_built_from_prefixes() {
        let conventions = Conventions {
            constructor_prefix: "Make".to_string(),
            option_prefix: "Set".to_string(),
            ..Conventions::default()
        };
        assert_eq!(conventions.constructor_name("Pod"), "MakePod");
        assert_eq!(conventions.option_name("Replicas"), "SetReplicas");
        assert_eq!(
            Conventions::default().output_file_name("pod_types"),
            "pod_types_builder.go"
        );
    }
}
