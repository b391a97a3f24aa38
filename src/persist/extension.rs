//! Extension identity: which tags exist and which converters serve them.

use crate::persist::converter::{Converter, DISPXY_TAG, DispersionConverter};
use crate::persist::tag::tag_matches;

pub const DISPXY_EXTENSION_URI: &str = "asdf://stsci.edu/grismstuff/extensions/extension-1.0";

/// Schema that validates trees tagged with [`DISPXY_TAG`].
pub const DISPXY_SCHEMA_URI: &str = "asdf://stsci.edu/grismstuff/dispxy-1.0.schema";

/// A tag declared by an extension, optionally bound to a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    pub tag_uri: String,
    pub schema_uri: Option<String>,
}

/// Tag patterns and type name of a converter, detached from the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterBinding {
    pub tags: Vec<String>,
    pub type_name: String,
}

impl ConverterBinding {
    pub fn of<C: Converter>(converter: &C) -> Self {
        Self {
            tags: converter.tags().iter().map(|t| t.to_string()).collect(),
            type_name: converter.type_name().to_string(),
        }
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.tags.iter().any(|pattern| tag_matches(pattern, tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub extension_uri: String,
    pub tags: Vec<TagDefinition>,
    pub converters: Vec<ConverterBinding>,
}

impl Extension {
    /// The grism dispersion extension: one tag, one converter.
    pub fn dispersion() -> Self {
        Self {
            extension_uri: DISPXY_EXTENSION_URI.to_string(),
            tags: vec![TagDefinition {
                tag_uri: DISPXY_TAG.to_string(),
                schema_uri: Some(DISPXY_SCHEMA_URI.to_string()),
            }],
            converters: vec![ConverterBinding::of(&DispersionConverter)],
        }
    }

    /// First converter whose patterns match `tag`.
    pub fn converter_for(&self, tag: &str) -> Option<&ConverterBinding> {
        self.converters.iter().find(|c| c.matches(tag))
    }

    /// Tag to write for objects of `type_name`: the first declared tag that
    /// the type's converter accepts.
    pub fn tag_for_type(&self, type_name: &str) -> Option<&str> {
        let binding = self.converters.iter().find(|c| c.type_name == type_name)?;
        self.tags
            .iter()
            .map(|t| t.tag_uri.as_str())
            .find(|tag| binding.matches(tag))
    }

    /// Schema for `tag`.
    ///
    /// Exact declarations win. Otherwise a tag served by one of our converters
    /// borrows the schema of the declared tag that converter also serves, so
    /// newer minor versions validate against the schema we know.
    pub fn schema_for(&self, tag: &str) -> Option<&str> {
        if let Some(def) = self.tags.iter().find(|t| t.tag_uri == tag) {
            return def.schema_uri.as_deref();
        }
        let binding = self.converter_for(tag)?;
        self.tags
            .iter()
            .find(|t| binding.matches(&t.tag_uri))
            .and_then(|t| t.schema_uri.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::converter::DISPXY_TYPE_NAME;

    #[test]
    fn dispersion_extension_identity() {
        let ext = Extension::dispersion();
        assert_eq!(ext.extension_uri, "asdf://stsci.edu/grismstuff/extensions/extension-1.0");
        assert_eq!(ext.tags.len(), 1);
        assert_eq!(ext.tags[0].tag_uri, "tag:stsci.edu:grismstuff/dispxy_model-1.0.0");
        assert_eq!(ext.converters.len(), 1);
        assert_eq!(ext.converters[0].type_name, "DispersionModel");
        assert_eq!(ext.converters[0].tags, ["tag:stsci.edu:grismstuff/dispxy_model-*"]);
    }

    #[test]
    fn dispatch_follows_the_wildcard() {
        let ext = Extension::dispersion();
        assert!(ext.converter_for("tag:stsci.edu:grismstuff/dispxy_model-1.0.0").is_some());
        assert!(ext.converter_for("tag:stsci.edu:grismstuff/dispxy_model-1.2.3").is_some());
        assert!(ext.converter_for("tag:stsci.edu:grismstuff/dispxy_model_other").is_none());
        assert!(ext.converter_for("tag:stsci.edu:asdf/core/complex-1.0.0").is_none());
    }

    #[test]
    fn write_tag_and_schema_lookup() {
        let ext = Extension::dispersion();
        assert_eq!(ext.tag_for_type(DISPXY_TYPE_NAME), Some(DISPXY_TAG));
        assert_eq!(ext.tag_for_type("Gaussian1D"), None);

        assert_eq!(ext.schema_for(DISPXY_TAG), Some(DISPXY_SCHEMA_URI));
        assert_eq!(
            ext.schema_for("tag:stsci.edu:grismstuff/dispxy_model-1.1.0"),
            Some(DISPXY_SCHEMA_URI)
        );
        assert_eq!(ext.schema_for("tag:example.org:other-1.0.0"), None);
    }
}
