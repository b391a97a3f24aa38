//! Tag URI pattern matching.
//!
//! Converters declare the tags they handle as glob patterns so a single
//! converter can serve every minor version of a tag. Patterns are compiled
//! with `literal_separator`, which gives:
//!
//! - `*` matches any run of characters except `/`
//! - `**` as a whole path segment matches across `/`
//! - every other character matches itself
//!
//! A pattern must match the whole tag.

use globset::{GlobBuilder, GlobMatcher};
use log::warn;

use crate::error::Result;

/// A compiled tag pattern.
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: GlobMatcher,
}

impl TagPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()?
            .compile_matcher();
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }
}

/// True when `tag` is matched by `pattern`. An invalid pattern matches nothing.
pub fn tag_matches(pattern: &str, tag: &str) -> bool {
    match TagPattern::new(pattern) {
        Ok(compiled) => compiled.matches(tag),
        Err(e) => {
            warn!("ignoring invalid tag pattern {pattern}: {e}");
            false
        }
    }
}
