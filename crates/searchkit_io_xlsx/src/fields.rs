//! Return-field selection and schema lookup collaborators.

use globset::{Glob, GlobMatcher};
use indexmap::{IndexMap, IndexSet};

use crate::conf::C_FIELD_SCORE;
use crate::spec::{ExportError, Result, SpecFieldInfo};

////////////////////////////////////////////////////////////////////////////////
// #region Contracts

/// Which fields a request asked for.
pub trait ReturnFields {
    /// Explicitly requested names in request order; `None` when all fields
    /// are wanted or only patterns were given.
    fn requested_names(&self) -> Option<&[String]>;
    /// Whether the request carries wildcard patterns.
    fn has_pattern_matching(&self) -> bool;
    /// Whether the computed `score` field was asked for.
    fn wants_score(&self) -> bool;
    /// Whether `name` should be returned.
    fn wants(&self, name: &str) -> bool;
}

/// Field metadata of the searched index.
pub trait IndexSchema {
    /// Schema facts for `name`, or `None` for an unknown field.
    fn field_info(&self, name: &str) -> Option<SpecFieldInfo>;
    /// Every concrete field name the index knows.
    fn all_field_names(&self) -> Vec<String>;
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReturnFieldsFromFieldList

/// Return fields parsed from a comma/space separated field list (`fl`).
#[derive(Debug, Clone, Default)]
pub struct SpecReturnFields {
    l_names: Vec<String>,
    l_globs: Vec<GlobMatcher>,
    if_wants_all: bool,
    if_wants_score: bool,
}

impl SpecReturnFields {
    /// Parse a field list.
    ///
    /// A missing or blank list, or a bare `*`, wants every field. Names with
    /// `*` or `?` are glob patterns.
    pub fn parse(fl: Option<&str>) -> Result<Self> {
        let mut spec_fields = Self::default();
        let mut set_names = IndexSet::new();

        for token in fl
            .unwrap_or_default()
            .split(|chr: char| chr == ',' || chr.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            if token == "*" {
                spec_fields.if_wants_all = true;
                continue;
            }
            if token == C_FIELD_SCORE {
                spec_fields.if_wants_score = true;
            }
            if token.contains(['*', '?']) {
                let matcher = Glob::new(token)
                    .map_err(|e| ExportError::InvalidPattern(format!("{token:?}: {e}")))?
                    .compile_matcher();
                spec_fields.l_globs.push(matcher);
                continue;
            }
            set_names.insert(token.to_string());
        }

        if set_names.is_empty() && spec_fields.l_globs.is_empty() {
            spec_fields.if_wants_all = true;
        }
        spec_fields.l_names = set_names.into_iter().collect();
        Ok(spec_fields)
    }
}

impl ReturnFields for SpecReturnFields {
    fn requested_names(&self) -> Option<&[String]> {
        if self.if_wants_all || self.l_names.is_empty() {
            return None;
        }
        Some(&self.l_names)
    }

    fn has_pattern_matching(&self) -> bool {
        !self.l_globs.is_empty()
    }

    fn wants_score(&self) -> bool {
        self.if_wants_score
    }

    fn wants(&self, name: &str) -> bool {
        if name == C_FIELD_SCORE {
            return self.if_wants_score || self.l_names.iter().any(|n| n == name);
        }
        self.if_wants_all
            || self.l_names.iter().any(|n| n == name)
            || self.l_globs.iter().any(|g| g.is_match(name))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region InMemorySchema

/// In-memory schema: explicit fields plus glob-named dynamic fields.
#[derive(Debug, Clone, Default)]
pub struct SpecIndexSchema {
    dict_fields: IndexMap<String, SpecFieldInfo>,
    l_dynamic_fields: Vec<(GlobMatcher, SpecFieldInfo)>,
}

impl SpecIndexSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style explicit field declaration.
    pub fn with_field(mut self, name: impl Into<String>, info: SpecFieldInfo) -> Self {
        self.dict_fields.insert(name.into(), info);
        self
    }

    /// Builder-style dynamic field declaration (e.g. `*_ss`).
    pub fn with_dynamic_field(mut self, pattern: &str, info: SpecFieldInfo) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .map_err(|e| ExportError::InvalidPattern(format!("{pattern:?}: {e}")))?
            .compile_matcher();
        self.l_dynamic_fields.push((matcher, info));
        Ok(self)
    }
}

impl IndexSchema for SpecIndexSchema {
    fn field_info(&self, name: &str) -> Option<SpecFieldInfo> {
        if let Some(info) = self.dict_fields.get(name) {
            return Some(*info);
        }
        self.l_dynamic_fields
            .iter()
            .find(|(matcher, _)| matcher.is_match(name))
            .map(|(_, info)| *info)
    }

    fn all_field_names(&self) -> Vec<String> {
        self.dict_fields.keys().cloned().collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
