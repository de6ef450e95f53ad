//! Export field-set resolution.
//!
//! Two modes:
//! - explicit: the request named its fields and used no pattern; the set is
//!   exactly those names, unstored ones included.
//! - discovery: requested names first, then the union of names present in
//!   sampled documents (or every schema field), with `score` added only when
//!   asked for and schema-unstored fields dropped.

use indexmap::IndexSet;
use tracing::debug;

use crate::conf::C_FIELD_SCORE;
use crate::fields::{IndexSchema, ReturnFields};
use crate::spec::{
    EnumFieldDiscovery, SpecDisplayOverrides, SpecExportField, SpecFieldInfo, SpecFieldSet,
};

/// Resolves the ordered column set of one export.
pub struct FieldResolver<'a> {
    return_fields: &'a dyn ReturnFields,
    schema: &'a dyn IndexSchema,
    overrides: &'a SpecDisplayOverrides,
    width_col_default: usize,
}

impl<'a> FieldResolver<'a> {
    pub fn new(
        return_fields: &'a dyn ReturnFields,
        schema: &'a dyn IndexSchema,
        overrides: &'a SpecDisplayOverrides,
        width_col_default: usize,
    ) -> Self {
        Self {
            return_fields,
            schema,
            overrides,
            width_col_default,
        }
    }

    /// Whether the request pins the field set without discovery.
    pub fn is_explicit(&self) -> bool {
        self.return_fields.requested_names().is_some()
            && !self.return_fields.has_pattern_matching()
    }

    /// Resolve the field set. Same inputs always give the same ordered set.
    ///
    /// `discovery` is ignored in explicit mode.
    pub fn resolve(&self, discovery: EnumFieldDiscovery<'_>) -> SpecFieldSet {
        let if_explicit = self.is_explicit();
        let set_names = if if_explicit {
            self.derive_requested_names()
        } else {
            self.derive_discovered_names(discovery)
        };

        let mut field_set = SpecFieldSet::default();
        for name in set_names {
            if !self.return_fields.wants(&name) {
                continue;
            }
            let info = self.derive_field_info(&name);
            if !if_explicit && info.is_some_and(|info| !info.stored) {
                continue;
            }
            field_set.insert(self.derive_export_field(name, info));
        }

        debug!(
            if_explicit,
            n_fields = field_set.len(),
            fields = ?field_set.names(),
            "Resolved export fields"
        );
        field_set
    }

    fn derive_requested_names(&self) -> IndexSet<String> {
        self.return_fields
            .requested_names()
            .unwrap_or_default()
            .iter()
            .cloned()
            .collect()
    }

    fn derive_discovered_names(&self, discovery: EnumFieldDiscovery<'_>) -> IndexSet<String> {
        let mut set_names = self.derive_requested_names();
        match discovery {
            EnumFieldDiscovery::Sample(docs) => {
                for doc in docs {
                    for name in doc.field_names() {
                        if !set_names.contains(name) {
                            set_names.insert(name.to_string());
                        }
                    }
                }
            }
            EnumFieldDiscovery::Schema => set_names.extend(self.schema.all_field_names()),
        }

        if self.return_fields.wants_score() {
            set_names.insert(C_FIELD_SCORE.to_string());
        } else {
            set_names.shift_remove(C_FIELD_SCORE);
        }
        set_names
    }

    fn derive_field_info(&self, name: &str) -> Option<SpecFieldInfo> {
        // score is computed per request and never typed by the schema
        if name == C_FIELD_SCORE {
            return None;
        }
        self.schema.field_info(name)
    }

    fn derive_export_field(&self, name: String, info: Option<SpecFieldInfo>) -> SpecExportField {
        let (display_name, width_col) = match self.overrides.get(&name) {
            Some(o) => (o.display_name.clone(), o.width_col),
            None => (name.clone(), self.width_col_default),
        };
        SpecExportField {
            name,
            info,
            display_name,
            width_col,
        }
    }
}
