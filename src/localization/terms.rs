use crate::config::TranslatableFields;
use crate::localization::LocalizationIndex;
use crate::models::{Namespace, RecordList, TermCategory};
use crate::parsers::Sanitizer;

/// Replaces translatable display text by lookup keys, collecting the
/// (key, text) pairs into a [`LocalizationIndex`].
#[derive(Debug, Clone)]
pub struct TermExtractor {
    sanitizer: Sanitizer,
    fields: TranslatableFields,
}

impl TermExtractor {
    pub fn new(sanitizer: Sanitizer, fields: TranslatableFields) -> Self {
        Self { sanitizer, fields }
    }

    fn fields_for(&self, category: TermCategory) -> &[String] {
        match category {
            TermCategory::Specific => &self.fields.specific,
            TermCategory::Generic => &self.fields.generic,
        }
    }

    /// Returns a copy of `records` where every matching text field holds its key.
    ///
    /// New keys go into `namespace`; existing keys keep their first text.
    /// The rewrite applies to every matching field, new key or not.
    pub fn extract(
        &self,
        records: &RecordList,
        index: &mut LocalizationIndex,
        namespace: &Namespace,
        category: TermCategory,
    ) -> RecordList {
        let fields = self.fields_for(category);
        let catalog = index.catalog_mut(namespace);

        records
            .iter()
            .map(|record| {
                record.map_text(|name, text| {
                    if !fields.iter().any(|f| f == name) {
                        return text.to_string();
                    }
                    let key = self.sanitizer.sanitize(text);
                    if !key.is_empty() {
                        catalog.insert(&key, text);
                    }
                    key
                })
            })
            .collect()
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new(Sanitizer::default(), TranslatableFields::default())
    }
}
