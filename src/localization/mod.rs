mod index;
mod terms;
pub mod translator;

pub use index::{Catalog, LocalizationIndex, Term};
pub use terms::TermExtractor;
pub use translator::{HttpTranslationSource, TranslationItem, TranslationSource, Translator};
