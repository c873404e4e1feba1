use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// The chat models offered for selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
pub enum ModelName {
    #[default]
    #[strum(serialize = "gpt-4o-mini")]
    Gpt4oMini,
    #[strum(serialize = "gpt-4o")]
    Gpt4o,
}

impl ModelName {
    pub fn parse(text: &str) -> Option<ModelName> {
        return ModelName::iter().find(|e| return e.to_string() == text.trim());
    }
}
