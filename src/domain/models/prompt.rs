/// A named system prompt loaded from the prompts directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub name: String,
    pub content: String,
}

impl Prompt {
    pub fn new(name: &str, content: &str) -> Prompt {
        return Prompt {
            name: name.to_string(),
            content: content.to_string(),
        };
    }
}
