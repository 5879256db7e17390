//! Placeholder scanning and directive classification.

/// Directive text that renders the timestamp as whole epoch seconds.
pub const EPOCH_SECONDS: &str = "+%s";

/// What a placeholder asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'t> {
    /// `%{+%s}`
    EpochSeconds,
    /// `%{+<pattern>}`, holding the pattern after the `+`
    Pattern(&'t str),
    /// `%{<path>}`
    Field(&'t str),
}

impl<'t> Directive<'t> {
    /// Classify the text between `%{` and `}`.
    ///
    /// Order matters: `+%s` is itself a valid pattern and must be caught first.
    pub fn classify(text: &'t str) -> Self {
        if text == EPOCH_SECONDS {
            Directive::EpochSeconds
        } else if let Some(pattern) = text.strip_prefix('+') {
            Directive::Pattern(pattern)
        } else {
            Directive::Field(text)
        }
    }
}

/// One `%{...}` occurrence in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// Byte offset of `%`
    pub open: usize,
    /// Byte offset of the closing `}`
    pub close: usize,
    pub directive: Directive<'t>,
}

impl<'t> Placeholder<'t> {
    /// The raw directive text between the braces.
    pub fn text<'a>(&self, template: &'a str) -> &'a str {
        &template[self.open + 2..self.close]
    }
}

/// Iterator over the placeholders of a template, left to right.
///
/// Scanning stops at the first `%{` that has no `}` after it.
#[derive(Debug, Clone)]
pub struct Placeholders<'t> {
    template: &'t str,
    pos: usize,
}

/// Iterate the placeholders `evaluate` would substitute.
pub fn placeholders(template: &str) -> Placeholders<'_> {
    Placeholders { template, pos: 0 }
}

/// True when `template` contains at least one terminated placeholder.
pub fn has_placeholders(template: &str) -> bool {
    placeholders(template).next().is_some()
}

impl<'t> Iterator for Placeholders<'t> {
    type Item = Placeholder<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.template.get(self.pos..)?;
        let open = self.pos + rest.find("%{")?;
        let close = open + 2 + self.template[open + 2..].find('}')?;
        self.pos = close + 1;
        Some(Placeholder {
            open,
            close,
            directive: Directive::classify(&self.template[open + 2..close]),
        })
    }
}
