//! Custom property extraction from theme stylesheets.
//!
//! Theme files only matter to the loader for the custom properties they
//! declare. This parser walks the top-level style rules of a sheet and keeps
//! each rule's selector list together with its `--*` declarations. At-rules
//! (`@media`, `@font-face`, `@import`, ...) and nested rules are skipped, as
//! are malformed rules.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};

/// A style rule reduced to its selectors and custom property declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomPropertyRule {
    /// Selectors of the rule, split on commas and trimmed.
    pub selectors: Vec<String>,
    /// `(name, value)` pairs in declaration order, values trimmed.
    pub properties: Vec<(String, String)>,
}

impl CustomPropertyRule {
    /// Returns the last value declared for `name` in this rule.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses a stylesheet into the rules that declare custom properties.
///
/// Rules without custom properties are dropped.
///
/// # Example
///
/// ```rust
/// use element_themes::document::parse_custom_properties;
///
/// let rules = parse_custom_properties(":root { --primary-400: #10384f; color: red }");
/// assert_eq!(rules.len(), 1);
/// assert_eq!(rules[0].selectors, vec![":root"]);
/// assert_eq!(rules[0].get("--primary-400"), Some("#10384f"));
/// ```
pub fn parse_custom_properties(css: &str) -> Vec<CustomPropertyRule> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = SheetRules;

    StyleSheetParser::new(&mut parser, &mut rules)
        .filter_map(Result::ok)
        .flatten()
        .collect()
}

/// Consumes the rest of `input` and returns the raw source it covered.
fn remaining_source<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start)
}

struct SheetRules;

impl<'i> QualifiedRuleParser<'i> for SheetRules {
    type Prelude = Vec<String>;
    type QualifiedRule = Option<CustomPropertyRule>;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(remaining_source(input)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn parse_block<'t>(
        &mut self,
        selectors: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut declarations = Declarations;
        let properties: Vec<(String, String)> = RuleBodyParser::new(input, &mut declarations)
            .filter_map(Result::ok)
            .flatten()
            .collect();

        if selectors.is_empty() || properties.is_empty() {
            return Ok(None);
        }
        Ok(Some(CustomPropertyRule {
            selectors,
            properties,
        }))
    }
}

impl<'i> AtRuleParser<'i> for SheetRules {
    type Prelude = ();
    type AtRule = Option<CustomPropertyRule>;
    type Error = ();
}

struct Declarations;

impl<'i> DeclarationParser<'i> for Declarations {
    type Declaration = Option<(String, String)>;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let raw = remaining_source(input);
        if !name.starts_with("--") {
            return Ok(None);
        }
        let value = raw.trim();
        let value = value
            .strip_suffix("!important")
            .map(str::trim_end)
            .unwrap_or(value);
        Ok(Some((name.to_string(), value.to_string())))
    }
}

impl<'i> AtRuleParser<'i> for Declarations {
    type Prelude = ();
    type AtRule = Option<(String, String)>;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for Declarations {
    type Prelude = ();
    type QualifiedRule = Option<(String, String)>;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Option<(String, String)>, ()> for Declarations {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
