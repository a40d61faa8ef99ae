//! Structural model for parsed stylesheets.
//!
//! A [`Selector`] is one rule block: comma-separated [`Path`]s of [`Tag`]s
//! sharing an ordered list of [`Rule`] declarations, plus one specificity
//! weight per path. Values are built once per block by [`SelectorBuilder`]
//! and are immutable after delivery.

use crate::specificity;

/// Serialize a model node back to CSS text.
pub trait ToCss {
    /// Write this value as CSS to the buffer.
    fn to_css(&self, buf: &mut String);

    /// Convert to a CSS string (convenience method).
    fn to_css_string(&self) -> String {
        let mut buf = String::new();
        self.to_css(&mut buf);
        buf
    }
}

/// How a tag connects to the next tag in its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Relation {
    /// Implicit whitespace: `a b`
    #[default]
    Descendant,
    /// `a.b`
    Class,
    /// `a#b`
    Id,
    /// `a > b`
    Child,
    /// `a ~ b`
    Sibling,
    /// `a + b`
    SiblingAdjacent,
}

impl Relation {
    fn separator(self, is_last: bool) -> &'static str {
        match self {
            Relation::Descendant => {
                if is_last {
                    ""
                } else {
                    " "
                }
            }
            Relation::Class => ".",
            Relation::Id => "#",
            Relation::Child => " > ",
            Relation::Sibling => " ~ ",
            Relation::SiblingAdjacent => " + ",
        }
    }
}

/// Attribute clause match operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AttributeOperator {
    /// `[att]`
    #[default]
    Presence,
    /// `[att="val"]`
    Equals,
    /// `[att|="val"]`
    DashMatch,
    /// `[att~="val"]`
    WordMatch,
    /// `[att^="val"]`
    Prefix,
    /// `[att$="val"]`
    Suffix,
    /// `[att*="val"]`
    Substring,
}

impl AttributeOperator {
    fn as_css(self) -> &'static str {
        match self {
            AttributeOperator::Presence => "",
            AttributeOperator::Equals => "=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::WordMatch => "~=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// An attribute clause attached to a tag, e.g. `[type="submit"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    pub key: String,
    pub op: AttributeOperator,
    pub value: Option<String>,
}

impl ToCss for Attribute {
    fn to_css(&self, buf: &mut String) {
        buf.push('[');
        buf.push_str(&self.key);
        if let Some(ref value) = self.value {
            buf.push_str(self.op.as_css());
            buf.push('"');
            buf.push_str(value);
            buf.push('"');
        }
        buf.push(']');
    }
}

/// A pseudo-class entry, e.g. `:hover` or `:nth-child(2n+1)`.
///
/// The argument is the concatenation of every token between the
/// parentheses, so `2n+1` survives as a single string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PseudoClass {
    pub name: String,
    pub argument: Option<String>,
}

impl ToCss for PseudoClass {
    fn to_css(&self, buf: &mut String) {
        buf.push(':');
        buf.push_str(&self.name);
        if let Some(ref arg) = self.argument {
            buf.push('(');
            buf.push_str(arg);
            buf.push(')');
        }
    }
}

/// One element of a compound selector chain.
///
/// `name` is `None` for a wildcard or for the implicit element in front of
/// a bare class/id selector like `.active`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tag {
    pub name: Option<String>,
    pub relation: Relation,
    pub attribute: Option<Attribute>,
    pub pseudo_classes: Vec<PseudoClass>,
}

impl ToCss for Tag {
    fn to_css(&self, buf: &mut String) {
        match (&self.name, self.relation) {
            (Some(name), _) => buf.push_str(name),
            (None, Relation::Class | Relation::Id) => {}
            (None, _) => buf.push('*'),
        }
        if let Some(ref attribute) = self.attribute {
            attribute.to_css(buf);
        }
        for pseudo in &self.pseudo_classes {
            pseudo.to_css(buf);
        }
    }
}

/// One compound/combinator chain, one alternative among the
/// comma-separated paths of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Path {
    pub tags: Vec<Tag>,
}

impl ToCss for Path {
    fn to_css(&self, buf: &mut String) {
        let last = self.tags.len().saturating_sub(1);
        for (i, tag) in self.tags.iter().enumerate() {
            tag.to_css(buf);
            buf.push_str(tag.relation.separator(i == last));
        }
    }
}

/// The kind of a [`RuleValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RuleValueKind {
    #[default]
    Identifier,
    String,
    Function,
}

/// One space-separated component of a declaration value.
///
/// `names` normally holds exactly one fragment; function arguments may
/// accumulate several (`gradient(left top, ...)`). A leading `#` is
/// stripped at construction time, so color literals arrive bare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RuleValue {
    pub kind: RuleValueKind,
    pub names: Vec<String>,
    pub args: Vec<RuleValue>,
}

impl RuleValue {
    pub fn identifier(name: &str) -> Self {
        let mut value = RuleValue::default();
        value.push_name(name);
        value
    }

    pub fn string(name: &str) -> Self {
        let mut value = RuleValue {
            kind: RuleValueKind::String,
            ..RuleValue::default()
        };
        value.push_name(name);
        value
    }

    /// Append a name fragment, stripping a leading `#`.
    pub fn push_name(&mut self, name: &str) {
        let name = name.strip_prefix('#').unwrap_or(name);
        self.names.push(name.to_string());
    }

    /// The joined name fragments, space-separated.
    pub fn name(&self) -> String {
        self.names.join(" ")
    }
}

impl ToCss for RuleValue {
    fn to_css(&self, buf: &mut String) {
        match self.kind {
            RuleValueKind::String => {
                buf.push('"');
                buf.push_str(&self.name());
                buf.push('"');
            }
            RuleValueKind::Identifier => buf.push_str(&self.name()),
            RuleValueKind::Function => {
                buf.push_str(&self.name());
                buf.push('(');
                for (i, arg) in self.args.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    arg.to_css(buf);
                }
                buf.push(')');
            }
        }
    }
}

/// A declaration: a property name and its value components.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rule {
    pub name: String,
    pub values: Vec<RuleValue>,
}

impl ToCss for Rule {
    fn to_css(&self, buf: &mut String) {
        buf.push_str(&self.name);
        buf.push_str(": ");
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            value.to_css(buf);
        }
        buf.push(';');
    }
}

/// One completed rule block: selector paths, per-path specificity weights,
/// and declarations.
///
/// `weights` always has exactly one entry per path; both are populated
/// together when the block closes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Selector {
    pub paths: Vec<Path>,
    pub weights: Vec<u32>,
    pub rules: Vec<Rule>,
}

impl Selector {
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// The specificity weight for a path, if the index is in range.
    pub fn weight(&self, path: usize) -> Option<u32> {
        self.weights.get(path).copied()
    }
}

impl ToCss for Selector {
    fn to_css(&self, buf: &mut String) {
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            path.to_css(buf);
        }
        buf.push_str(" { ");
        for rule in &self.rules {
            rule.to_css(buf);
            buf.push(' ');
        }
        buf.push('}');
    }
}

/// Accumulates one rule block and emits a fresh [`Selector`] per block.
///
/// The parser drives this through the same mutations the state machine
/// performs: appending paths, tags, pseudo entries, attribute clauses,
/// rules, and values. [`SelectorBuilder::finish`] seals the block,
/// computes the weights, and resets the builder for the next one.
#[derive(Debug)]
pub struct SelectorBuilder {
    paths: Vec<Path>,
    rules: Vec<Rule>,
}

impl Default for SelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorBuilder {
    pub fn new() -> Self {
        let mut builder = SelectorBuilder {
            paths: Vec::new(),
            rules: Vec::new(),
        };
        builder.reset();
        builder
    }

    fn reset(&mut self) {
        self.paths.clear();
        self.rules.clear();
        // Seed the first path with an empty tag, ready for a name.
        self.paths.push(Path {
            tags: vec![Tag::default()],
        });
    }

    /// Start another comma-separated path sharing the same rule block.
    pub fn next_path(&mut self) {
        self.paths.push(Path::default());
    }

    /// Append a fresh tag to the current path.
    pub fn next_tag(&mut self) {
        let path = self.paths.last_mut().expect("builder always has a path");
        path.tags.push(Tag::default());
    }

    /// The tag currently under construction.
    pub fn last_tag_mut(&mut self) -> &mut Tag {
        let path = self.paths.last_mut().expect("builder always has a path");
        if path.tags.is_empty() {
            path.tags.push(Tag::default());
        }
        path.tags.last_mut().expect("path has at least one tag")
    }

    /// Set the current tag's name, splitting an embedded `.` or `#` into a
    /// class/id tag pair (the tokenizer does not split them out).
    pub fn set_tag_name(&mut self, name: &str) {
        let (mark, relation) = match (name.find('.'), name.find('#')) {
            (Some(i), _) => (Some(i), Relation::Class),
            (None, Some(i)) => (Some(i), Relation::Id),
            (None, None) => (None, Relation::Descendant),
        };
        match mark {
            Some(i) => {
                let tag = self.last_tag_mut();
                if i > 0 {
                    tag.name = Some(name[..i].to_string());
                }
                tag.relation = relation;
                self.next_tag();
                self.last_tag_mut().name = Some(name[i + 1..].to_string());
            }
            None => {
                self.last_tag_mut().name = Some(name.to_string());
            }
        }
    }

    pub fn set_relation(&mut self, relation: Relation) {
        self.last_tag_mut().relation = relation;
    }

    pub fn add_pseudo(&mut self, name: &str) {
        self.last_tag_mut().pseudo_classes.push(PseudoClass {
            name: name.to_string(),
            argument: None,
        });
    }

    /// Append to the current pseudo-class argument, concatenating
    /// consecutive argument tokens (`2n`, `+`, `1`).
    pub fn add_pseudo_arg(&mut self, arg: &str) {
        if let Some(pseudo) = self.last_tag_mut().pseudo_classes.last_mut() {
            match pseudo.argument {
                Some(ref mut existing) => existing.push_str(arg),
                None => pseudo.argument = Some(arg.to_string()),
            }
        }
    }

    /// Open an attribute clause on the current tag.
    pub fn begin_attribute(&mut self, key: &str) {
        self.last_tag_mut().attribute = Some(Attribute {
            key: key.to_string(),
            op: AttributeOperator::Presence,
            value: None,
        });
    }

    pub fn attribute_mut(&mut self) -> Option<&mut Attribute> {
        self.last_tag_mut().attribute.as_mut()
    }

    /// Open a new declaration.
    pub fn next_rule(&mut self, name: &str) {
        self.rules.push(Rule {
            name: name.to_string(),
            values: Vec::new(),
        });
    }

    /// Append a value component to the current declaration.
    pub fn push_value(&mut self, value: RuleValue) {
        if let Some(rule) = self.rules.last_mut() {
            rule.values.push(value);
        }
    }

    pub fn last_value_mut(&mut self) -> Option<&mut RuleValue> {
        self.rules.last_mut().and_then(|rule| rule.values.last_mut())
    }

    /// Seal the block: compute per-path weights, emit the selector, and
    /// reset for the next block. Returns `None` for a block with no paths.
    pub fn finish(&mut self) -> Option<Selector> {
        let paths = std::mem::take(&mut self.paths);
        let rules = std::mem::take(&mut self.rules);
        self.reset();

        if paths.is_empty() {
            return None;
        }

        let weights = paths.iter().map(specificity::path_weight).collect();
        Some(Selector {
            paths,
            weights,
            rules,
        })
    }
}
