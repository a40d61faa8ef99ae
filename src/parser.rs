//! Selector/declaration state machine.
//!
//! The parser consumes the token stream one token at a time, driving an
//! explicit finite-state machine with two phases. The selector phase
//! builds tags and paths; `{` switches to the declaration phase, which
//! builds rules and values; `}` seals the block, computes specificity,
//! hands the finished [`Selector`] to the consumer, and returns to the
//! selector phase. Any token the current state cannot accept aborts the
//! entire parse call.

use crate::error::{Error, Result};
use crate::model::{AttributeOperator, Relation, RuleValue, RuleValueKind, Selector, SelectorBuilder};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NameFirst,
    Name,
    PseudoName,
    PseudoArgument,
    PseudoEnd,
    AttributeBegin,
    AttributeOperator,
    AttributeValue,
    AttributeEnd,
    RuleName,
    RuleSeparator,
    RuleValue,
    RuleValueName,
    RuleEnd,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::NameFirst => "expecting-first-name",
            State::Name => "name",
            State::PseudoName => "pseudo-name",
            State::PseudoArgument => "pseudo-argument",
            State::PseudoEnd => "pseudo-end",
            State::AttributeBegin => "attribute-begin",
            State::AttributeOperator => "attribute-operator",
            State::AttributeValue => "attribute-value",
            State::AttributeEnd => "attribute-end",
            State::RuleName => "rule-name",
            State::RuleSeparator => "rule-separator",
            State::RuleValue => "rule-value",
            State::RuleValueName => "rule-value-name",
            State::RuleEnd => "rule-end",
        }
    }
}

fn reject(state: &'static str, token: &Token) -> Error {
    Error::Syntax {
        state,
        token: token.kind,
        line: token.line,
    }
}

/// How a function argument list ended.
enum FunctionEnd {
    /// `)` after at least a comma-or-argument position was satisfied.
    Args,
    /// `)` while still expecting an argument (e.g. `url()`).
    Empty,
    /// Input ran out mid-list; the parse ends quietly.
    Eof,
}

/// Parse a complete stylesheet, collecting the selectors in source order.
pub fn parse(css: &str) -> Result<Vec<Selector>> {
    let mut selectors = Vec::new();
    parse_with(css, |selector| selectors.push(selector))?;
    Ok(selectors)
}

/// Parse a complete stylesheet, invoking `sink` once per completed rule
/// block, in source order.
///
/// The first lexical or syntax error aborts the call; blocks already
/// delivered to the sink are unaffected, the block in progress is
/// discarded. Input ending in the middle of a block is not an error; the
/// partial block is simply never delivered.
pub fn parse_with<F>(css: &str, mut sink: F) -> Result<()>
where
    F: FnMut(Selector),
{
    let mut tokens = Tokenizer::new(css);
    let mut builder = SelectorBuilder::new();
    let mut state = State::NameFirst;

    while let Some(token) = tokens.next_token()? {
        state = match state {
            State::NameFirst | State::Name => match token.kind {
                TokenKind::Identifier => {
                    if state == State::Name {
                        builder.next_tag();
                    }
                    builder.set_tag_name(&token.text);
                    State::Name
                }
                TokenKind::GreaterThan => {
                    builder.set_relation(Relation::Child);
                    State::Name
                }
                TokenKind::Tilde => {
                    builder.set_relation(Relation::Sibling);
                    State::Name
                }
                TokenKind::Plus => {
                    builder.set_relation(Relation::SiblingAdjacent);
                    State::Name
                }
                TokenKind::BracketOpen => State::AttributeBegin,
                TokenKind::Colon => State::PseudoName,
                TokenKind::Star => State::Name,
                TokenKind::Comma if state == State::Name => {
                    builder.next_path();
                    State::Name
                }
                TokenKind::BraceOpen if state == State::Name => State::RuleName,
                _ => return Err(reject(state.name(), &token)),
            },

            State::PseudoName => match token.kind {
                TokenKind::Identifier => {
                    builder.add_pseudo(&token.text);
                    State::PseudoEnd
                }
                // Double colons: pseudo-elements like ::after
                TokenKind::Colon => State::PseudoName,
                _ => return Err(reject(state.name(), &token)),
            },

            State::PseudoArgument => match token.kind {
                TokenKind::Identifier => {
                    builder.add_pseudo_arg(&token.text);
                    State::PseudoArgument
                }
                // nth-child(2n+1)
                TokenKind::Plus => {
                    builder.add_pseudo_arg("+");
                    State::PseudoArgument
                }
                TokenKind::ParenClose => State::Name,
                _ => return Err(reject(state.name(), &token)),
            },

            State::PseudoEnd => match token.kind {
                TokenKind::Identifier => {
                    builder.next_tag();
                    builder.set_tag_name(&token.text);
                    State::Name
                }
                TokenKind::ParenOpen => State::PseudoArgument,
                TokenKind::GreaterThan => {
                    builder.set_relation(Relation::Child);
                    State::Name
                }
                TokenKind::BraceOpen => State::RuleName,
                TokenKind::Colon => State::PseudoName,
                TokenKind::Comma => {
                    builder.next_path();
                    State::Name
                }
                _ => return Err(reject(state.name(), &token)),
            },

            State::AttributeBegin => match token.kind {
                TokenKind::Identifier => {
                    builder.begin_attribute(&token.text);
                    State::AttributeOperator
                }
                _ => return Err(reject(state.name(), &token)),
            },

            State::AttributeOperator => match token.kind {
                TokenKind::Equals => {
                    // A bare '=' means equality; after |^$*~ it only
                    // completes the two-character operator.
                    if let Some(attribute) = builder.attribute_mut()
                        && attribute.op == AttributeOperator::Presence
                    {
                        attribute.op = AttributeOperator::Equals;
                    }
                    State::AttributeValue
                }
                TokenKind::Bar => set_op(&mut builder, AttributeOperator::DashMatch),
                TokenKind::Caret => set_op(&mut builder, AttributeOperator::Prefix),
                TokenKind::Dollar => set_op(&mut builder, AttributeOperator::Suffix),
                TokenKind::Star => set_op(&mut builder, AttributeOperator::Substring),
                TokenKind::Tilde => set_op(&mut builder, AttributeOperator::WordMatch),
                TokenKind::BracketClose => State::Name,
                _ => return Err(reject(state.name(), &token)),
            },

            State::AttributeValue => match token.kind {
                TokenKind::String => {
                    if let Some(attribute) = builder.attribute_mut() {
                        attribute.value = Some(token.text.clone());
                    }
                    State::AttributeEnd
                }
                _ => return Err(reject(state.name(), &token)),
            },

            State::AttributeEnd => match token.kind {
                TokenKind::BracketClose => State::Name,
                TokenKind::BraceOpen => State::RuleName,
                _ => return Err(reject(state.name(), &token)),
            },

            State::RuleName => match token.kind {
                TokenKind::Identifier => {
                    builder.next_rule(&token.text);
                    State::RuleSeparator
                }
                TokenKind::BraceClose => {
                    if let Some(selector) = builder.finish() {
                        sink(selector);
                    }
                    State::NameFirst
                }
                // Empty declarations (stray semicolons) are ignored
                TokenKind::Semicolon => State::RuleName,
                _ => return Err(reject(state.name(), &token)),
            },

            State::RuleSeparator => match token.kind {
                TokenKind::Colon => State::RuleValue,
                _ => return Err(reject(state.name(), &token)),
            },

            State::RuleValue => match token.kind {
                TokenKind::Identifier => {
                    builder.push_value(RuleValue::identifier(&token.text));
                    State::RuleValueName
                }
                TokenKind::String => {
                    builder.push_value(RuleValue::string(&token.text));
                    State::RuleValueName
                }
                _ => return Err(reject(state.name(), &token)),
            },

            State::RuleValueName => match token.kind {
                TokenKind::Identifier => {
                    builder.push_value(RuleValue::identifier(&token.text));
                    State::RuleValueName
                }
                TokenKind::String => {
                    builder.push_value(RuleValue::string(&token.text));
                    State::RuleValueName
                }
                TokenKind::ParenOpen => {
                    let Some(value) = builder.last_value_mut() else {
                        return Err(reject(state.name(), &token));
                    };
                    value.kind = RuleValueKind::Function;
                    match parse_function_args(&mut tokens, value)? {
                        FunctionEnd::Args => State::RuleValueName,
                        FunctionEnd::Empty => State::RuleEnd,
                        FunctionEnd::Eof => return Ok(()),
                    }
                }
                TokenKind::Comma => State::RuleValue,
                TokenKind::Semicolon => State::RuleName,
                // Tolerates a missing ';' on the last declaration
                TokenKind::BraceClose => {
                    if let Some(selector) = builder.finish() {
                        sink(selector);
                    }
                    State::NameFirst
                }
                _ => return Err(reject(state.name(), &token)),
            },

            State::RuleEnd => match token.kind {
                TokenKind::Semicolon => State::RuleName,
                _ => return Err(reject(state.name(), &token)),
            },
        };
    }

    Ok(())
}

fn set_op(builder: &mut SelectorBuilder, op: AttributeOperator) -> State {
    if let Some(attribute) = builder.attribute_mut() {
        attribute.op = op;
    }
    State::AttributeOperator
}

/// Parse a function argument list after its opening `(`, recursively for
/// arguments that are themselves function calls. There is no nesting cap.
///
/// A `=` between an argument and the next comma is tolerated and
/// discarded, for stylesheets using key=value-style function arguments.
fn parse_function_args(tokens: &mut Tokenizer, value: &mut RuleValue) -> Result<FunctionEnd> {
    let mut expecting_arg = true;

    loop {
        let Some(token) = tokens.next_token()? else {
            return Ok(FunctionEnd::Eof);
        };

        if expecting_arg {
            match token.kind {
                TokenKind::Identifier => {
                    value.args.push(RuleValue::identifier(&token.text));
                    expecting_arg = false;
                }
                TokenKind::String => {
                    value.args.push(RuleValue::string(&token.text));
                    expecting_arg = false;
                }
                TokenKind::ParenClose => return Ok(FunctionEnd::Empty),
                _ => return Err(reject("function-argument", &token)),
            }
        } else {
            match token.kind {
                // Consecutive identifiers extend the same argument:
                // gradient(left top, ...)
                TokenKind::Identifier => {
                    if let Some(arg) = value.args.last_mut() {
                        arg.push_name(&token.text);
                    }
                }
                TokenKind::Equals => {}
                TokenKind::Comma => expecting_arg = true,
                TokenKind::ParenOpen => {
                    let Some(arg) = value.args.last_mut() else {
                        return Err(reject("function-comma", &token));
                    };
                    arg.kind = RuleValueKind::Function;
                    if let FunctionEnd::Eof = parse_function_args(tokens, arg)? {
                        return Ok(FunctionEnd::Eof);
                    }
                }
                TokenKind::ParenClose => return Ok(FunctionEnd::Args),
                _ => return Err(reject("function-comma", &token)),
            }
        }
    }
}
