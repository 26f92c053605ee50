//! State machine over the directive token stream.

use super::DirectiveError;
use super::token::{Token, Tokenizer};

/// Parser states.
///
/// ```text
/// ExpectLabel --literal--> AfterLabel --'='--> ExpectValue --literal--> AfterValue
///      ^                       |                                         |
///      +---------','-----------+----------------------','-----------------+
///                              |                                         |
///                              +--end--> Done <----------end-------------+
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    ExpectLabel,
    AfterLabel,
    ExpectValue,
    AfterValue,
    Done,
}

/// Parses `input` into ordered `(label, value)` pairs.
///
/// A bare label gets an empty value. An empty input produces no pairs.
pub(crate) fn parse_pairs(input: &str) -> Result<Vec<(String, String)>, DirectiveError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut state = State::ExpectLabel;

    for token in Tokenizer::default().tokenize(input) {
        state = match (state, token) {
            (State::ExpectLabel, Token::Literal(label)) => {
                pairs.push((label, String::new()));
                State::AfterLabel
            }
            (State::ExpectLabel, _) => return Err(DirectiveError::ExpectedLabel),

            (State::AfterLabel, Token::Separator) => State::ExpectLabel,
            (State::AfterLabel, Token::Assign) => State::ExpectValue,
            (State::AfterLabel, Token::End) => State::Done,
            (State::AfterLabel, Token::Literal(_)) => {
                return Err(DirectiveError::ExpectedAssignmentOrSeparator);
            }

            // `foo=` and `foo=,` both land here: an assignment needs a literal.
            (State::ExpectValue, Token::Literal(value)) => {
                if let Some((_, slot)) = pairs.last_mut() {
                    *slot = value;
                }
                State::AfterValue
            }
            (State::ExpectValue, _) => return Err(DirectiveError::ExpectedLabel),

            (State::AfterValue, Token::End) => State::Done,
            (State::AfterValue, Token::Separator) => State::ExpectLabel,
            (State::AfterValue, _) => return Err(DirectiveError::ExpectedEofOrSeparator),

            (State::Done, _) => State::Done,
        };
    }

    Ok(pairs)
}
