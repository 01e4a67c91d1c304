//! Object path string parser.
//!
//! The parser is a small state machine over the characters of the input.
//! Each state consumes the current character and either advances to the
//! next one or hands the same character to the next state.

use super::element::Element;
use super::error::ParseError;
use super::path::ObjectPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of an element: directly after a slash or at the start of input.
    Beginning,
    /// Inside an unquoted name, e.g. `foo` in `foo/"bar"`.
    Name,
    /// Inside a quoted name, e.g. `bar` in `foo/"bar"`.
    EnclosedIdentifier,
    /// After a backslash inside a quoted name.
    Escaping,
    /// After a complete element, expecting `/`.
    Slash,
    /// Inside a `.` or `..` element.
    Dot,
}

/// What the state machine does with the cursor after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    Reprocess,
}

/// Parser for object path strings.
pub struct Parser {
    chars: Vec<char>,
    position: usize,
    state: State,
    current: String,
    elements: Vec<Element>,
}

impl Parser {
    /// Creates a new parser for the given path string.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            state: State::Beginning,
            current: String::new(),
            elements: Vec::new(),
        }
    }

    /// Parses the path string into an [`ObjectPath`].
    pub fn parse(input: &str) -> Result<ObjectPath, ParseError> {
        let mut parser = Parser::new(input);
        let absolute = parser.consume_root();
        parser.run()?;
        Ok(ObjectPath::from_elements(parser.elements, absolute))
    }

    /// A leading slash makes the path absolute and yields no element.
    fn consume_root(&mut self) -> bool {
        if self.chars.first() == Some(&'/') {
            self.position = 1;
            true
        } else {
            false
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(&ch) = self.chars.get(self.position) {
            match self.step(ch)? {
                Step::Advance => self.position += 1,
                Step::Reprocess => {}
            }
        }
        self.finish()
    }

    fn step(&mut self, ch: char) -> Result<Step, ParseError> {
        match self.state {
            State::Beginning => Ok(self.beginning(ch)),
            State::Name => self.name(ch),
            State::EnclosedIdentifier => Ok(self.enclosed_identifier(ch)),
            State::Escaping => Ok(self.escaping(ch)),
            State::Slash => self.slash(ch),
            State::Dot => self.dot(ch),
        }
    }

    fn beginning(&mut self, ch: char) -> Step {
        self.current.clear();
        if ch == '"' {
            self.state = State::EnclosedIdentifier;
            Step::Advance
        } else {
            self.state = State::Name;
            Step::Reprocess
        }
    }

    fn name(&mut self, ch: char) -> Result<Step, ParseError> {
        match ch {
            '/' => {
                if self.current.is_empty() {
                    return Err(ParseError::EmptyElement {
                        position: self.position,
                    });
                }
                self.finish_identifier();
                self.state = State::Slash;
                return Ok(Step::Reprocess);
            }
            '.' if self.current.is_empty() => {
                self.state = State::Dot;
                return Ok(Step::Reprocess);
            }
            _ => {}
        }

        if self.current.is_empty() && !ch.is_alphabetic() {
            return Err(self.unexpected(ch, "a non-enclosed path element must start with a letter"));
        }
        if !ch.is_alphanumeric() {
            return Err(self.unexpected(
                ch,
                "a non-enclosed path may only contain letters and digits",
            ));
        }
        self.current.push(ch);
        Ok(Step::Advance)
    }

    fn enclosed_identifier(&mut self, ch: char) -> Step {
        match ch {
            '\\' => self.state = State::Escaping,
            '"' => {
                self.finish_identifier();
                self.state = State::Slash;
            }
            _ => self.current.push(ch),
        }
        Step::Advance
    }

    fn escaping(&mut self, ch: char) -> Step {
        self.current.push(ch);
        self.state = State::EnclosedIdentifier;
        Step::Advance
    }

    fn slash(&mut self, ch: char) -> Result<Step, ParseError> {
        if ch != '/' {
            return Err(self.unexpected(ch, "expected '/'"));
        }
        self.state = State::Beginning;
        Ok(Step::Advance)
    }

    fn dot(&mut self, ch: char) -> Result<Step, ParseError> {
        match ch {
            '.' => {
                self.current.push('.');
                if self.current.len() > 2 {
                    return Err(ParseError::InvalidElement {
                        position: self.position + 1 - self.current.len(),
                        element: self.current.clone(),
                    });
                }
                Ok(Step::Advance)
            }
            '/' => {
                self.finish_dots();
                self.state = State::Slash;
                Ok(Step::Reprocess)
            }
            _ => Err(self.unexpected(ch, "expected '.' or '/'")),
        }
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        match self.state {
            State::Beginning | State::Slash => Ok(()),
            State::Name => {
                self.finish_identifier();
                Ok(())
            }
            State::EnclosedIdentifier | State::Escaping => Err(ParseError::UnexpectedEnd {
                position: self.chars.len(),
                expected: "'\"'".to_string(),
            }),
            // End of input acts as a closing slash for a pending dot element.
            State::Dot => self.dot('/').map(|_| ()),
        }
    }

    fn finish_identifier(&mut self) {
        let name = std::mem::take(&mut self.current);
        self.elements.push(Element::identifier(name));
    }

    fn finish_dots(&mut self) {
        let element = if self.current == "." {
            Element::self_reference()
        } else {
            Element::parent_reference()
        };
        self.current.clear();
        self.elements.push(element);
    }

    fn unexpected(&self, found: char, expected: &str) -> ParseError {
        ParseError::UnexpectedCharacter {
            position: self.position,
            found,
            expected: expected.to_string(),
        }
    }
}
