//! Recursive-descent parser turning action tokens into pipelines.
//!
//! ```text
//! pipeline := command ( '|' command )*
//! command  := operand operand*
//! operand  := term ( '.' Field )*
//! term     := identifier | '.' | '.Field' | literal | '(' pipeline ')'
//! ```

use std::collections::BTreeSet;

use crate::error::{FormatError, Result};
use crate::value::Value;

use super::lexer::{self, Segment, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub operands: Vec<Operand>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Operand {
    pub term: Term,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Term {
    Function(String),
    Dot,
    Literal(Value),
    Pipeline(Box<Pipeline>),
}

/// A parsed message, ready to be executed against a [`Scope`](super::Scope).
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    /// Parses a message using the given delimiters.
    pub fn parse(source: &str, left: &str, right: &str) -> Result<Self> {
        let mut nodes = Vec::new();
        for segment in lexer::scan(source, left, right)? {
            match segment {
                Segment::Text(text) => nodes.push(Node::Text(text)),
                Segment::Action { tokens, offset } => {
                    let mut parser = Parser {
                        tokens: &tokens,
                        pos: 0,
                        offset,
                    };
                    nodes.push(Node::Action(parser.parse_pipeline(false)?));
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Names of every function the message calls.
    pub fn function_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for node in &self.nodes {
            if let Node::Action(pipeline) = node {
                collect_functions(pipeline, &mut names);
            }
        }
        names
    }
}

fn collect_functions<'a>(pipeline: &'a Pipeline, names: &mut BTreeSet<&'a str>) {
    for operand in pipeline.commands.iter().flat_map(|c| &c.operands) {
        match &operand.term {
            Term::Function(name) => {
                names.insert(name.as_str());
            }
            Term::Pipeline(inner) => collect_functions(inner, names),
            Term::Dot | Term::Literal(_) => {}
        }
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Offset of the action's left delimiter, for errors at end of input.
    offset: usize,
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn error(&self, msg: impl std::fmt::Display) -> FormatError {
        let offset = self.peek().map_or(self.offset, |t| t.offset);
        FormatError::expression(format!("at offset {}: {}", offset, msg))
    }

    fn parse_pipeline(&mut self, nested: bool) -> Result<Pipeline> {
        let mut commands = vec![self.parse_command()?];

        loop {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Pipe) => {
                    self.pos += 1;
                    commands.push(self.parse_command()?);
                }
                Some(TokenKind::RightParen) if nested => {
                    self.pos += 1;
                    return Ok(Pipeline { commands });
                }
                None if !nested => return Ok(Pipeline { commands }),
                None => return Err(self.error("unclosed left paren")),
                Some(kind) => return Err(self.error(format!("unexpected {:?}", kind))),
            }
        }
    }

    fn parse_command(&mut self) -> Result<Command> {
        let offset = self.peek().map_or(self.offset, |t| t.offset);
        let mut operands = Vec::new();

        while let Some(token) = self.peek() {
            if matches!(token.kind, TokenKind::Pipe | TokenKind::RightParen) {
                break;
            }
            operands.push(self.parse_operand()?);
        }

        if operands.is_empty() {
            return Err(self.error("missing value for command"));
        }
        Ok(Command { operands, offset })
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        let Some(token) = self.peek() else {
            return Err(self.error("missing operand"));
        };
        self.pos += 1;

        let (term, mut fields) = match &token.kind {
            TokenKind::Identifier(name) => (Term::Function(name.clone()), Vec::new()),
            TokenKind::Field(name) => (Term::Dot, vec![name.clone()]),
            TokenKind::Dot => (Term::Dot, Vec::new()),
            TokenKind::Str(s) => (Term::Literal(Value::Str(s.clone())), Vec::new()),
            TokenKind::Int(i) => (Term::Literal(Value::Int(*i)), Vec::new()),
            TokenKind::Float(x) => (Term::Literal(Value::Float(*x)), Vec::new()),
            TokenKind::Bool(b) => (Term::Literal(Value::Bool(*b)), Vec::new()),
            TokenKind::Nil => (Term::Literal(Value::Nil), Vec::new()),
            TokenKind::LeftParen => (
                Term::Pipeline(Box::new(self.parse_pipeline(true)?)),
                Vec::new(),
            ),
            TokenKind::Pipe | TokenKind::RightParen => {
                self.pos -= 1;
                return Err(self.error(format!("unexpected {:?}", token.kind)));
            }
        };

        // a field directly attached to the term extends its chain
        while let Some(Token {
            kind: TokenKind::Field(name),
            spaced: false,
            ..
        }) = self.peek()
        {
            fields.push(name.clone());
            self.pos += 1;
        }

        Ok(Operand { term, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pipeline(source: &str) -> Pipeline {
        let template = Template::parse(source, "{", "}").unwrap();
        match template.nodes.into_iter().next() {
            Some(Node::Action(pipeline)) => pipeline,
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_commands() {
        let pipeline = single_pipeline("{rgb 255 165 0 | background | foreground}");
        assert_eq!(pipeline.commands.len(), 3);
        assert_eq!(pipeline.commands[0].operands.len(), 4);
        assert_eq!(
            pipeline.commands[2].operands[0].term,
            Term::Function("foreground".into())
        );
    }

    #[test]
    fn test_field_chains() {
        let pipeline = single_pipeline("{p1.Y.Z}");
        let operand = &pipeline.commands[0].operands[0];
        assert_eq!(operand.term, Term::Function("p1".into()));
        assert_eq!(operand.fields, vec!["Y".to_string(), "Z".to_string()]);

        let pipeline = single_pipeline("{.X}");
        let operand = &pipeline.commands[0].operands[0];
        assert_eq!(operand.term, Term::Dot);
        assert_eq!(operand.fields, vec!["X".to_string()]);
    }

    #[test]
    fn test_parenthesized() {
        let pipeline = single_pipeline("{print (rgb 1 2 3 | background) 5}");
        let operands = &pipeline.commands[0].operands;
        assert_eq!(operands.len(), 3);
        assert!(matches!(operands[1].term, Term::Pipeline(_)));
    }

    #[test]
    fn test_function_names() {
        let template = Template::parse("{red}x{print (upper p) | bright}{.X}", "{", "}").unwrap();
        let names: Vec<_> = template.function_names().into_iter().collect();
        assert_eq!(names, vec!["bright", "print", "red", "upper"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Template::parse("{}", "{", "}").is_err());
        assert!(Template::parse("{red |}", "{", "}").is_err());
        assert!(Template::parse("{| red}", "{", "}").is_err());
        assert!(Template::parse("{print (red}", "{", "}").is_err());
        assert!(Template::parse("{red)}", "{", "}").is_err());
    }
}
