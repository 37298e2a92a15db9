//! Pipeline evaluation.

use std::io::Write;

use crate::error::{FormatError, Result};
use crate::value::Value;

use super::parse::{Command, Node, Operand, Pipeline, Term};
use super::Scope;

pub(crate) struct Executor<'s> {
    scope: &'s mut dyn Scope,
}

impl<'s> Executor<'s> {
    pub(crate) fn new(scope: &'s mut dyn Scope) -> Self {
        Self { scope }
    }

    pub(crate) fn run(&mut self, nodes: &[Node], out: &mut dyn Write) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text(text) => out.write_all(text.as_bytes())?,
                Node::Action(pipeline) => {
                    let value = self.eval_pipeline(pipeline)?;
                    write!(out, "{}", value)?;
                }
            }
        }
        Ok(())
    }

    fn eval_pipeline(&mut self, pipeline: &Pipeline) -> Result<Value> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.eval_command(command, piped)?);
        }
        Ok(piped.unwrap_or_default())
    }

    /// Evaluates one command; `piped` is the previous command's result, passed
    /// as the final argument.
    fn eval_command(&mut self, command: &Command, piped: Option<Value>) -> Result<Value> {
        let (first, rest) = match command.operands.split_first() {
            Some(split) => split,
            None => return Err(FormatError::expression("empty command")),
        };

        if let (Term::Function(name), true) = (&first.term, first.fields.is_empty()) {
            let mut args = Vec::with_capacity(rest.len() + 1);
            for operand in rest {
                args.push(self.eval_operand(operand)?);
            }
            args.extend(piped);
            return self.scope.call(name, args);
        }

        if !rest.is_empty() || piped.is_some() {
            return Err(FormatError::expression(format!(
                "at offset {}: can't give argument to non-function {}",
                command.offset,
                describe(first)
            )));
        }
        self.eval_operand(first)
    }

    fn eval_operand(&mut self, operand: &Operand) -> Result<Value> {
        let mut value = match &operand.term {
            Term::Function(name) => self.scope.call(name, Vec::new())?,
            Term::Dot => self.scope.dot().clone(),
            Term::Literal(value) => value.clone(),
            Term::Pipeline(pipeline) => self.eval_pipeline(pipeline)?,
        };

        for field in &operand.fields {
            value = field_of(value, field)?;
        }
        Ok(value)
    }
}

fn field_of(value: Value, field: &str) -> Result<Value> {
    match value {
        Value::Record(record) => record.get(field).cloned().ok_or_else(|| {
            FormatError::expression(format!("can't evaluate field {} in type record", field))
        }),
        Value::Map(mut map) => Ok(map.remove(field).unwrap_or_default()),
        Value::Nil => Err(FormatError::expression(format!(
            "nil data; no entry for key \"{}\"",
            field
        ))),
        other => Err(FormatError::expression(format!(
            "can't evaluate field {} in type {}",
            field,
            other.type_name()
        ))),
    }
}

fn describe(operand: &Operand) -> String {
    let mut text = match &operand.term {
        Term::Function(name) => name.clone(),
        Term::Dot => String::new(),
        Term::Literal(Value::Str(s)) => format!("{:?}", s),
        Term::Literal(value) => value.to_string(),
        Term::Pipeline(_) => "(...)".to_string(),
    };
    for field in &operand.fields {
        text.push('.');
        text.push_str(field);
    }
    if text.is_empty() {
        text.push('.');
    }
    text
}
