/*!
The parser engine: turns a token list into [`ParsedValues`] according to a
[`Schema`].

Each command level is parsed in two passes. The first pass walks the tokens
with an [`ArgumentsParser`], resolving every `--long`, `-s`, and
`--long=value` against the schema's options and setting aside everything
else. The second pass assigns the set-aside tokens, in order, to the
schema's positionals; or, if the level has subcommands, picks a subcommand
and recurses into it with the tokens that follow.
*/

use std::io::{self, BufRead, Read, StdinLock};

use applause_parser::{ArgAccess, ArgumentsParser, Visitor};
use tracing::{debug, trace};

use crate::errors::{ParseError, ParseErrorKind};
use crate::parsed::ParsedValues;
use crate::schema::{OptionParameter, Positional, Schema};
use crate::value::{Value, coerce};

/// Parsing stopped early, successfully, because help was requested. The
/// caller should print the help text and exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalAction {
    help: String,
    commands: Vec<String>,
}

impl TerminalAction {
    fn new(schema: &Schema) -> Self {
        Self {
            help: schema.help().to_owned(),
            commands: Vec::new(),
        }
    }

    fn within(mut self, command: &str) -> Self {
        self.commands.insert(0, command.to_owned());
        self
    }

    /// The help text of the command level where help was requested
    #[inline]
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// The subcommands entered before help was requested, outermost first
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// The result of a parse that didn't fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Parsed(ParsedValues),
    Terminal(TerminalAction),
}

impl Outcome {
    #[must_use]
    pub fn into_parsed(self) -> Option<ParsedValues> {
        match self {
            Outcome::Parsed(values) => Some(values),
            Outcome::Terminal(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(*self, Outcome::Terminal(_))
    }
}

/// Parse `tokens` (which should not include the program name) according to
/// `schema`. A `-` positional is read from standard input.
pub fn parse<S: AsRef<str>>(schema: &Schema, tokens: &[S]) -> Result<Outcome, ParseError> {
    Parser::new(schema).parse(tokens)
}

/// Standard input, locked the first time it's read from.
#[derive(Debug, Default)]
pub struct StdinInput {
    lock: Option<StdinLock<'static>>,
}

impl StdinInput {
    fn lock(&mut self) -> &mut StdinLock<'static> {
        self.lock.get_or_insert_with(|| io::stdin().lock())
    }
}

impl Read for StdinInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.lock().read(buf)
    }
}

impl BufRead for StdinInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.lock().fill_buf()
    }

    fn consume(&mut self, amount: usize) {
        self.lock().consume(amount);
    }
}

/// A parser over a particular schema, reading `-` positionals from `R`.
#[derive(Debug)]
pub struct Parser<'s, R> {
    schema: &'s Schema,
    input: R,
}

impl<'s> Parser<'s, StdinInput> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            input: StdinInput::default(),
        }
    }
}

impl<'s, R: BufRead> Parser<'s, R> {
    /// Read `-` positionals from `input` instead of standard input
    #[must_use]
    pub fn with_input<T: BufRead>(self, input: T) -> Parser<'s, T> {
        Parser {
            schema: self.schema,
            input,
        }
    }

    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Outcome, ParseError> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.parse_level(self.schema, &tokens)
    }

    fn parse_level(&mut self, schema: &'s Schema, tokens: &[&str]) -> Result<Outcome, ParseError> {
        trace!(path = schema.path(), tokens = tokens.len(), "parsing command level");

        if tokens.is_empty() && !schema.allows_empty() {
            debug!(path = schema.path(), "no arguments; showing help");
            return Ok(Outcome::Terminal(TerminalAction::new(schema)));
        }

        match schema.commands().is_empty() {
            true => self.parse_arguments(schema, tokens),
            false => self.parse_command(schema, tokens),
        }
    }

    fn parse_command(&mut self, schema: &'s Schema, tokens: &[&str]) -> Result<Outcome, ParseError> {
        // A leading `--` makes the command word, and everything after it,
        // plain text.
        let (terminated, words) = match tokens.split_first() {
            Some((&"--", rest)) => (true, rest),
            _ => (false, tokens),
        };

        let Some((&first, rest)) = words.split_first() else {
            return Ok(match schema.allows_empty() {
                true => Outcome::Parsed(ParsedValues::default()),
                false => Outcome::Terminal(TerminalAction::new(schema)),
            });
        };

        if !terminated && is_help(first) {
            return Ok(Outcome::Terminal(TerminalAction::new(schema)));
        }

        let Some(command) = schema.find_command(first) else {
            if !terminated && requests_help(tokens) {
                return Ok(Outcome::Terminal(TerminalAction::new(schema)));
            }

            return Err(match !terminated && first.starts_with('-') && first != "-" {
                true => ParseErrorKind::UnrecognizedOption {
                    option: first.to_owned(),
                },
                false => ParseErrorKind::UnknownCommand {
                    command: first.to_owned(),
                },
            }
            .into());
        };

        debug!(path = schema.path(), command = first, terminated, "selected subcommand");

        let nested_tokens: Vec<&str> = match terminated && !rest.is_empty() {
            true => core::iter::once("--").chain(rest.iter().copied()).collect(),
            false => rest.to_vec(),
        };

        let outcome = match rest.is_empty() && command.schema.allows_empty() {
            true => Outcome::Parsed(ParsedValues::default()),
            false => self
                .parse_level(&command.schema, &nested_tokens)
                .map_err(|error| error.within(first))?,
        };

        Ok(match outcome {
            Outcome::Terminal(action) => Outcome::Terminal(action.within(first)),
            Outcome::Parsed(nested) => {
                let mut values = ParsedValues::default();
                values.select(first, nested);
                Outcome::Parsed(values)
            }
        })
    }

    fn parse_arguments(
        &mut self,
        schema: &'s Schema,
        tokens: &[&str],
    ) -> Result<Outcome, ParseError> {
        if requests_help(tokens) {
            return Ok(Outcome::Terminal(TerminalAction::new(schema)));
        }

        let mut values = ParsedValues::default();
        let mut deferred = Vec::new();
        let mut help = false;
        let mut parser = ArgumentsParser::new(tokens.iter().copied());

        while let Some(result) = parser.next_arg(OptionScan {
            schema,
            values: &mut values,
            deferred: &mut deferred,
            help: &mut help,
        }) {
            result?;

            if help {
                debug!(path = schema.path(), "help requested in a short cluster");
                return Ok(Outcome::Terminal(TerminalAction::new(schema)));
            }
        }

        self.assign_positionals(schema.positionals(), &deferred, &mut values)?;

        Ok(Outcome::Parsed(values))
    }

    fn assign_positionals(
        &mut self,
        positionals: &[Positional],
        tokens: &[&str],
        values: &mut ParsedValues,
    ) -> Result<(), ParseErrorKind> {
        let mut remaining = tokens;

        for (index, positional) in positionals.iter().enumerate() {
            let after = positionals.len() - index - 1;

            if positional.multi {
                let (taken, rest) = remaining.split_at(remaining.len().saturating_sub(after));
                let items = taken
                    .iter()
                    .map(|token| coerce_positional(positional, token))
                    .collect::<Result<Vec<Value>, _>>()?;

                trace!(name = %positional.name, count = items.len(), "assigned multi positional");
                values.insert(positional.name.as_str(), Value::List(items));
                remaining = rest;
                continue;
            }

            let Some((&token, rest)) = remaining.split_first() else {
                return Err(ParseErrorKind::NotEnoughArguments {
                    missing: positional.name.clone(),
                });
            };

            let value = match token {
                "-" => {
                    let line = self.read_line(positional)?;
                    coerce_positional(positional, &line)?
                }
                token => coerce_positional(positional, token)?,
            };

            trace!(name = %positional.name, "assigned positional");
            values.insert(positional.name.as_str(), value);
            remaining = rest;
        }

        match remaining.first() {
            None => Ok(()),
            Some(&extra) => Err(ParseErrorKind::ExtraArgument {
                argument: extra.to_owned(),
            }),
        }
    }

    fn read_line(&mut self, positional: &Positional) -> Result<String, ParseErrorKind> {
        debug!(name = %positional.name, "reading positional from input");

        let mut line = String::new();
        let stdin_error = |error| ParseErrorKind::Stdin {
            name: positional.name.clone(),
            error,
        };

        match self.input.read_line(&mut line) {
            Err(error) => Err(stdin_error(error)),
            Ok(0) => {
                debug!(name = %positional.name, "input ended; using an empty value");
                Ok(String::new())
            }
            Ok(_) => {
                let trimmed = line
                    .strip_suffix('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .unwrap_or(&line);

                Ok(trimmed.to_owned())
            }
        }
    }
}

fn is_help(token: &str) -> bool {
    token == "--help" || token == "-h"
}

/// True if `--help` or `-h` appears before any `--`
fn requests_help(tokens: &[&str]) -> bool {
    tokens
        .iter()
        .take_while(|&&token| token != "--")
        .any(|&token| is_help(token))
}

fn coerce_positional(positional: &Positional, token: &str) -> Result<Value, ParseErrorKind> {
    coerce(token, positional.kind).map_err(|error| ParseErrorKind::Coercion {
        name: positional.name.clone(),
        error,
    })
}

/// First-pass visitor: resolves options against the schema and collects
/// positionals, in order, for the second pass.
struct OptionScan<'a, 's, 'arg> {
    schema: &'s Schema,
    values: &'a mut ParsedValues,
    deferred: &'a mut Vec<&'arg str>,
    help: &'a mut bool,
}

impl OptionScan<'_, '_, '_> {
    fn assign(self, option: &OptionParameter, token: &str) -> Result<(), ParseErrorKind> {
        let value = coerce(token, option.kind).map_err(|error| ParseErrorKind::Coercion {
            name: option.name.clone(),
            error,
        })?;

        trace!(option = %option.name, %value, "resolved option");
        self.values.insert(option.name.as_str(), value);
        Ok(())
    }

    fn take_value<'arg>(
        self,
        option: &OptionParameter,
        tag: impl FnOnce() -> String,
        arg: impl ArgAccess<'arg>,
    ) -> Result<(), ParseErrorKind> {
        if option.kind.is_bool() {
            trace!(option = %option.name, "resolved flag");
            self.values.insert(option.name.as_str(), Value::Bool(true));
            return Ok(());
        }

        let attached = arg.attached();

        match arg.take() {
            Some(token) if attached || !self.schema.is_option_token(token) => {
                self.assign(option, token)
            }
            _ => Err(ParseErrorKind::MissingOptionValue { option: tag() }),
        }
    }
}

impl<'arg> Visitor<'arg> for OptionScan<'_, '_, 'arg> {
    type Value = Result<(), ParseErrorKind>;

    fn visit_positional(self, argument: &'arg str) -> Self::Value {
        self.deferred.push(argument);
        Ok(())
    }

    fn visit_long_option(self, option: &'arg str, argument: &'arg str) -> Self::Value {
        let schema = self.schema;

        match schema.find_long(option) {
            Some(parameter) => self.assign(parameter, argument),
            None => Err(ParseErrorKind::UnrecognizedOption {
                option: format!("--{option}"),
            }),
        }
    }

    fn visit_long(self, option: &'arg str, arg: impl ArgAccess<'arg>) -> Self::Value {
        let schema = self.schema;

        match schema.find_long(option) {
            Some(parameter) => self.take_value(parameter, || format!("--{option}"), arg),
            None => Err(ParseErrorKind::UnrecognizedOption {
                option: format!("--{option}"),
            }),
        }
    }

    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value {
        let schema = self.schema;

        match schema.find_short(option) {
            Some(parameter) => self.take_value(parameter, || format!("-{option}"), arg),
            None if option == 'h' => {
                *self.help = true;
                Ok(())
            }
            None => Err(ParseErrorKind::UnrecognizedOption {
                option: format!("-{option}"),
            }),
        }
    }
}
