#![cfg_attr(not(test), no_std)]

/*!
Low-level classification of command-line tokens. Takes care of the
distinctions between long options, short options, positionals, and the `--`
terminator. No type handling or schema lookup happens here; callers decide
which options take values through [`ArgAccess`]. Usually this is too low
level to use directly.
*/

mod populated_str;

use populated_str::PopulatedStr;

/**
The [`ArgumentsParser`] type operates by passing the tokens it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A positional token. This includes a lone `-`, and every token that
    /// follows a `--` terminator.
    fn visit_positional(self, argument: &'arg str) -> Self::Value;

    /// A long option that definitely has a value, because it was given
    /// as `--option=value`
    fn visit_long_option(self, option: &'arg str, argument: &'arg str) -> Self::Value;

    /// A long option or flag, such as `--option`
    fn visit_long(self, option: &'arg str, arg: impl ArgAccess<'arg>) -> Self::Value;

    /// A short option or flag, such as `-o`
    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given option needs a value,
based on the identity of the option.

Consider `--foo bar`. Is this a pair of tokens (the flag `--foo` and the
positional `bar`) or a single option `--foo bar` that takes a value?
Similarly, `-ab foo` could be `-a b`, `foo`; or `-a`, `-b foo`; or `-a`, `-b`,
`foo`. The [`ArgumentsParser`] can't independently classify a given token, so
instead a visitor requests a value via this trait only for options that need
one, and the parser works out where that value comes from.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get a value from the parser. This should only be called by options that
    need it; flags should simply ignore it, so that the next token (or the
    rest of a short cluster) is parsed independently.

    This returns [`None`] if all of the tokens have been exhausted, or if the
    next token is a `--` terminator. In the latter case the parser switches
    to positional-only mode.
    */
    fn take(self) -> Option<&'arg str>;

    /// True if [`take`][ArgAccess::take] would return the rest of a short
    /// cluster (the `value` in `-ovalue`) rather than a separate token.
    fn attached(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
enum State<'arg> {
    Ready,
    PositionalOnly,
    ShortInProgress(PopulatedStr<'arg>),
}

/**
An `ArgumentsParser` is the main entry point into `applause_parser`. It
classifies one token per call to `next_arg`, sending it to the given
[`Visitor`]. It handles distinguishing flags, options, and positionals; the
logic of where option values come from; and the `--` terminator.

The parser operates entirely on borrowed data. The `'arg` lifetime refers to
the borrowed command-line tokens, which are loaded once early in `main`.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<'arg, I> {
    state: State<'arg>,
    args: I,
}

impl<'arg, I> ArgumentsParser<'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of tokens. This list
    should *exclude* the name of the program, which is commonly passed as
    the first argument.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            state: State::Ready,
            args: args.into_iter(),
        }
    }

    /// True if a `--` terminator has been seen
    #[inline]
    #[must_use]
    pub fn positional_only(&self) -> bool {
        matches!(self.state, State::PositionalOnly)
    }

    /// Put `self` into a `PositionalOnly` state, then process a positional
    /// token
    #[inline]
    fn positional_only_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        debug_assert!(!matches!(self.state, State::ShortInProgress(_)));

        self.state = State::PositionalOnly;
        self.args.next().map(|arg| visitor.visit_positional(arg))
    }

    /// Put `self` into a `Ready` state, then return a StandardArgAccess
    #[inline]
    fn standard_arg(&mut self) -> StandardArgAccess<'_, 'arg, I> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::Ready;
        StandardArgAccess { parent: self }
    }

    /// Put `self` into a `ShortInProgress` state, then return a
    /// ShortArgAccess.
    #[inline]
    fn short_arg(&mut self, short: PopulatedStr<'arg>) -> ShortArgAccess<'_, 'arg> {
        debug_assert!(!matches!(self.state, State::PositionalOnly));

        self.state = State::ShortInProgress(short);
        ShortArgAccess {
            short: short.get(),
            state: &mut self.state,
        }
    }

    /// Handle a `-s` short option. If there is remaining content in the
    /// cluster, it's a candidate for the value; otherwise, the next token is
    /// the candidate.
    #[inline]
    fn handle_short<V>(&mut self, short: PopulatedStr<'arg>, visitor: V) -> V::Value
    where
        V: Visitor<'arg>,
    {
        let (option, rest) = short.split_first();

        match PopulatedStr::new(rest) {
            None => visitor.visit_short(option, self.standard_arg()),
            Some(rest) => visitor.visit_short(option, self.short_arg(rest)),
        }
    }

    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        match self.state {
            State::Ready => match self.args.next()? {
                "--" => self.positional_only_arg(visitor),
                argument => Some(match argument.strip_prefix("--") {
                    Some(option) => match split_once(option, b'=') {
                        Some((option, argument)) => visitor.visit_long_option(option, argument),
                        None => visitor.visit_long(option, self.standard_arg()),
                    },
                    None => match argument.strip_prefix('-').and_then(PopulatedStr::new) {
                        Some(short) => self.handle_short(short, visitor),
                        None => visitor.visit_positional(argument),
                    },
                }),
            },
            State::PositionalOnly => self.positional_only_arg(visitor),
            State::ShortInProgress(short) => Some(self.handle_short(short, visitor)),
        }
    }
}

/// ArgAccess implementation that gets the next token from the list.
/// Handles the `--` terminator.
struct StandardArgAccess<'a, 'arg, I> {
    parent: &'a mut ArgumentsParser<'arg, I>,
}

impl<'arg, I> ArgAccess<'arg> for StandardArgAccess<'_, 'arg, I>
where
    I: Iterator<Item = &'arg str>,
{
    fn take(self) -> Option<&'arg str> {
        match self.parent.args.next()? {
            "--" => {
                self.parent.state = State::PositionalOnly;
                None
            }
            arg => Some(arg),
        }
    }

    #[inline(always)]
    fn attached(&self) -> bool {
        false
    }
}

/// ArgAccess implementation that gets the remainder of a short cluster.
/// Handles things like `-ovalue`, which is equivalent to `-o value`.
struct ShortArgAccess<'a, 'arg> {
    short: &'arg str,
    state: &'a mut State<'arg>,
}

impl<'arg> ArgAccess<'arg> for ShortArgAccess<'_, 'arg> {
    fn take(self) -> Option<&'arg str> {
        debug_assert!(
            matches!(*self.state, State::ShortInProgress(short) if short.get() == self.short)
        );

        *self.state = State::Ready;
        Some(self.short)
    }

    #[inline(always)]
    fn attached(&self) -> bool {
        true
    }
}

fn split_once(input: &str, delimiter: u8) -> Option<(&str, &str)> {
    // The delimiter is ASCII, so both halves are on char boundaries
    memchr::memchr(delimiter, input.as_bytes()).map(|i| (&input[..i], &input[i + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event<'a> {
        Positional(&'a str),
        LongOption(&'a str, &'a str),
        Long(&'a str, Option<&'a str>),
        Short(char, Option<&'a str>, bool),
    }

    /// Records every token. Options listed in `takes` request a value.
    struct Recorder<'t> {
        takes: &'t [&'t str],
    }

    impl<'arg> Visitor<'arg> for Recorder<'_> {
        type Value = Event<'arg>;

        fn visit_positional(self, argument: &'arg str) -> Self::Value {
            Event::Positional(argument)
        }

        fn visit_long_option(self, option: &'arg str, argument: &'arg str) -> Self::Value {
            Event::LongOption(option, argument)
        }

        fn visit_long(self, option: &'arg str, arg: impl ArgAccess<'arg>) -> Self::Value {
            let value = self.takes.contains(&option).then(|| arg.take()).flatten();
            Event::Long(option, value)
        }

        fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value {
            let mut buf = [0; 4];
            let name: &str = option.encode_utf8(&mut buf);
            let attached = arg.attached();
            let value = self.takes.contains(&name).then(|| arg.take()).flatten();
            Event::Short(option, value, attached)
        }
    }

    fn run<'a>(tokens: &[&'a str], takes: &[&str]) -> Vec<Event<'a>> {
        let mut parser = ArgumentsParser::new(tokens.iter().copied());
        let mut events = Vec::new();

        while let Some(event) = parser.next_arg(Recorder { takes }) {
            events.push(event);
        }

        events
    }

    #[test]
    fn classifies_basic_tokens() {
        let events = run(&["-v", "input", "--out", "file", "--mode=fast"], &["out"]);

        assert_eq!(
            events,
            [
                Event::Short('v', None, false),
                Event::Positional("input"),
                Event::Long("out", Some("file")),
                Event::LongOption("mode", "fast"),
            ]
        );
    }

    #[test]
    fn terminator_makes_everything_positional() {
        let events = run(&["a", "--", "--flag", "-x", "--"], &[]);

        assert_eq!(
            events,
            [
                Event::Positional("a"),
                Event::Positional("--flag"),
                Event::Positional("-x"),
                Event::Positional("--"),
            ]
        );
    }

    #[test]
    fn lone_dash_is_positional() {
        assert_eq!(run(&["-"], &[]), [Event::Positional("-")]);
    }

    #[test]
    fn short_cluster_of_flags() {
        let events = run(&["-abc"], &[]);

        assert_eq!(
            events,
            [
                Event::Short('a', None, true),
                Event::Short('b', None, true),
                Event::Short('c', None, false),
            ]
        );
    }

    #[test]
    fn short_with_attached_value() {
        let events = run(&["-vofile", "next"], &["o"]);

        assert_eq!(
            events,
            [
                Event::Short('v', None, true),
                Event::Short('o', Some("file"), true),
                Event::Positional("next"),
            ]
        );
    }

    #[test]
    fn terminator_is_never_a_value() {
        let mut parser = ArgumentsParser::new(["--out", "--", "x"]);

        assert_eq!(
            parser.next_arg(Recorder { takes: &["out"] }),
            Some(Event::Long("out", None))
        );
        assert!(parser.positional_only());
        assert_eq!(
            parser.next_arg(Recorder { takes: &[] }),
            Some(Event::Positional("x"))
        );
    }
}
