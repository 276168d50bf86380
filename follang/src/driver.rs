use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::{Error, ParseError};
use crate::ir::ast;
use crate::parser::Parser;
use crate::parser::lexer::{Lexer, Token};
use crate::parser::precedence::PrecedenceTable;

pub const PROMPT: &str = "ready> ";

#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Printed before every top-level step; `None` for non-interactive input.
    pub prompt: Option<String>,
    /// Print every parsed tree after the success message.
    pub show_ast: bool,
    /// Parse anything that is not `def` or `;` as an expression instead of
    /// skipping it with a warning.
    pub expressions: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            prompt: Some(PROMPT.to_string()),
            show_ast: false,
            expressions: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevel {
    Definition(ast::Function),
    Expression(ast::Expression),
}

/// What a run of the driver produced, in input order.
#[derive(Debug, Default)]
pub struct Session {
    pub items: Vec<TopLevel>,
    pub errors: Vec<ParseError>,
    pub warnings: usize,
}

impl Session {
    pub fn definitions(&self) -> impl Iterator<Item = &ast::Function> {
        self.items.iter().filter_map(|item| match item {
            TopLevel::Definition(function) => Some(function),
            TopLevel::Expression(_) => None,
        })
    }
}

/// The top-level loop: `toplevel ::= definition | ';' | expression`.
///
/// A failed item never stops the loop. After reporting it the driver throws
/// away exactly one token and carries on, so the loop ends only at end of
/// input.
pub struct Driver<I: Iterator<Item = char>, W: Write> {
    parser: Parser<I>,
    out: W,
    options: DriverOptions,
}

impl<I: Iterator<Item = char>, W: Write> Driver<I, W> {
    pub fn new(parser: Parser<I>, out: W, options: DriverOptions) -> Self {
        Self {
            parser,
            out,
            options,
        }
    }

    pub fn run(mut self) -> io::Result<Session> {
        let mut session = Session::default();

        self.prompt()?;
        self.parser.next_token();

        loop {
            self.prompt()?;
            match self.parser.current() {
                Token::Eof => break,
                Token::Char(';') => {
                    self.parser.next_token();
                }
                Token::Def => {
                    let parsed = self.parser.parse_definition().map(TopLevel::Definition);
                    self.report(parsed, &mut session)?;
                }
                _ if self.options.expressions => {
                    let parsed = self.parser.parse_expression().map(TopLevel::Expression);
                    self.report(parsed, &mut session)?;
                }
                token => {
                    warn!("{}: skipping {} at top level", self.parser.span(), token);
                    writeln!(self.out, "Warning: unexpected {} at top level", token)?;
                    session.warnings += 1;
                    self.parser.next_token();
                }
            }
        }

        debug!(
            "input finished: {} item(s), {} error(s), {} warning(s)",
            session.items.len(),
            session.errors.len(),
            session.warnings
        );
        self.out.flush()?;
        Ok(session)
    }

    fn report(&mut self, parsed: Result<TopLevel, ParseError>, session: &mut Session) -> io::Result<()> {
        match parsed {
            Ok(item) => {
                match &item {
                    TopLevel::Definition(function) => {
                        writeln!(self.out, "Parsed a function definition.")?;
                        if self.options.show_ast {
                            writeln!(self.out, "{}", function)?;
                        }
                    }
                    TopLevel::Expression(expr) => {
                        writeln!(self.out, "Parsed a top-level expression.")?;
                        if self.options.show_ast {
                            writeln!(self.out, "{}", expr)?;
                        }
                    }
                }
                session.items.push(item);
            }
            Err(err) => {
                writeln!(self.out, "Error: {}", err)?;
                // Skip token for error recovery.
                debug!("recovering: dropping {}", self.parser.current());
                self.parser.next_token();
                session.errors.push(err);
            }
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        if let Some(prompt) = &self.options.prompt {
            write!(self.out, "{}", prompt)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Reads a whole source file and drives it, reporting to `out`.
pub fn run_file<W: Write>(
    path: impl AsRef<Path>,
    precedence: PrecedenceTable,
    options: DriverOptions,
    out: W,
) -> Result<Session, Error> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    info!("parsing {} ({} bytes)", path.display(), source.len());

    let parser = Parser::new(Lexer::new(source.chars()), precedence);
    Ok(Driver::new(parser, out, options).run()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str, options: DriverOptions) -> (Session, String) {
        let parser = Parser::new(Lexer::new(source.chars()), PrecedenceTable::default());
        let mut out = Vec::new();
        let session = Driver::new(parser, &mut out, options).run().unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    fn quiet() -> DriverOptions {
        DriverOptions {
            prompt: None,
            ..DriverOptions::default()
        }
    }

    #[test]
    fn empty_input_ends_quietly() {
        let (session, out) = run("", quiet());
        assert!(session.items.is_empty());
        assert!(session.errors.is_empty());
        assert_eq!(out, "");
    }

    #[test]
    fn semicolons_produce_nothing() {
        let (session, out) = run(";;  ;", quiet());
        assert!(session.items.is_empty());
        assert!(session.errors.is_empty());
        assert_eq!(session.warnings, 0);
        assert_eq!(out, "");
    }

    #[test]
    fn definitions_are_collected_in_order() {
        let (session, out) = run("def f(x) x; def g() forall y, f(y)", quiet());
        let names: Vec<_> = session.definitions().map(|f| f.prototype.name.as_str()).collect();
        assert_eq!(names, vec!["f", "g"]);
        assert_eq!(out, "Parsed a function definition.\nParsed a function definition.\n");
    }

    #[test]
    fn prompt_before_every_step() {
        let (_, out) = run("def f() a;", DriverOptions::default());
        assert_eq!(out, "ready> ready> Parsed a function definition.\nready> ready> ");
    }

    #[test]
    fn failed_definition_skips_one_token() {
        // The bad prototype stops at the second `x`; recovery drops it, then
        // `)` and `y` are skipped with warnings.
        let (session, out) = run("def f(x x) y; def g() z", quiet());
        assert_eq!(session.errors.len(), 1);
        assert!(matches!(session.errors[0], ParseError::MissingPrototypeClose { .. }));
        assert_eq!(session.warnings, 2);
        assert_eq!(session.definitions().count(), 1);
        assert!(out.starts_with("Error: line 1, column 9: expected ')' in prototype\n"));
    }

    #[test]
    fn stray_tokens_warn_and_advance() {
        let (session, out) = run("x ) def f() y", quiet());
        assert_eq!(session.warnings, 2);
        assert_eq!(session.definitions().count(), 1);
        assert!(out.contains("Warning: unexpected identifier 'x' at top level\n"));
        assert!(out.contains("Warning: unexpected ')' at top level\n"));
    }

    #[test]
    fn top_level_expressions_when_enabled() {
        let options = DriverOptions {
            expressions: true,
            show_ast: true,
            ..quiet()
        };
        let (session, out) = run("a /\\ b \\/ c;", options);
        assert_eq!(session.items.len(), 1);
        assert!(matches!(session.items[0], TopLevel::Expression(_)));
        assert_eq!(out, "Parsed a top-level expression.\n((a /\\ b) \\/ c)\n");
    }

    #[test]
    fn run_file_reads_source() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/sample.fol");
        let session = run_file(path, PrecedenceTable::default(), quiet(), io::sink()).unwrap();
        assert_eq!(session.definitions().count(), 4);
        assert!(session.errors.is_empty());
    }

    #[test]
    fn run_file_reports_missing_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/no-such-file.fol");
        let err = run_file(path, PrecedenceTable::default(), quiet(), io::sink()).unwrap_err();
        assert!(matches!(err, Error::IoError { .. }));
        assert!(err.to_string().starts_with("IO error: "));
    }
}
