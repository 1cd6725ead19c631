use rustpython_parser::{parse, Mode};

/// Decides whether a row's content parses under a specific grammar.
///
/// The stack's Python partition carries Python 2 sources that no longer parse
/// under the current grammar; the matching reject tag is `python2`. Only a
/// Python validator is implemented, so the syntax stage is only meaningful for
/// Python shards — other languages need their own implementation wired into
/// the stage list.
pub trait SyntaxValidator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns false for anything the parser cannot consume. Never panics and
    /// never surfaces the parse error itself.
    fn is_valid(&self, source: &str) -> bool;
}

/// Validates that content parses as a current-version Python module.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonSyntaxValidator;

impl SyntaxValidator for PythonSyntaxValidator {
    fn name(&self) -> &'static str {
        "PythonSyntaxValidator"
    }

    fn is_valid(&self, source: &str) -> bool {
        parse(source, Mode::Module, "<row>").is_ok()
    }
}
