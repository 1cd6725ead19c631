mod quality;
mod syntax;

pub use quality::{
    build_stages, REASON_ALPHANUM_FRAC, REASON_AVE_LL, REASON_FILE_TOO_LARGE,
    REASON_FILE_TOO_SMALL, REASON_MAX_LL, REASON_MIN_LINES, REASON_SYNTAX,
};
pub use syntax::{PythonSyntaxValidator, SyntaxValidator};
