//! Merger command lines.
//!
//! ```text
//! <merger> [<cover>] [<toc>] <seg-1> ... <seg-N> cat output <result>
//! <merger> <result> background <watermark> output <target>
//! ```

use std::path::Path;

use crate::command::{Arg, CommandLine};
use crate::error::Result;

fn path_arg(path: &Path) -> Arg {
    Arg::plain(path.to_string_lossy())
}

/// Concatenate `inputs` in order into `output`.
///
/// # Errors
///
/// Returns [`crate::PdfBindError::CommandFailed`] if the command is too long.
pub fn concatenate<'a>(
    program: &str,
    inputs: impl IntoIterator<Item = &'a Path>,
    output: &Path,
) -> Result<CommandLine> {
    let mut args: Vec<Arg> = inputs.into_iter().map(path_arg).collect();
    args.push(Arg::plain("cat"));
    args.push(Arg::plain("output"));
    args.push(path_arg(output));
    CommandLine::new(program, args)
}

/// Stamp `watermark` behind every page of `input`, writing `output`.
///
/// # Errors
///
/// Returns [`crate::PdfBindError::CommandFailed`] if the command is too long.
pub fn stamp(program: &str, input: &Path, watermark: &Path, output: &Path) -> Result<CommandLine> {
    CommandLine::new(
        program,
        vec![
            path_arg(input),
            Arg::plain("background"),
            path_arg(watermark),
            Arg::plain("output"),
            path_arg(output),
        ],
    )
}
