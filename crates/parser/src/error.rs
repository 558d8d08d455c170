// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Fatal parsing errors. A rejected individual *line* is not an error — it
/// is silently dropped per the parser's documented behavior (see
/// [`crate::grammar::parse_line`]).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read blueprint {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read included file {path}: {source}")]
    UnreadableInclude {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
