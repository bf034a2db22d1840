#![allow(dead_code)]
use std::path::PathBuf;

use cartk::args::StandardArgs;
#[cfg(feature = "clap")]
use cartk::clap::LogAndVerbosity;

pub const TEST_GENOMES: &str = "tests/data/test.gen";
pub const TEST_CIRCULAR: &str = "tests/data/test_circular.gen";
pub const TEST_HISTORY: &str = "tests/data/test.trs";
pub const TREE: &str = "(A,(B,C))";
pub const OUTDIR: &str = "tests/results";

pub fn standard_args() -> StandardArgs {
    std::fs::create_dir_all(OUTDIR).unwrap();
    StandardArgs {
        file: PathBuf::from(TEST_GENOMES),
        output: PathBuf::from(OUTDIR),
        prefix: None,
    }
}

#[cfg(feature = "clap")]
pub fn silent_verbosity() -> LogAndVerbosity {
    LogAndVerbosity {
        verbosity: 1,
        log_file: None,
        silent: false,
    }
}
