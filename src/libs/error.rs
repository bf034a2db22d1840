use std::path::PathBuf;

use thiserror::Error as ThisError;

#[rustfmt::skip]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Io error: {0} {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Io error: {0}")]
    StdIo(#[from] std::io::Error),

    #[error("Io error: {0} {1}")]
    Path(PathBuf, String),

    #[error("No adjacency is defined at vertex {vertex}")]
    MissingAdjacency { vertex: String },

    #[error("2-break requires the edge {x}-{y} which is not present")]
    MissingEdge { x: String, y: String },

    #[error("2-break requires a telomere at {vertex}, but it is adjacent to {partner}")]
    UnexpectedEdge { vertex: String, partner: String },

    #[error("Operation color {color} is neither disjoint from nor equal to branch color {branch}: the input history is malformed")]
    ForeignColor { color: String, branch: String },

    #[error("History is incomplete: the initial branch genomes disagree, cannot reconstruct ancestors")]
    IncompleteHistory,

    #[error("Unknown genome name: {name}")]
    UnknownGenome { name: String },

    #[error("Failed to parse vertex token: {token}")]
    VertexParse { token: String },

    #[error("Failed to parse block token: {token}")]
    BlockParse { token: String },

    #[error("Genome {genome} is missing block {block}")]
    MissingBlock { genome: String, block: String },

    #[error("Genome {genome} contains block {block} more than once")]
    DuplicatedBlock { genome: String, block: String },

    #[error("Could not parse 2-break at line {line}: {text}")]
    HistoryParse { line: usize, text: String },

    #[error("Genome file error at line {line}: {reason}")]
    GenomeParse { line: usize, reason: String },

    #[error("Failed to parse tree: {reason}")]
    TreeParse { reason: String },
}
