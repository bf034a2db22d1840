//! Graph structures for rearrangement analysis.

pub mod breakpoint_graph;
pub mod genome_graph;
pub mod phylogeny;
