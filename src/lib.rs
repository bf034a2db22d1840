#![allow(
    clippy::too_many_arguments,
    clippy::new_without_default,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc,
    clippy::too_many_lines,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::return_self_not_must_use,
    clippy::needless_pass_by_value,
    clippy::default_trait_access
)]

// CARTK - Contiguous ancestral region toolkit
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! CARTK - Contiguous ancestral region toolkit
//!
//! Reconstructs the ancestral genomes of a phylogenetic tree of species from
//! a multicolored 2-break history over a breakpoint graph. Given the leaf
//! genomes in GRIMM format, the tree topology, and the chronological sequence
//! of 2-breaks (reversals, translocations, fissions, fusions) that transformed
//! the leaves into a common state, `cartk` replays the history backwards along
//! every branch, repairs genomes that end up with biologically invalid
//! circular chromosomes, and writes one genome plus one retained
//! transformation per tree branch.
//!
//! CARTK commands
//!
//! * Recover ancestral genomes over a phylogeny from a 2-break history
//! * Report per-genome karyotypes (chromosome counts) of a genome file
//!
//! # Getting started
//!
//! ```bash
//! cartk recover genomes.gen --history history.trs --tree "(A,(B,C))" -o results
//! cartk karyotype genomes.gen -o results
//! ```

pub mod libs;
pub use libs::{args, error, io, structs, utils};

#[cfg(feature = "clap")]
pub use libs::clap;

/// Genome graphs, the multi-genome breakpoint graph and the phylogeny
pub mod graphs;

/// CARTK commands
pub mod subcommands;
