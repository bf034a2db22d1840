use std::collections::BTreeSet;
use std::path::PathBuf;

use color_eyre::{eyre::eyre, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::args::StandardArgs;
use crate::error::Error;
use crate::graphs::breakpoint_graph::BreakpointGraph;
use crate::graphs::genome_graph::GenomeGraph;
use crate::graphs::phylogeny::Phylogeny;
use crate::io::{
    get_output, push_to_output, read_genomes, read_history, write_genome, write_history,
};
use crate::structs::{Genome, Transformation, TwoBreak};
use crate::subcommands::decircularize::decircularize;
use crate::utils::mcolor_to_name;

/// Rearrangement kinds observed while unwinding one branch's history.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationTally {
    pub reversals: usize,
    pub translocations: usize,
    pub fissions_fusions: usize,
}

impl OperationTally {
    pub fn total(&self) -> usize {
        self.reversals + self.translocations + self.fissions_fusions
    }
}

#[derive(Debug, Default, Clone)]
pub struct BranchOutcome {
    pub residual_circular: usize,
    pub fault: Option<String>,
}

/// Ancestral genomes, one per tree branch, plus each branch's retained
/// sub-history and bookkeeping.
#[derive(Debug, Clone)]
pub struct RecoveredGenomes {
    pub genomes: Vec<GenomeGraph>,
    pub transformations: Vec<Transformation>,
    pub tallies: Vec<OperationTally>,
    pub outcomes: Vec<BranchOutcome>,
}

/// Reconstructs the genome at every tree branch by replaying the history in
/// reverse from the root genome.
///
/// The graph must already have the full history applied so that every local
/// genome agrees (the root). Each operation is undone in every branch whose
/// color its own color includes; on an exact color match the operation also
/// joins that branch's retained transformation and is classified as a
/// reversal, translocation or fission/fusion. Afterwards every branch genome
/// is linearized and the extracted fissions are handed to adjacent branches
/// with disjoint colors.
pub fn recover_genomes(
    graph: &BreakpointGraph,
    phylogeny: &Phylogeny,
    history: &[TwoBreak],
) -> Result<RecoveredGenomes> {
    if !graph.locals_equal() {
        return Err(eyre!(Error::IncompleteHistory));
    }

    let n_blocks = graph.n_blocks();
    let n_branches = phylogeny.n_branches();

    let mut genomes = vec![graph.local(0).clone(); n_branches];
    let mut transformations = vec![Transformation::new(); n_branches];
    let mut tallies = vec![OperationTally::default(); n_branches];
    let mut outcomes = vec![BranchOutcome::default(); n_branches];

    for op in history.iter().rev() {
        debug!("Reverting {op}");

        for (i, branch_color) in phylogeny.branch_colors().iter().enumerate() {
            if !op.color().includes(branch_color) {
                continue;
            }
            let exact = op.color() == branch_color;

            let nchr_old = if exact {
                genomes[i].count_chromosomes(n_blocks)?.0
            } else {
                0
            };

            op.inverse().apply(&mut genomes[i])?;

            if exact {
                transformations[i].push_front(op.clone());
                classify(op, &genomes[i], n_blocks, nchr_old, &mut tallies[i])?;
            }
        }
    }

    for i in 0..n_branches {
        let branch_color = phylogeny.branch_color(i).clone();
        match decircularize(
            &mut genomes[i],
            &mut transformations[i],
            &branch_color,
            n_blocks,
        ) {
            Ok(out) => {
                outcomes[i].residual_circular = out.residual;
                for op in out.extracted {
                    for j in 0..n_branches {
                        if j != i
                            && phylogeny.are_adjacent_branches(i, j)
                            && phylogeny.branch_color(j).intersection(op.color()).is_empty()
                        {
                            transformations[j].push_back(op.clone());
                        }
                    }
                }
            }
            Err(e) => outcomes[i].fault = Some(e.to_string()),
        }
    }

    Ok(RecoveredGenomes {
        genomes,
        transformations,
        tallies,
        outcomes,
    })
}

/* An undone operation touching a single chromosome is a reversal; one whose
 * endpoints span two chromosomes is a translocation, unless the chromosome
 * count itself changed, which marks a fission or fusion. */
fn classify(
    op: &TwoBreak,
    genome: &GenomeGraph,
    n_blocks: usize,
    nchr_old: usize,
    tally: &mut OperationTally,
) -> Result<()> {
    let vertices: BTreeSet<_> = op.vertices().filter(|v| !v.is_infinity()).collect();

    let mut samechr = true;
    let mut iter = vertices.iter();
    if let Some(first) = iter.next() {
        let (_, seen) = genome.chromosome_from(*first)?;
        samechr = iter.all(|v| seen.contains(v));
    }

    let nchr_new = genome.count_chromosomes(n_blocks)?.0;
    if nchr_new != nchr_old {
        tally.fissions_fusions += 1;
    } else if samechr {
        tally.reversals += 1;
    } else {
        tally.translocations += 1;
    }
    Ok(())
}

#[derive(Serialize, Debug)]
struct BranchSummary {
    name: String,
    reversals: usize,
    translocations: usize,
    fissions_fusions: usize,
    operations: usize,
    residual_circular: usize,
    fault: Option<String>,
}

#[derive(Serialize, Debug)]
struct Summary {
    branches: Vec<BranchSummary>,
    total: OperationTally,
}

#[doc(hidden)]
pub fn run(args: StandardArgs, history: PathBuf, tree: String) -> Result<()> {
    let (genomes, registry) = read_genomes(&args.file)?;
    let names: Vec<String> = genomes.iter().map(|g| g.name.clone()).collect();

    let phylogeny = Phylogeny::parse(&tree, &names)?;
    let mut graph = BreakpointGraph::from_genomes(&genomes, &registry)?;
    let history = read_history(&history, &names, &registry)?;

    graph.replay_history(&history)?;
    let recovered = recover_genomes(&graph, &phylogeny, &history)?;

    let n_blocks = graph.n_blocks();
    let mut branches = Vec::with_capacity(phylogeny.n_branches());
    let mut total = OperationTally::default();

    for (i, color) in phylogeny.branch_colors().iter().enumerate() {
        let name = mcolor_to_name(color, &names);

        let ancestor = Genome {
            name: name.clone(),
            chromosomes: recovered.genomes[i].chromosomes(n_blocks)?,
        };
        let mut path = args.output.clone();
        push_to_output(&args, &mut path, &name, "gen");
        let mut output = get_output(Some(path))?;
        write_genome(&mut output, &ancestor, &registry)?;

        let mut path = args.output.clone();
        push_to_output(&args, &mut path, &name, "trs");
        let mut output = get_output(Some(path))?;
        write_history(&mut output, &recovered.transformations[i], &names, &registry)?;

        let tally = &recovered.tallies[i];
        total.reversals += tally.reversals;
        total.translocations += tally.translocations;
        total.fissions_fusions += tally.fissions_fusions;

        branches.push(BranchSummary {
            name,
            reversals: tally.reversals,
            translocations: tally.translocations,
            fissions_fusions: tally.fissions_fusions,
            operations: recovered.transformations[i].len(),
            residual_circular: recovered.outcomes[i].residual_circular,
            fault: recovered.outcomes[i].fault.clone(),
        });
    }

    info!(
        "Reversals / translocations / fissions+fusions: {} / {} / {} ({} in total)",
        total.reversals,
        total.translocations,
        total.fissions_fusions,
        total.total()
    );

    let summary = Summary { branches, total };
    let mut path = args.output.clone();
    push_to_output(&args, &mut path, "summary", "json");
    let output = get_output(Some(path))?;
    serde_json::to_writer_pretty(output, &summary)?;

    Ok(())
}
