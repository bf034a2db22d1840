mod common;
use std::path::PathBuf;

use cartk::graphs::breakpoint_graph::BreakpointGraph;
use cartk::graphs::phylogeny::Phylogeny;
use cartk::io::{read_genomes, read_history};
use cartk::subcommands::recover::recover_genomes;
use cartk::utils::mcolor_to_name;

#[test]
fn recover_through_the_library() {
    let (genomes, registry) = read_genomes(&PathBuf::from(common::TEST_GENOMES)).unwrap();
    let names: Vec<String> = genomes.iter().map(|g| g.name.clone()).collect();

    let phylogeny = Phylogeny::parse(common::TREE, &names).unwrap();
    let mut graph = BreakpointGraph::from_genomes(&genomes, &registry).unwrap();
    let history = read_history(&PathBuf::from(common::TEST_HISTORY), &names, &registry).unwrap();

    graph.replay_history(&history).unwrap();
    assert!(graph.locals_equal());

    let recovered = recover_genomes(&graph, &phylogeny, &history).unwrap();

    let branch_names: Vec<String> = phylogeny
        .branch_colors()
        .iter()
        .map(|c| mcolor_to_name(c, &names))
        .collect();
    assert_eq!(branch_names, vec!["A", "B", "C", "BC"]);

    // The BC ancestor equals the B and C leaves, the A ancestor equals the root.
    let bc = recovered.genomes[3].chromosomes(graph.n_blocks()).unwrap();
    assert_eq!(bc, genomes[1].chromosomes);
    assert_eq!(&recovered.genomes[0], graph.local(0));

    assert_eq!(recovered.tallies[3].reversals, 1);
    assert_eq!(recovered.transformations[3].len(), 1);
    assert_eq!(recovered.transformations[3][0], history[0]);
    for outcome in &recovered.outcomes {
        assert_eq!(outcome.residual_circular, 0);
        assert!(outcome.fault.is_none());
    }
}

#[test]
fn history_replay_is_undone_by_recovery() {
    let (genomes, registry) = read_genomes(&PathBuf::from(common::TEST_GENOMES)).unwrap();
    let names: Vec<String> = genomes.iter().map(|g| g.name.clone()).collect();

    let baseline = BreakpointGraph::from_genomes(&genomes, &registry).unwrap();
    let mut graph = baseline.clone();
    let history = read_history(&PathBuf::from(common::TEST_HISTORY), &names, &registry).unwrap();
    graph.replay_history(&history).unwrap();

    // Leaf branches read back as the input leaf genomes.
    let phylogeny = Phylogeny::parse(common::TREE, &names).unwrap();
    let recovered = recover_genomes(&graph, &phylogeny, &history).unwrap();
    for (leaf, genome) in genomes.iter().enumerate() {
        let chromosomes = recovered.genomes[leaf].chromosomes(graph.n_blocks()).unwrap();
        assert_eq!(chromosomes, genome.chromosomes, "leaf {}", genome.name);
    }
}
