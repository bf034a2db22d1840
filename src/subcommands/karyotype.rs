use color_eyre::Result;
use tracing::info;

use crate::args::StandardArgs;
use crate::graphs::breakpoint_graph::BreakpointGraph;
use crate::io::{open_csv_writer, push_to_output, read_genomes};

/// Reads a GRIMM genome file and writes per-genome chromosome counts as a CSV.
#[doc(hidden)]
pub fn run(args: StandardArgs) -> Result<()> {
    let (genomes, registry) = read_genomes(&args.file)?;
    let graph = BreakpointGraph::from_genomes(&genomes, &registry)?;

    let mut output = args.output.clone();
    push_to_output(&args, &mut output, "karyotype", "csv");
    let mut writer = open_csv_writer(output)?;

    writer.write_record(["genome", "blocks", "chromosomes", "circular"])?;

    for (i, genome) in genomes.iter().enumerate() {
        let blocks: usize = genome.chromosomes.iter().map(|c| c.len()).sum();
        let (total, circular) = graph.local(i).count_chromosomes(graph.n_blocks())?;

        info!(
            "Genome {} has {total} chromosome(s), {circular} circular, over {blocks} block(s)",
            genome.name
        );
        writer.write_record([
            genome.name.clone(),
            blocks.to_string(),
            total.to_string(),
            circular.to_string(),
        ])?;
    }

    Ok(())
}
