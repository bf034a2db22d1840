use color_eyre::{eyre::eyre, Result};

use crate::error::Error;
use crate::graphs::genome_graph::GenomeGraph;
use crate::structs::{BlockRegistry, Genome, SignedBlock, TwoBreak, Vertex};

/// The multi-genome breakpoint graph: one local partial genome graph per leaf
/// genome, over a shared block universe.
#[derive(Debug, Clone)]
pub struct BreakpointGraph {
    n_blocks: usize,
    local: Vec<GenomeGraph>,
}

impl BreakpointGraph {
    /// Builds one local graph per genome. Every genome must contain every
    /// registered block exactly once.
    pub fn from_genomes(genomes: &[Genome], registry: &BlockRegistry) -> Result<Self> {
        let n_blocks = registry.len();
        let mut local = Vec::with_capacity(genomes.len());
        for genome in genomes {
            local.push(adjacency_graph(genome, registry)?);
        }
        Ok(Self { n_blocks, local })
    }

    pub fn n_genomes(&self) -> usize {
        self.local.len()
    }

    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    pub fn local(&self, genome: usize) -> &GenomeGraph {
        &self.local[genome]
    }

    /// Applies the history front to back, each operation to every genome in
    /// its multicolor, moving the leaves to the common post-inference state.
    pub fn replay_history(&mut self, history: &[TwoBreak]) -> Result<()> {
        for op in history {
            for (i, graph) in self.local.iter_mut().enumerate() {
                if op.color().in_color(i) {
                    op.apply(graph)?;
                }
            }
        }
        Ok(())
    }

    /// True when all local graphs agree, i.e. the history is complete.
    pub fn locals_equal(&self) -> bool {
        self.local.windows(2).all(|pair| pair[0] == pair[1])
    }
}

fn leading(block: SignedBlock) -> Vertex {
    if block.forward {
        Vertex::tail(block.block)
    } else {
        Vertex::head(block.block)
    }
}

fn trailing(block: SignedBlock) -> Vertex {
    if block.forward {
        Vertex::head(block.block)
    } else {
        Vertex::tail(block.block)
    }
}

fn adjacency_graph(genome: &Genome, registry: &BlockRegistry) -> Result<GenomeGraph> {
    let mut seen = vec![false; registry.len()];
    for chromosome in &genome.chromosomes {
        for sb in &chromosome.blocks {
            let slot = seen.get_mut(sb.block as usize).ok_or_else(|| {
                eyre!(Error::BlockParse {
                    token: format!("{}", sb.block),
                })
            })?;
            if *slot {
                return Err(eyre!(Error::DuplicatedBlock {
                    genome: genome.name.clone(),
                    block: registry.name(sb.block).unwrap_or("?").to_string(),
                }));
            }
            *slot = true;
        }
    }
    if let Some(missing) = seen.iter().position(|s| !*s) {
        return Err(eyre!(Error::MissingBlock {
            genome: genome.name.clone(),
            block: registry.name(missing as u32).unwrap_or("?").to_string(),
        }));
    }

    let mut graph = GenomeGraph::new();
    for chromosome in &genome.chromosomes {
        for pair in chromosome.blocks.windows(2) {
            graph.insert(trailing(pair[0]), leading(pair[1]));
        }
        if chromosome.circular {
            if let (Some(last), Some(first)) =
                (chromosome.blocks.last(), chromosome.blocks.first())
            {
                graph.insert(trailing(*last), leading(*first));
            }
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Chromosome, Multicolor};

    fn registry(names: &[&str]) -> BlockRegistry {
        let mut r = BlockRegistry::default();
        for name in names {
            r.intern(name);
        }
        r
    }

    fn genome(name: &str, blocks: &[(u32, bool)], circular: bool) -> Genome {
        Genome {
            name: name.to_string(),
            chromosomes: vec![Chromosome {
                blocks: blocks
                    .iter()
                    .map(|(block, forward)| SignedBlock {
                        block: *block,
                        forward: *forward,
                    })
                    .collect(),
                circular,
            }],
        }
    }

    #[test]
    fn test_adjacencies_from_linear_genome() {
        let r = registry(&["a", "b", "c"]);
        let g = genome("A", &[(0, true), (1, false), (2, true)], false);
        let bg = BreakpointGraph::from_genomes(&[g], &r).unwrap();

        let local = bg.local(0);
        assert_eq!(local.partner(Vertex::head(0)).unwrap(), Vertex::head(1));
        assert_eq!(local.partner(Vertex::tail(1)).unwrap(), Vertex::tail(2));
        assert!(!local.defined(Vertex::tail(0)));
        assert!(!local.defined(Vertex::head(2)));
    }

    #[test]
    fn test_adjacencies_from_circular_genome() {
        let r = registry(&["a"]);
        let g = genome("A", &[(0, true)], true);
        let bg = BreakpointGraph::from_genomes(&[g], &r).unwrap();
        assert_eq!(bg.local(0).count_chromosomes(1).unwrap(), (1, 1));
    }

    #[test]
    fn test_missing_and_duplicated_blocks() {
        let r = registry(&["a", "b"]);
        let missing = genome("A", &[(0, true)], false);
        assert!(BreakpointGraph::from_genomes(&[missing], &r).is_err());

        let duplicated = genome("A", &[(0, true), (0, false)], false);
        assert!(BreakpointGraph::from_genomes(&[duplicated], &r).is_err());
    }

    #[test]
    fn test_replay_history_touches_only_colored_genomes() {
        let r = registry(&["a"]);
        let linear = genome("A", &[(0, true)], false);
        let circular = genome("B", &[(0, true)], true);
        let mut bg =
            BreakpointGraph::from_genomes(&[linear, circular], &r).unwrap();
        assert!(!bg.locals_equal());

        // Linearize genome 1 only.
        let op = TwoBreak::new(
            Vertex::tail(0),
            Vertex::head(0),
            Vertex::Infinity,
            Vertex::Infinity,
            Multicolor::single(1),
        );
        bg.replay_history(&[op]).unwrap();
        assert!(bg.locals_equal());
    }
}
