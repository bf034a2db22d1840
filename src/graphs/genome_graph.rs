use std::collections::HashSet;
use std::collections::VecDeque;

use color_eyre::{eyre::eyre, Result};
use indexmap::IndexMap;

use crate::error::Error;
use crate::structs::{Chromosome, End, SignedBlock, Vertex};

/// All real extremities of blocks `0..n_blocks`, in a fixed order.
pub fn extremities(n_blocks: usize) -> impl Iterator<Item = Vertex> {
    (0..n_blocks as u32).flat_map(|block| [Vertex::tail(block), Vertex::head(block)])
}

/// The partial genome graph of one branch: a symmetric partial matching over
/// block extremities, one edge per adjacency between consecutive extremities
/// along that genome's chromosomes.
///
/// A vertex with no matching edge is a telomere endpoint; `Vertex::Infinity`
/// arcs in 2-breaks assert exactly that absence, so sentinels are never
/// stored. Equality compares edge content regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenomeGraph {
    adjacency: IndexMap<Vertex, Vertex>,
}

impl GenomeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defined(&self, v: Vertex) -> bool {
        self.adjacency.contains_key(&v)
    }

    pub fn partner(&self, v: Vertex) -> Result<Vertex> {
        self.adjacency.get(&v).copied().ok_or_else(|| {
            eyre!(Error::MissingAdjacency {
                vertex: v.to_string(),
            })
        })
    }

    /// Number of matching edges.
    pub fn len(&self) -> usize {
        self.adjacency.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Inserts the symmetric edge `x`-`y`. Sentinel endpoints make this a
    /// no-op: a telomere is the absence of an entry.
    pub fn insert(&mut self, x: Vertex, y: Vertex) {
        if x.is_infinity() || y.is_infinity() {
            return;
        }
        self.adjacency.insert(x, y);
        self.adjacency.insert(y, x);
    }

    /// Removes the edge `x`-`y`, verifying it is present. An `Infinity`
    /// endpoint asserts that the real endpoint is currently a telomere.
    pub fn erase(&mut self, x: Vertex, y: Vertex) -> Result<()> {
        match (x.is_infinity(), y.is_infinity()) {
            (true, true) => Ok(()),
            (false, true) => self.expect_telomere(x),
            (true, false) => self.expect_telomere(y),
            (false, false) => match self.adjacency.get(&x) {
                Some(&p) if p == y => {
                    self.adjacency.swap_remove(&x);
                    self.adjacency.swap_remove(&y);
                    Ok(())
                }
                _ => Err(eyre!(Error::MissingEdge {
                    x: x.to_string(),
                    y: y.to_string(),
                })),
            },
        }
    }

    fn expect_telomere(&self, v: Vertex) -> Result<()> {
        match self.adjacency.get(&v) {
            None => Ok(()),
            Some(p) => Err(eyre!(Error::UnexpectedEdge {
                vertex: v.to_string(),
                partner: p.to_string(),
            })),
        }
    }

    /// Walks the chromosome through `start`, alternating obverse and matching
    /// edges. Returns the signed block path, the circularity flag and the set
    /// of visited vertices; a second walk in the opposite direction recovers
    /// the portion before `start` on linear chromosomes.
    pub fn chromosome_from(&self, start: Vertex) -> Result<(Chromosome, HashSet<Vertex>)> {
        let mut visited = HashSet::new();
        let mut blocks: VecDeque<SignedBlock> = VecDeque::new();
        let mut circular = false;

        visited.insert(start);

        let mut y = start.obverse();
        loop {
            if !visited.insert(y) {
                circular = true;
                break;
            }
            if let Vertex::Extremity { block, end } = y {
                blocks.push_back(SignedBlock {
                    block,
                    forward: end == End::Head,
                });
            }
            if !self.defined(y) {
                break; // linear
            }
            y = self.partner(y)?;
            if !visited.insert(y) {
                circular = true;
                break;
            }
            y = y.obverse();
        }

        if !circular && self.defined(start) {
            let mut y = start;
            while self.defined(y) {
                y = self.partner(y)?;
                visited.insert(y);
                y = y.obverse();
                visited.insert(y);
                if let Vertex::Extremity { block, end } = y {
                    blocks.push_front(SignedBlock {
                        block,
                        forward: end == End::Tail,
                    });
                }
            }
        }

        Ok((
            Chromosome {
                blocks: blocks.into(),
                circular,
            },
            visited,
        ))
    }

    /// Partitions all extremities of blocks `0..n_blocks` into disjoint
    /// chromosomes. The result does not depend on edge storage order.
    pub fn chromosomes(&self, n_blocks: usize) -> Result<Vec<Chromosome>> {
        let mut processed: HashSet<Vertex> = HashSet::new();
        let mut all = Vec::new();

        for v in extremities(n_blocks) {
            if processed.contains(&v) {
                continue;
            }
            let (chromosome, visited) = self.chromosome_from(v)?;
            processed.extend(visited);
            all.push(chromosome);
        }

        Ok(all)
    }

    /// `(total, circular)` chromosome counts, the derived query that drives
    /// decircularization progress checks.
    pub fn count_chromosomes(&self, n_blocks: usize) -> Result<(usize, usize)> {
        let chromosomes = self.chromosomes(n_blocks)?;
        let circular = chromosomes.iter().filter(|c| c.circular).count();
        Ok((chromosomes.len(), circular))
    }
}
