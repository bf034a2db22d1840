use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::str::FromStr;

use color_eyre::Result;
use indexmap::IndexSet;
use itertools::{EitherOrBoth, Itertools};

use crate::error::Error;
use crate::graphs::genome_graph::GenomeGraph;

/// Which end of a synteny block a vertex stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum End {
    Tail,
    Head,
}

impl std::fmt::Display for End {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Tail => write!(f, "t"),
            Self::Head => write!(f, "h"),
        }
    }
}

/// One extremity of one block copy, or the telomere sentinel.
///
/// Every real extremity has an obverse: the other end of the same block.
/// `Infinity` marks the open end of a linear chromosome inside 2-break arcs
/// and is never stored inside a genome graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vertex {
    Extremity { block: u32, end: End },
    Infinity,
}

impl Vertex {
    pub fn tail(block: u32) -> Self {
        Self::Extremity {
            block,
            end: End::Tail,
        }
    }

    pub fn head(block: u32) -> Self {
        Self::Extremity {
            block,
            end: End::Head,
        }
    }

    pub fn is_infinity(self) -> bool {
        self == Self::Infinity
    }

    /// The other extremity of the same block. The sentinel is its own obverse.
    pub fn obverse(self) -> Self {
        match self {
            Self::Extremity { block, end: End::Tail } => Self::head(block),
            Self::Extremity { block, end: End::Head } => Self::tail(block),
            Self::Infinity => Self::Infinity,
        }
    }

    pub fn block(self) -> Option<u32> {
        match self {
            Self::Extremity { block, .. } => Some(block),
            Self::Infinity => None,
        }
    }
}

impl std::fmt::Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Extremity { block, end: End::Tail } => write!(f, "{block}t"),
            Self::Extremity { block, end: End::Head } => write!(f, "{block}h"),
            Self::Infinity => write!(f, "oo"),
        }
    }
}

impl FromStr for Vertex {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Error> {
        if token == "oo" {
            return Ok(Self::Infinity);
        }
        let err = || Error::VertexParse {
            token: token.into(),
        };
        let (digits, end) = match token.as_bytes().last() {
            Some(b't') => (&token[..token.len() - 1], End::Tail),
            Some(b'h') => (&token[..token.len() - 1], End::Head),
            _ => return Err(err()),
        };
        let block = digits.parse::<u32>().map_err(|_| err())?;
        Ok(Self::Extremity { block, end })
    }
}

/// A block with a reading direction, one entry of a chromosome path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedBlock {
    pub block: u32,
    pub forward: bool,
}

impl SignedBlock {
    pub fn reversed(self) -> Self {
        Self {
            block: self.block,
            forward: !self.forward,
        }
    }
}

/// A chromosome is derived, not stored: an ordered signed block path plus a
/// circularity flag, recomputed on demand by the chromosome walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    pub blocks: Vec<SignedBlock>,
    pub circular: bool,
}

impl Chromosome {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One genome as read from a GRIMM file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pub name: String,
    pub chromosomes: Vec<Chromosome>,
}

impl Genome {
    pub fn n_blocks(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::len).sum()
    }
}

/// Interns block names into dense `u32` ids shared by all genomes.
#[derive(Debug, Default, Clone)]
pub struct BlockRegistry {
    names: IndexSet<String>,
}

impl BlockRegistry {
    pub fn intern(&mut self, name: &str) -> u32 {
        self.names.insert_full(name.to_string()).0 as u32
    }

    pub fn id(&self, name: &str) -> Option<u32> {
        self.names.get_index_of(name).map(|i| i as u32)
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        self.names.get_index(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A multiset over genome indices tagging an edge or operation with which
/// genomes share it.
///
/// The canonical form never stores zero multiplicities, and [`Multicolor::iter`]
/// yields entries in ascending genome index order. That ordering is part of
/// the interface: the set operations are merges over the two ordered
/// sequences and callers may rely on deterministic iteration, e.g. when using
/// multicolors as map keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multicolor {
    members: BTreeMap<usize, usize>,
}

impl Multicolor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(genome: usize) -> Self {
        let mut color = Self::new();
        color.insert(genome);
        color
    }

    /// Raises the multiplicity of `genome` by one.
    pub fn insert(&mut self, genome: usize) {
        *self.members.entry(genome).or_insert(0) += 1;
    }

    pub fn multiplicity(&self, genome: usize) -> usize {
        self.members.get(&genome).copied().unwrap_or(0)
    }

    pub fn in_color(&self, genome: usize) -> bool {
        self.members.contains_key(&genome)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of distinct genome indices.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// `(genome index, multiplicity)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.members.iter().map(|(g, m)| (*g, *m))
    }

    pub fn union(&self, other: &Multicolor) -> Multicolor {
        let members = self
            .members
            .iter()
            .merge_join_by(other.members.iter(), |a, b| a.0.cmp(b.0))
            .map(|pair| match pair {
                EitherOrBoth::Both((g, a), (_, b)) => (*g, a + b),
                EitherOrBoth::Left((g, a)) => (*g, *a),
                EitherOrBoth::Right((g, b)) => (*g, *b),
            })
            .collect();
        Multicolor { members }
    }

    pub fn intersection(&self, other: &Multicolor) -> Multicolor {
        let members = self
            .members
            .iter()
            .merge_join_by(other.members.iter(), |a, b| a.0.cmp(b.0))
            .filter_map(|pair| match pair {
                EitherOrBoth::Both((g, a), (_, b)) => Some((*g, *a.min(b))),
                _ => None,
            })
            .collect();
        Multicolor { members }
    }

    /// Multiplicity subtraction floored at zero, zero entries dropped.
    pub fn difference(&self, other: &Multicolor) -> Multicolor {
        let members = self
            .members
            .iter()
            .merge_join_by(other.members.iter(), |a, b| a.0.cmp(b.0))
            .filter_map(|pair| match pair {
                EitherOrBoth::Both((g, a), (_, b)) => {
                    (a > b).then(|| (*g, a - b))
                }
                EitherOrBoth::Left((g, a)) => Some((*g, *a)),
                EitherOrBoth::Right(_) => None,
            })
            .collect();
        Multicolor { members }
    }

    /// True iff `self` is a superset multiset of `other`.
    pub fn includes(&self, other: &Multicolor) -> bool {
        other
            .members
            .iter()
            .all(|(g, m)| self.multiplicity(*g) >= *m)
    }

    /// True iff every multiplicity equals one, i.e. the multicolor stands for
    /// an actual subset of genomes rather than a weighted combination.
    pub fn is_simple(&self) -> bool {
        self.members.values().all(|m| *m == 1)
    }

    /// How many times `other` fits into `self`, by repeated difference.
    pub fn how_many_times(&self, other: &Multicolor) -> usize {
        if other.is_empty() {
            return 0;
        }
        let mut count = 0;
        let mut current = self.clone();
        while current.includes(other) {
            count += 1;
            current = current.difference(other);
        }
        count
    }
}

impl FromIterator<usize> for Multicolor {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut color = Self::new();
        for genome in iter {
            color.insert(genome);
        }
        color
    }
}

impl std::fmt::Display for Multicolor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let inner = self
            .iter()
            .flat_map(|(g, m)| std::iter::repeat(g).take(m))
            .join(",");
        write!(f, "{{{inner}}}")
    }
}

/// An atomic rearrangement: replaces the two matching edges given by the arcs
/// `(x1,x2)` and `(y1,y2)` with the recombined edges `(x1,y1)` and `(x2,y2)`,
/// in every genome of its multicolor. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoBreak {
    arcs: [(Vertex, Vertex); 2],
    color: Multicolor,
}

impl TwoBreak {
    pub fn new(x1: Vertex, x2: Vertex, y1: Vertex, y2: Vertex, color: Multicolor) -> Self {
        Self {
            arcs: [(x1, x2), (y1, y2)],
            color,
        }
    }

    pub fn arc(&self, i: usize) -> (Vertex, Vertex) {
        self.arcs[i]
    }

    pub fn color(&self) -> &Multicolor {
        &self.color
    }

    /// The up-to-four involved vertices, sentinels included.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.arcs.iter().flat_map(|(x, y)| [*x, *y])
    }

    /// The operation undoing this one: `apply(inverse(op), apply(op, g)) == g`.
    pub fn inverse(&self) -> TwoBreak {
        TwoBreak::new(
            self.arcs[0].0,
            self.arcs[1].0,
            self.arcs[0].1,
            self.arcs[1].1,
            self.color.clone(),
        )
    }

    /// Mutates `graph` per the recombination contract. Fails when a required
    /// source edge is absent, which signals a malformed input history.
    pub fn apply(&self, graph: &mut GenomeGraph) -> Result<()> {
        for (x, y) in self.arcs {
            graph.erase(x, y)?;
        }
        graph.insert(self.arcs[0].0, self.arcs[1].0);
        graph.insert(self.arcs[0].1, self.arcs[1].1);
        Ok(())
    }
}

impl std::fmt::Display for TwoBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "({},{})x({},{})",
            self.arcs[0].0, self.arcs[0].1, self.arcs[1].0, self.arcs[1].1
        )
    }
}

/// An ordered 2-break sequence, applied front to back to go from an older
/// genome state to a newer one. A `VecDeque` keeps the decircularization
/// bubbling step an O(1) index swap.
pub type Transformation = VecDeque<TwoBreak>;
