use color_eyre::{eyre::eyre, Result};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::graphs::genome_graph::GenomeGraph;
use crate::structs::{Multicolor, Transformation, TwoBreak};

type Arc = (crate::structs::Vertex, crate::structs::Vertex);

/// Outcome of a linearization pass over one branch.
#[derive(Debug, Clone)]
pub struct Decircularized {
    /// Fissions moved to the front of the transformation and applied, in order.
    pub extracted: Vec<TwoBreak>,
    /// Circular chromosomes still present afterwards.
    pub residual: usize,
}

/// Reorders `tg` so that its linearizing fissions come first, applies those to
/// `pg`, and removes them from `tg`.
///
/// `pg` is a genome of color `q` and `tg` transforms it into a linear genome.
/// Every operation in `tg` must carry a color that is either disjoint from `q`
/// or equal to it. Each scan pass finds an operation whose application lowers
/// the circular chromosome count, then bubbles it to the front by commuting it
/// with its predecessors. Not every operation can be moved all the way, so some
/// circular chromosomes may remain; the caller decides what to do with those.
pub fn decircularize(
    pg: &mut GenomeGraph,
    tg: &mut Transformation,
    q: &Multicolor,
    n_blocks: usize,
) -> Result<Decircularized> {
    let mut extracted = Vec::new();

    let mut circ_size = pg.count_chromosomes(n_blocks)?.1;
    if circ_size == 0 {
        return Ok(Decircularized {
            extracted,
            residual: 0,
        });
    }

    info!("Eliminating {circ_size} circular chromosome(s) in {q}");

    // Scratch copy tracking pg with the first `it` operations applied.
    let mut scratch = pg.clone();
    let mut start = 0;
    let mut it = 0;

    while it < tg.len() {
        let common = tg[it].color().intersection(q);
        if common.is_empty() {
            it += 1;
            continue;
        }
        if &common != q {
            return Err(eyre!(Error::ForeignColor {
                color: tg[it].color().to_string(),
                branch: q.to_string(),
            }));
        }

        tg[it].apply(&mut scratch)?;
        let mut ccsize = scratch.count_chromosomes(n_blocks)?.1;

        if ccsize >= circ_size {
            it += 1;
            continue;
        }

        debug!("Found linearizing 2-break {}", tg[it]);

        // Bubble it toward the front, commuting with each predecessor.
        let mut pos = it;
        let mut rejected = false;
        while pos > 0 {
            let shared = !tg[pos].color().intersection(tg[pos - 1].color()).is_empty();
            let patterns = if shared {
                commute(&tg[pos], &tg[pos - 1])
            } else {
                None
            };

            match patterns {
                Some((p1, q1, p2, q2)) => {
                    if tg[pos].color() != tg[pos - 1].color() {
                        rejected = true;
                        break;
                    }
                    let color = tg[pos].color().clone();
                    tg[pos] = TwoBreak::new(q2.1, p1.1, q1.0, q1.1, color.clone());
                    tg[pos - 1] = TwoBreak::new(p1.0, p1.1, q2.0, q2.1, color);
                }
                None => tg.swap(pos - 1, pos),
            }

            // The operation now at `pos` sits past the scan point again.
            if !tg[pos].color().intersection(q).is_empty() {
                tg[pos].inverse().apply(&mut scratch)?;
                ccsize = scratch.count_chromosomes(n_blocks)?.1;
            }

            pos -= 1;
        }

        if !rejected && ccsize < circ_size {
            debug!("Moved {} to the front", tg[0]);
            let front = tg.pop_front().ok_or_else(|| eyre!(Error::IncompleteHistory))?;
            front.apply(pg)?;
            extracted.push(front);

            circ_size = pg.count_chromosomes(n_blocks)?.1;
            if circ_size == 0 {
                break;
            }
            start = 0;
        } else {
            debug!("Could not move the 2-break to the front");
            start += 1;
        }

        scratch = pg.clone();
        for op in tg.iter().take(start) {
            if !op.color().intersection(q).is_empty() {
                op.apply(&mut scratch)?;
            }
        }
        it = start;
    }

    if circ_size > 0 {
        warn!("{circ_size} circular chromosome(s) in {q} could not be eliminated");
    }

    Ok(Decircularized {
        extracted,
        residual: circ_size,
    })
}

/* When the arcs of `t` overlap those of its predecessor `s`, moving `t` in
 * front of `s` changes both operations:
 *
 *     p1=(x1,x2) x (y1,y2)=q1
 *     p2=(x1,y1) x (x3,y3)=q2
 *
 * becomes
 *
 *     (x1,x2) x (x3,y3)
 *     (y3,x2) x (y1,y2)
 */
fn commute(t: &TwoBreak, s: &TwoBreak) -> Option<(Arc, Arc, Arc, Arc)> {
    let (s0, s1) = (s.arc(0), s.arc(1));
    for j in 0..2 {
        let p2 = t.arc(j);
        let q2 = t.arc(1 - j);

        let (p1, q1) = if p2 == (s0.0, s1.0) {
            (s0, s1)
        } else if p2 == (s1.0, s0.0) {
            (s1, s0)
        } else if p2 == (s0.1, s1.1) {
            ((s0.1, s0.0), (s1.1, s1.0))
        } else if p2 == (s1.1, s0.1) {
            ((s1.1, s1.0), (s0.1, s0.0))
        } else {
            continue;
        };
        return Some((p1, q1, p2, q2));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::structs::Vertex;

    fn color(genomes: &[usize]) -> Multicolor {
        genomes.iter().copied().collect()
    }

    #[test]
    fn test_nothing_to_do_on_linear_genome() {
        let mut pg = GenomeGraph::new();
        pg.insert(Vertex::head(0), Vertex::tail(1));

        let op = TwoBreak::new(
            Vertex::head(0),
            Vertex::tail(1),
            Vertex::Infinity,
            Vertex::Infinity,
            color(&[0]),
        );
        let mut tg: Transformation = VecDeque::from(vec![op.clone()]);

        let out = decircularize(&mut pg, &mut tg, &color(&[0]), 2).unwrap();
        assert!(out.extracted.is_empty());
        assert_eq!(out.residual, 0);
        assert_eq!(tg, VecDeque::from(vec![op]));
    }

    #[test]
    fn test_extracts_a_front_fission() {
        // Block 0 forms a circular chromosome; the only operation cuts it open.
        let mut pg = GenomeGraph::new();
        pg.insert(Vertex::tail(0), Vertex::head(0));

        let cut = TwoBreak::new(
            Vertex::tail(0),
            Vertex::head(0),
            Vertex::Infinity,
            Vertex::Infinity,
            color(&[0]),
        );
        let mut tg: Transformation = VecDeque::from(vec![cut.clone()]);

        let out = decircularize(&mut pg, &mut tg, &color(&[0]), 1).unwrap();
        assert_eq!(out.extracted, vec![cut]);
        assert_eq!(out.residual, 0);
        assert!(tg.is_empty());
        assert_eq!(pg.count_chromosomes(1).unwrap(), (1, 0));
    }

    #[test]
    fn test_bubbles_past_an_unrelated_operation() {
        // Block 0 is circular, blocks 1 and 2 share a chromosome. The cut for
        // block 0 sits second and must swap past the first operation.
        let mut pg = GenomeGraph::new();
        pg.insert(Vertex::tail(0), Vertex::head(0));
        pg.insert(Vertex::head(1), Vertex::tail(2));

        let q = color(&[0]);
        let shuffle = TwoBreak::new(
            Vertex::head(1),
            Vertex::tail(2),
            Vertex::head(2),
            Vertex::Infinity,
            q.clone(),
        );
        let cut = TwoBreak::new(
            Vertex::tail(0),
            Vertex::head(0),
            Vertex::Infinity,
            Vertex::Infinity,
            q.clone(),
        );
        let mut tg: Transformation = VecDeque::from(vec![shuffle.clone(), cut.clone()]);

        let out = decircularize(&mut pg, &mut tg, &q, 3).unwrap();
        assert_eq!(out.extracted, vec![cut]);
        assert_eq!(out.residual, 0);
        assert_eq!(tg, VecDeque::from(vec![shuffle]));
        assert_eq!(pg.count_chromosomes(3).unwrap().1, 0);
    }

    #[test]
    fn test_residual_circular_chromosome_reported() {
        let mut pg = GenomeGraph::new();
        pg.insert(Vertex::tail(0), Vertex::head(0));

        // No operation touches the circular chromosome.
        let mut tg: Transformation = VecDeque::new();

        let out = decircularize(&mut pg, &mut tg, &color(&[0]), 1).unwrap();
        assert!(out.extracted.is_empty());
        assert_eq!(out.residual, 1);
    }

    #[test]
    fn test_foreign_color_is_an_error() {
        let mut pg = GenomeGraph::new();
        pg.insert(Vertex::tail(0), Vertex::head(0));

        let op = TwoBreak::new(
            Vertex::tail(0),
            Vertex::head(0),
            Vertex::Infinity,
            Vertex::Infinity,
            color(&[0]),
        );
        let mut tg: Transformation = VecDeque::from(vec![op]);

        let res = decircularize(&mut pg, &mut tg, &color(&[0, 1]), 1);
        assert!(res.is_err());
    }
}
