use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use color_eyre::{eyre::eyre, Result};
use csv::{Writer, WriterBuilder};
use tracing::info;

use crate::args::StandardArgs;
use crate::error::Error;
use crate::structs::{
    BlockRegistry, Chromosome, Genome, Multicolor, SignedBlock, Transformation, TwoBreak, Vertex,
};
use crate::utils::{mcolor_to_list, parse_mcolor_list, signed_block_token, split_signed_block, strip_prefix};

pub fn get_csv_writer<W: io::Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .quote(b'"')
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_writer(output)
}

pub fn open_csv_writer(path: PathBuf) -> Result<Writer<File>, Error> {
    let output = fs::File::options()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path.clone())
        .map_err(|e| Error::Io(path, e))?;
    Ok(get_csv_writer(output))
}

pub fn read_lines<P>(filename: P) -> Result<io::Lines<io::BufReader<File>>, Error>
where
    P: AsRef<Path> + Into<PathBuf>,
{
    let file = File::open(&filename).map_err(|e| Error::Io(filename.into(), e))?;

    Ok(io::BufReader::new(file).lines())
}

fn not_found(path: &Path, err: &str) -> Error {
    Error::Path(path.to_path_buf(), err.to_string())
}

pub fn get_output(filename: Option<PathBuf>) -> Result<Box<dyn io::Write>, Error> {
    let output: Box<dyn io::Write> = match filename {
        Some(name) => match name.to_str() {
            Some("-") => Box::new(io::stdout()),
            Some(path) => {
                let file_handle = fs::File::options()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|e| not_found(&name, &e.to_string()))?;

                Box::new(file_handle)
            }
            None => unreachable!(),
        },
        None => Box::new(io::stdout()),
    };
    Ok(output)
}

pub fn push_to_output(args: &StandardArgs, output: &mut PathBuf, name: &str, suffix: &str) {
    if let Some(prefix) = &strip_prefix(args.prefix.clone()) {
        output.push(format!("{prefix}_{name}.{suffix}"));
    } else {
        output.push(format!("{name}.{suffix}"));
    }
}

/// Reads a GRIMM genome file: `>name` headers, signed block tokens, `$` for a
/// linear and `@` for a circular chromosome terminator, `#` comments. Block
/// names are interned into a registry shared by every genome in the file.
pub fn read_genomes(path: &PathBuf) -> Result<(Vec<Genome>, BlockRegistry)> {
    let mut registry = BlockRegistry::default();
    let mut genomes: Vec<Genome> = Vec::new();
    let mut pending: Vec<SignedBlock> = Vec::new();

    fn finish_genome(pending: &[SignedBlock], line: usize) -> Result<()> {
        if !pending.is_empty() {
            return Err(eyre!(Error::GenomeParse {
                line,
                reason: "chromosome is missing its $ or @ terminator".to_string(),
            }));
        }
        Ok(())
    }

    for (number, line) in read_lines(path)?.enumerate() {
        let line = line.map_err(|e| Error::Io(path.clone(), e))?;
        let line = line.trim();
        let lineno = number + 1;

        if let Some(name) = line.strip_prefix('>') {
            finish_genome(&pending, lineno)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(eyre!(Error::GenomeParse {
                    line: lineno,
                    reason: "genome header has no name".to_string(),
                }));
            }
            if genomes.iter().any(|g| g.name == name) {
                return Err(eyre!(Error::GenomeParse {
                    line: lineno,
                    reason: format!("genome {name} is declared twice"),
                }));
            }
            genomes.push(Genome {
                name: name.to_string(),
                chromosomes: Vec::new(),
            });
            continue;
        }

        for token in line.split_whitespace() {
            if token.starts_with('#') {
                break;
            }
            let genome = genomes.last_mut().ok_or_else(|| {
                eyre!(Error::GenomeParse {
                    line: lineno,
                    reason: "found blocks before any >name header".to_string(),
                })
            })?;
            match token {
                "$" | "@" => {
                    if pending.is_empty() {
                        return Err(eyre!(Error::GenomeParse {
                            line: lineno,
                            reason: "empty chromosome".to_string(),
                        }));
                    }
                    genome.chromosomes.push(Chromosome {
                        blocks: std::mem::take(&mut pending),
                        circular: token == "@",
                    });
                }
                _ => {
                    let (forward, name) = split_signed_block(token)?;
                    let block = registry.intern(name);
                    pending.push(SignedBlock { block, forward });
                }
            }
        }
    }

    finish_genome(&pending, 0)?;

    if genomes.is_empty() {
        return Err(eyre!(Error::GenomeParse {
            line: 0,
            reason: "file contains no genomes".to_string(),
        }));
    }

    info!(
        "Read {} genome(s) over {} block(s) from {path:?}",
        genomes.len(),
        registry.len()
    );
    Ok((genomes, registry))
}

/// Writes one genome in GRIMM form with per-chromosome comment lines.
///
/// Block order within a chromosome is normalized so that the first or last
/// block reads forward, matching the original breakpoint-graph output style.
pub fn write_genome(
    output: &mut Box<dyn io::Write>,
    genome: &Genome,
    registry: &BlockRegistry,
) -> Result<()> {
    writeln!(output, "# Genome {}", genome.name)?;

    let mut ncirc = 0;
    let mut lcirc = 0;

    for chromosome in &genome.chromosomes {
        writeln!(output)?;
        if chromosome.circular {
            ncirc += 1;
            lcirc += chromosome.len();
            writeln!(
                output,
                "# circular CAR of length {} follows:",
                chromosome.len()
            )?;
        } else {
            writeln!(
                output,
                "# linear CAR of length {} follows:",
                chromosome.len()
            )?;
        }

        let flipped;
        let blocks = match (chromosome.blocks.first(), chromosome.blocks.last()) {
            (Some(first), Some(last)) if !first.forward && !last.forward => {
                flipped = chromosome
                    .blocks
                    .iter()
                    .rev()
                    .map(|b| b.reversed())
                    .collect::<Vec<_>>();
                &flipped
            }
            _ => &chromosome.blocks,
        };

        for block in blocks {
            let name = registry.name(block.block).ok_or_else(|| {
                eyre!(Error::BlockParse {
                    token: block.block.to_string(),
                })
            })?;
            write!(output, "{} ", signed_block_token(block, name))?;
        }
        writeln!(output, "{}", if chromosome.circular { "@" } else { "$" })?;
    }

    writeln!(output)?;
    writeln!(
        output,
        "# Reconstructed genome {} has {} CAR(s)",
        genome.name,
        genome.chromosomes.len()
    )?;
    if ncirc > 0 {
        writeln!(
            output,
            "#\tout of which {ncirc} are circular of total length {lcirc}"
        )?;
    }

    info!(
        "Reconstructed genome {} has {} CAR(s), {ncirc} circular",
        genome.name,
        genome.chromosomes.len()
    );
    Ok(())
}

fn parse_vertex_token(token: &str, registry: &BlockRegistry) -> Result<Vertex> {
    if token == "oo" {
        return Ok(Vertex::Infinity);
    }
    let (name, end) = token
        .split_at_checked(token.len() - 1)
        .ok_or_else(|| eyre!(Error::VertexParse {
            token: token.to_string(),
        }))?;
    let block = registry.id(name).ok_or_else(|| eyre!(Error::BlockParse {
        token: name.to_string(),
    }))?;
    match end {
        "t" => Ok(Vertex::tail(block)),
        "h" => Ok(Vertex::head(block)),
        _ => Err(eyre!(Error::VertexParse {
            token: token.to_string(),
        })),
    }
}

/// Reads a 2-break history file. Each line carries five whitespace-separated
/// fields: `x1 x2 y1 y2 color`, where the color is a comma-separated genome
/// name list. `#` lines and blank lines are skipped.
pub fn read_history(
    path: &PathBuf,
    names: &[String],
    registry: &BlockRegistry,
) -> Result<Vec<TwoBreak>> {
    let mut history = Vec::new();

    for (number, line) in read_lines(path)?.enumerate() {
        let line = line.map_err(|e| Error::Io(path.clone(), e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [x1, x2, y1, y2, color] = fields[..] else {
            return Err(eyre!(Error::HistoryParse {
                line: number + 1,
                text: line.to_string(),
            }));
        };

        let color: Multicolor = parse_mcolor_list(color, names)?;
        history.push(TwoBreak::new(
            parse_vertex_token(x1, registry)?,
            parse_vertex_token(x2, registry)?,
            parse_vertex_token(y1, registry)?,
            parse_vertex_token(y2, registry)?,
            color,
        ));
    }

    info!("Read {} 2-break(s) from {path:?}", history.len());
    Ok(history)
}

fn vertex_token(v: Vertex, registry: &BlockRegistry) -> Result<String> {
    match v {
        Vertex::Infinity => Ok("oo".to_string()),
        Vertex::Extremity { block, end } => {
            let name = registry.name(block).ok_or_else(|| {
                eyre!(Error::BlockParse {
                    token: block.to_string(),
                })
            })?;
            Ok(format!("{name}{end}"))
        }
    }
}

/// Writes a transformation in the same five-field form `read_history` accepts.
pub fn write_history(
    output: &mut Box<dyn io::Write>,
    transformation: &Transformation,
    names: &[String],
    registry: &BlockRegistry,
) -> Result<()> {
    for op in transformation {
        writeln!(
            output,
            "{} {}\t{} {}\t{}",
            vertex_token(op.arc(0).0, registry)?,
            vertex_token(op.arc(0).1, registry)?,
            vertex_token(op.arc(1).0, registry)?,
            vertex_token(op.arc(1).1, registry)?,
            mcolor_to_list(op.color(), names),
        )?;
    }
    Ok(())
}
