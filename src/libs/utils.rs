use color_eyre::{eyre::eyre, Result};

use crate::error::Error;
use crate::structs::{Multicolor, SignedBlock};

//NOTE: This should be parsed by clap automatically, but Option<String> parsing is not supported out of the box as of now
pub fn strip_prefix(prefix: Option<String>) -> Option<String> {
    if let Some(prefix) = prefix {
        match prefix.as_ref() {
            "" => None,
            "\\0" => None,
            v => Some(v.to_string()),
        }
    } else {
        None
    }
}

/// Splits a genome-file token such as `+12`, `-12` or `12` into a sign and a
/// block name. A bare name means forward orientation.
pub fn split_signed_block(token: &str) -> Result<(bool, &str)> {
    let (forward, name) = match token.strip_prefix('-') {
        Some(rest) => (false, rest),
        None => (true, token.strip_prefix('+').unwrap_or(token)),
    };
    if name.is_empty() {
        return Err(eyre!(Error::BlockParse {
            token: token.to_string(),
        }));
    }
    Ok((forward, name))
}

pub fn signed_block_token(block: &SignedBlock, name: &str) -> String {
    if block.forward {
        format!("+{name}")
    } else {
        format!("-{name}")
    }
}

/// Concatenated genome names, one per unit of multiplicity: `{1,2}` over
/// genomes `A,B,C` becomes `BC`. Used for ancestor output file names.
pub fn mcolor_to_name(color: &Multicolor, names: &[String]) -> String {
    let mut out = String::new();
    for (genome, multiplicity) in color.iter() {
        for _ in 0..multiplicity {
            match names.get(genome) {
                Some(name) => out.push_str(name),
                None => out.push_str(&genome.to_string()),
            }
        }
    }
    out
}

/// Comma-separated genome names, the history-file color syntax.
pub fn mcolor_to_list(color: &Multicolor, names: &[String]) -> String {
    let mut parts = Vec::new();
    for (genome, multiplicity) in color.iter() {
        for _ in 0..multiplicity {
            match names.get(genome) {
                Some(name) => parts.push(name.clone()),
                None => parts.push(genome.to_string()),
            }
        }
    }
    parts.join(",")
}

/// Parses a comma-separated genome name list into a multicolor.
pub fn parse_mcolor_list(text: &str, names: &[String]) -> Result<Multicolor> {
    let mut color = Multicolor::new();
    for part in text.split(',') {
        let part = part.trim();
        let index = names
            .iter()
            .position(|n| n == part)
            .ok_or_else(|| eyre!(Error::UnknownGenome {
                name: part.to_string(),
            }))?;
        color.insert(index);
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_split_signed_block() {
        assert_eq!(split_signed_block("+12").unwrap(), (true, "12"));
        assert_eq!(split_signed_block("-abc").unwrap(), (false, "abc"));
        assert_eq!(split_signed_block("7").unwrap(), (true, "7"));
        assert!(split_signed_block("-").is_err());
        assert!(split_signed_block("+").is_err());
    }

    #[test]
    fn test_mcolor_names() {
        let names = names(&["A", "B", "C"]);
        let color: Multicolor = [1, 2].iter().copied().collect();
        assert_eq!(mcolor_to_name(&color, &names), "BC");
        assert_eq!(mcolor_to_list(&color, &names), "B,C");

        let parsed = parse_mcolor_list("B,C", &names).unwrap();
        assert_eq!(parsed, color);
        assert!(parse_mcolor_list("B,Z", &names).is_err());
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix(Some("out".to_string())), Some("out".to_string()));
        assert_eq!(strip_prefix(Some(String::new())), None);
        assert_eq!(strip_prefix(None), None);
    }
}
