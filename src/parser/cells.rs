//! Parsing of individual annotation cells.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::is_absent;
use crate::token::{ChainId, CorefLayer, CorefPointer, RoleSlot, TokenId};

/// `SubjA[1]`, `dirObj`, `_`
static ROLE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^\[\]]*?)\s*(?:\[(\d+)\])?\s*$").unwrap());

/// `*->127-4`, `31-7->127-3`, `*->127`
static LINK_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\*|\d+-\d+)\s*->\s*(\d+)(?:-(\d+))?\s*$").unwrap());

/// `PersPron[127]`, `[127]`
static TYPE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([^\[\]]*?)\s*\[(\d+)\]\s*$").unwrap());

fn label(text: &str) -> Option<String> {
    if is_absent(text) {
        None
    } else {
        Some(text.to_string())
    }
}

fn split_role_item(item: &str) -> (Option<String>, Option<usize>) {
    match ROLE_ITEM.captures(item) {
        Some(caps) => (
            caps.get(1).and_then(|m| label(m.as_str())),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ),
        None => (label(item.trim()), None),
    }
}

/// Pair up pipe-delimited grammatical and thematic role cells.
pub fn parse_roles(grammatical: Option<&str>, thematic: Option<&str>) -> Vec<RoleSlot> {
    let grammatical: Vec<&str> = grammatical.map(|c| c.split('|').collect()).unwrap_or_default();
    let thematic: Vec<&str> = thematic.map(|c| c.split('|').collect()).unwrap_or_default();

    let slots = grammatical.len().max(thematic.len());
    let mut roles = Vec::with_capacity(slots);
    for i in 0..slots {
        let (gram_label, gram_clause) = grammatical
            .get(i)
            .map(|item| split_role_item(item))
            .unwrap_or((None, None));
        let (them_label, them_clause) = thematic
            .get(i)
            .map(|item| split_role_item(item))
            .unwrap_or((None, None));

        let slot = RoleSlot {
            grammatical: gram_label,
            thematic: them_label,
            clause: gram_clause.or(them_clause),
        };
        if slot != RoleSlot::default() {
            roles.push(slot);
        }
    }
    roles
}

/// Leading digits of a clause-id cell: `2`, `Clause[2]`, `c2`.
pub fn parse_clause_id(cell: &str) -> Option<usize> {
    let digits: String = cell
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse one layer's link and type cells into pointers.
///
/// Items that do not parse are returned separately so the caller can report
/// them without dropping the rest of the row.
pub fn parse_pointers(
    layer: CorefLayer,
    link: Option<&str>,
    dp_type: Option<&str>,
) -> (Vec<CorefPointer>, Vec<String>) {
    let mut invalid = Vec::new();

    let mut types: Vec<(Option<String>, ChainId)> = Vec::new();
    for item in dp_type.into_iter().flat_map(|c| c.split('|')) {
        if is_absent(item) {
            continue;
        }
        match TYPE_ITEM
            .captures(item)
            .and_then(|caps| Some((label(&caps[1]), caps[2].parse::<ChainId>().ok()?)))
        {
            Some(found) => types.push(found),
            None => invalid.push(item.trim().to_string()),
        }
    }

    let mut pointers: Vec<CorefPointer> = Vec::new();
    for item in link.into_iter().flat_map(|c| c.split('|')) {
        if is_absent(item) {
            continue;
        }
        let caps = match LINK_ITEM.captures(item) {
            Some(caps) => caps,
            None => {
                invalid.push(item.trim().to_string());
                continue;
            }
        };
        let chain: ChainId = match caps[2].parse() {
            Ok(chain) => chain,
            Err(_) => {
                invalid.push(item.trim().to_string());
                continue;
            }
        };
        if pointers.iter().any(|p| p.chain == chain) {
            continue;
        }
        pointers.push(CorefPointer {
            layer,
            chain,
            link: caps.get(3).and_then(|m| m.as_str().parse().ok()),
            target: TokenId::parse(&caps[1]),
            dp_type: types
                .iter()
                .find(|(_, c)| *c == chain)
                .and_then(|(l, _)| l.clone()),
        });
    }

    // Type items without a matching link still mark chain membership.
    for (dp_type, chain) in types {
        if pointers.iter().all(|p| p.chain != chain) {
            pointers.push(CorefPointer {
                layer,
                chain,
                link: None,
                target: None,
                dp_type,
            });
        }
    }

    (pointers, invalid)
}
