//! Extraction over parsed sentences.

use std::io::Cursor;

use clause_mates::fixture::{tok, DocumentBuilder, RowBuilder};
use clause_mates::parser::read_all;
use clause_mates::{ChainKey, CorefLayer, LayoutVariant, SchemaConfig, SentenceContext};

use crate::{AntecedentStatus, ClauseMateRelationship, PronounKind, RelationshipExtractor};

fn parse(variant: LayoutVariant, rows: Vec<RowBuilder>) -> SentenceContext {
    let tsv = DocumentBuilder::new(variant).sentence(rows).build();
    let (_, mut sentences, _) =
        read_all(Cursor::new(tsv), "test", &SchemaConfig::default()).unwrap();
    sentences.remove(0)
}

fn extract(variant: LayoutVariant, rows: Vec<RowBuilder>) -> Vec<ClauseMateRelationship> {
    RelationshipExtractor::default().extract(&parse(variant, rows))
}

fn summarize(rows: &[ClauseMateRelationship]) -> String {
    rows.iter()
        .map(|row| match &row.clause_mate {
            Some(mate) => format!(
                "{} -> {} ({}#{}, {}) of {}",
                row.pronoun.text,
                mate.text,
                mate.layer,
                mate.chain,
                mate.grammatical_role.as_deref().unwrap_or("_"),
                row.num_clause_mates
            ),
            None => format!("{} -> (none)", row.pronoun.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_pronoun_with_multi_token_clause_mate() {
    let rows = extract(
        LayoutVariant::Standard,
        vec![
            tok("Gestern"),
            tok("sah"),
            tok("sie")
                .roles("SubjA[1]", "experiencer[1]")
                .animate("*->115-6", "PersPron[115]"),
            tok("den")
                .roles("dirObj[1]", "theme[1]")
                .animate("*->213-2", "defNP[213]"),
            tok("alten")
                .roles("dirObj[1]", "theme[1]")
                .animate("*->213-2", "defNP[213]"),
            tok("Mann")
                .roles("dirObj[1]", "theme[1]")
                .animate("*->213-2", "defNP[213]"),
            tok("."),
        ],
    );

    // "den" opens a noun phrase and is not a pronoun of its own.
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.pronoun.text, "sie");
    assert_eq!(row.pronoun.kind, PronounKind::Personal);
    assert_eq!(row.pronoun.token_index, 3);
    assert_eq!(
        row.pronoun.primary_chain,
        Some(ChainKey::new(CorefLayer::Animate, 115))
    );
    let mate = row.clause_mate.as_ref().unwrap();
    assert_eq!(mate.text, "den alten Mann");
    assert_eq!(mate.chain, 213);
    assert_eq!((mate.start, mate.end), (4, 6));
    assert_eq!(mate.grammatical_role.as_deref(), Some("dirObj"));
    assert_eq!(mate.thematic_role.as_deref(), Some("theme"));
    assert_eq!(row.num_clause_mates, 1);
    assert_eq!(row.antecedent.status, AntecedentStatus::Pending);
}

#[test]
fn test_dual_layer_clause_mate_fans_out() {
    let rows = extract(
        LayoutVariant::Standard,
        vec![
            tok("Er").roles("SubjA[1]", "agent[1]").animate("*->127-4", "PersPron[127]"),
            tok("verließ"),
            tok("Siemens")
                .roles("dirObj[1]", "theme[1]")
                .animate("*->40-2", "PropN[40]")
                .inanimate("*->41-1", "PropN[41]"),
            tok("."),
        ],
    );

    assert_eq!(rows.len(), 2);
    let first = rows[0].clause_mate.as_ref().unwrap();
    let second = rows[1].clause_mate.as_ref().unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.grammatical_role, second.grammatical_role);
    assert_eq!((first.layer, first.chain, first.animate), (CorefLayer::Animate, 40, true));
    assert_eq!((second.layer, second.chain, second.animate), (CorefLayer::Inanimate, 41, false));
    assert!(rows.iter().all(|r| r.num_clause_mates == 2));
}

#[test]
fn test_pronoun_without_clause_mates() {
    let rows = extract(
        LayoutVariant::Standard,
        vec![
            tok("Sie").roles("SubjA[1]", "agent[1]").animate("*->2-5", "PersPron[2]"),
            tok("schläft"),
            tok("."),
        ],
    );
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].has_clause_mate());
    assert_eq!(rows[0].num_clause_mates, 0);
    assert_eq!(rows[0].pronoun.grammatical_role.as_deref(), Some("SubjA"));
}

#[test]
fn test_pronoun_without_pointer_is_still_critical() {
    let rows = extract(
        LayoutVariant::Standard,
        vec![
            tok("Es"),
            tok("regnet"),
            tok("auf"),
            tok("Peter").animate("*->3-1", "PropN[3]"),
        ],
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].pronoun.text, "Es");
    assert!(rows[0].pronoun.chains.is_empty());
    assert_eq!(rows[0].antecedent.status, AntecedentStatus::NoPointer);
    assert_eq!(rows[0].clause_mate.as_ref().unwrap().text, "Peter");
}

#[test]
fn test_mutual_pronouns_in_both_directions() {
    let rows = extract(
        LayoutVariant::Standard,
        vec![
            tok("Er").roles("SubjA[1]", "agent[1]").animate("*->1-3", "PersPron[1]"),
            tok("sah"),
            tok("sie").roles("dirObj[1]", "patient[1]").animate("*->2-3", "PersPron[2]"),
            tok("."),
        ],
    );

    insta::assert_snapshot!(summarize(&rows), @r###"
    Er -> sie (animate#2, dirObj) of 1
    sie -> Er (animate#1, SubjA) of 1
    "###);
}

#[test]
fn test_incomplete_layout_rows_have_empty_roles() {
    let rows = extract(
        LayoutVariant::Incomplete,
        vec![
            tok("Die").animate("*->5-1", "defNP[5]").clause(1),
            tok("Katze").animate("*->5-1", "defNP[5]").clause(1),
            tok("frisst").clause(1),
            tok("ihn").animate("*->6-4", "PersPron[6]").clause(1),
            tok("."),
        ],
    );

    insta::assert_snapshot!(summarize(&rows), @"ihn -> Die Katze (animate#5, _) of 1");
    let row = &rows[0];
    assert_eq!(row.pronoun.grammatical_role, None);
    assert_eq!(row.pronoun.thematic_role, None);
    assert_eq!(row.pronoun.clause, Some(1));
    let mate = row.clause_mate.as_ref().unwrap();
    assert_eq!(mate.grammatical_role, None);
    assert_eq!(mate.clause, Some(1));
}

#[test]
fn test_extraction_is_deterministic() {
    let rows = || {
        extract(
            LayoutVariant::Standard,
            vec![
                tok("Er").animate("*->1-3", "PersPron[1]"),
                tok("gab"),
                tok("ihr").animate("*->2-2", "PersPron[2]"),
                tok("das").animate("*->3-1", "defNP[3]").inanimate("*->4-1", "defNP[4]"),
                tok("Buch").animate("*->3-1", "defNP[3]").inanimate("*->4-1", "defNP[4]"),
            ],
        )
    };
    let first = rows();
    assert_eq!(first.len(), 6);
    assert_eq!(first, rows());
}
