//! Every known layout, read end to end.

use std::io::Cursor;

use crate::fixture::{tok, DocumentBuilder};
use crate::parser::read_all;
use crate::{ClauseMateError, CorpusReader, Diagnostic, LayoutVariant, SchemaConfig};

fn sample(variant: LayoutVariant) -> DocumentBuilder {
    DocumentBuilder::new(variant).sentence(vec![
        tok("Maria")
            .roles("SubjA[1]", "agent[1]")
            .animate("*->12-1", "PropN[12]")
            .morph("case", "Nom")
            .clause(1),
        tok("liest").clause(1),
        tok("es")
            .roles("dirObj[1]", "theme[1]")
            .inanimate("*->4-2", "PersPron[4]")
            .morph("case", "Acc")
            .clause(1),
    ])
}

#[test]
fn test_each_variant_reads_its_own_layout() {
    for variant in LayoutVariant::ALL.iter().copied() {
        let tsv = sample(variant).build();
        let (layout, sentences, diagnostics) =
            read_all(Cursor::new(tsv), variant.name(), &SchemaConfig::default()).unwrap();

        assert_eq!(layout.variant, variant);
        assert_eq!(layout.column_count, variant.expected_columns());
        assert!(diagnostics.is_empty(), "{}: {:?}", variant, diagnostics);

        let tokens = &sentences[0].tokens;
        assert_eq!(tokens.len(), 3, "{}", variant);
        assert_eq!(tokens[0].primary_pointer().map(|p| p.chain), Some(12));
        assert_eq!(tokens[2].primary_pointer().map(|p| p.chain), Some(4));
        assert_eq!(tokens[2].clause(), Some(1));

        let expected_role = if variant == LayoutVariant::Incomplete {
            None
        } else {
            Some("dirObj")
        };
        assert_eq!(tokens[2].grammatical_role(), expected_role, "{}", variant);

        let expected_case = if variant == LayoutVariant::Extended {
            Some("Acc")
        } else {
            None
        };
        assert_eq!(tokens[2].morph("case"), expected_case, "{}", variant);
    }
}

#[test]
fn test_preamble_overrides_column_count() {
    // Legacy header, but rows carry one extra boundary column.
    let tsv = sample(LayoutVariant::Legacy)
        .build()
        .lines()
        .map(|line| {
            if line.starts_with('#') || line.is_empty() {
                line.to_string()
            } else {
                format!("{}\t_", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let (layout, sentences, diagnostics) =
        read_all(Cursor::new(tsv), "shifted.tsv", &SchemaConfig::default()).unwrap();
    assert_eq!(layout.variant, LayoutVariant::Legacy);
    assert_eq!(layout.column_count, 15);
    assert_eq!(sentences[0].tokens[2].grammatical_role(), Some("dirObj"));
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::LayoutDisagreement {
            data_columns: 15,
            preamble_columns: 14
        }
    )));
}

#[test]
fn test_unknown_width_fails_before_any_sentence() {
    let row = vec!["_"; 22].join("\t");
    let tsv = format!("#Text=kaputt\n{}\n", row);
    let err = CorpusReader::from_reader(Cursor::new(tsv), "odd.tsv", &SchemaConfig::default())
        .err()
        .unwrap();
    assert!(err.is_schema_error());
    assert_eq!(
        err.to_string(),
        "odd.tsv: line 2: 22 columns match no known layout"
    );
    assert!(matches!(err, ClauseMateError::SchemaClassification { .. }));
}

#[test]
fn test_non_adaptive_reading_is_guarded() {
    // Standard column map over 12-column rows: out-of-range roles read as empty.
    let tsv = sample(LayoutVariant::Incomplete).without_preamble().build();
    let config = SchemaConfig::default().with_adaptive(false);
    let (layout, sentences, _) = read_all(Cursor::new(tsv), "fixed.tsv", &config).unwrap();

    assert_eq!(layout.variant, LayoutVariant::Standard);
    assert_eq!(sentences[0].tokens.len(), 3);
    assert_eq!(sentences[0].tokens[2].clause(), None);
}
