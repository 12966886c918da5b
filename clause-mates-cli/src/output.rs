//! CSV and JSON Lines writers for relationship records.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use clause_mates::{ChainId, ClauseMateError, ClauseMateResult};
use clause_mates_chains::RecordSink;
use clause_mates_relations::ClauseMateRelationship;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One flat row per relationship, with a header
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

/// A relationship flattened into fixed columns.
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    sentence_id: &'a str,
    sentence_num: usize,
    global_sentence_num: usize,
    pronoun_text: &'a str,
    pronoun_kind: &'static str,
    pronoun_token_idx: usize,
    pronoun_grammatical_role: Option<&'a str>,
    pronoun_thematic_role: Option<&'a str>,
    pronoun_clause: Option<usize>,
    pronoun_coref_ids: String,
    clause_mate_text: Option<&'a str>,
    clause_mate_coref_id: Option<ChainId>,
    clause_mate_coref_type: Option<&'a str>,
    clause_mate_animacy: Option<&'static str>,
    clause_mate_start_idx: Option<usize>,
    clause_mate_end_idx: Option<usize>,
    clause_mate_grammatical_role: Option<&'a str>,
    clause_mate_thematic_role: Option<&'a str>,
    num_clause_mates: usize,
    most_recent_antecedent_text: Option<&'a str>,
    most_recent_antecedent_distance: Option<usize>,
    most_recent_antecedent_sentence: Option<usize>,
    first_antecedent_text: Option<&'a str>,
    first_antecedent_distance: Option<usize>,
    first_antecedent_sentence: Option<usize>,
    antecedent_choice_count: Option<usize>,
    antecedent_status: &'static str,
}

impl<'a> From<&'a ClauseMateRelationship> for CsvRow<'a> {
    fn from(record: &'a ClauseMateRelationship) -> Self {
        let pronoun = &record.pronoun;
        let mate = record.clause_mate.as_ref();
        let antecedent = &record.antecedent;
        CsvRow {
            sentence_id: &record.sentence_id,
            sentence_num: record.sentence_num,
            global_sentence_num: record.global_sentence_num,
            pronoun_text: &pronoun.text,
            pronoun_kind: pronoun.kind.label(),
            pronoun_token_idx: pronoun.token_index,
            pronoun_grammatical_role: pronoun.grammatical_role.as_deref(),
            pronoun_thematic_role: pronoun.thematic_role.as_deref(),
            pronoun_clause: pronoun.clause,
            pronoun_coref_ids: pronoun
                .chains
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|"),
            clause_mate_text: mate.map(|m| m.text.as_str()),
            clause_mate_coref_id: mate.map(|m| m.chain),
            clause_mate_coref_type: mate.and_then(|m| m.dp_type.as_deref()),
            clause_mate_animacy: mate.map(|m| if m.animate { "animate" } else { "inanimate" }),
            clause_mate_start_idx: mate.map(|m| m.start),
            clause_mate_end_idx: mate.map(|m| m.end),
            clause_mate_grammatical_role: mate.and_then(|m| m.grammatical_role.as_deref()),
            clause_mate_thematic_role: mate.and_then(|m| m.thematic_role.as_deref()),
            num_clause_mates: record.num_clause_mates,
            most_recent_antecedent_text: antecedent.most_recent_text.as_deref(),
            most_recent_antecedent_distance: antecedent.most_recent_distance,
            most_recent_antecedent_sentence: antecedent.most_recent_sentence,
            first_antecedent_text: antecedent.first_text.as_deref(),
            first_antecedent_distance: antecedent.first_distance,
            first_antecedent_sentence: antecedent.first_sentence,
            antecedent_choice_count: antecedent.choice_count,
            antecedent_status: antecedent.status.label(),
        }
    }
}

/// Writes records as they arrive.
pub enum RecordWriter<W: Write> {
    Csv(csv::Writer<W>),
    Json(W),
}

impl<W: Write> RecordWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        match format {
            OutputFormat::Csv => RecordWriter::Csv(csv::Writer::from_writer(out)),
            OutputFormat::Json => RecordWriter::Json(out),
        }
    }

    pub fn finish(&mut self) -> ClauseMateResult<()> {
        match self {
            RecordWriter::Csv(writer) => writer.flush(),
            RecordWriter::Json(out) => out.flush(),
        }
        .map_err(ClauseMateError::output)
    }
}

impl<W: Write> RecordSink for RecordWriter<W> {
    fn accept(&mut self, record: ClauseMateRelationship) -> ClauseMateResult<()> {
        match self {
            RecordWriter::Csv(writer) => writer
                .serialize(CsvRow::from(&record))
                .map_err(ClauseMateError::output),
            RecordWriter::Json(out) => {
                serde_json::to_writer(&mut *out, &record).map_err(ClauseMateError::output)?;
                out.write_all(b"\n").map_err(ClauseMateError::output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use clause_mates::fixture::{tok, DocumentBuilder};
    use clause_mates::LayoutVariant;
    use clause_mates_chains::Pipeline;

    fn records() -> Vec<ClauseMateRelationship> {
        let tsv = DocumentBuilder::new(LayoutVariant::Standard)
            .sentence(vec![
                tok("Anna").roles("SubjA[1]", "agent[1]").animate("*->4-1", "NE[4]"),
                tok("ruft").clause(1),
            ])
            .sentence(vec![
                tok("Er").roles("SubjA[1]", "agent[1]").animate("*->5-1", "PersPron[5]"),
                tok("hört").clause(1),
                tok("sie").roles("dirObj[1]", "theme[1]").animate("*->4-2", "PersPron[4]"),
            ])
            .build();
        Pipeline::default()
            .analyze_reader(Cursor::new(tsv), "test.tsv")
            .unwrap()
            .relationships
    }

    fn render(format: OutputFormat) -> String {
        let mut writer = RecordWriter::new(format, Vec::new());
        for record in records() {
            writer.accept(record).unwrap();
        }
        writer.finish().unwrap();
        let bytes = match writer {
            RecordWriter::Csv(csv) => csv.into_inner().unwrap(),
            RecordWriter::Json(out) => out,
        };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn csv_rows_are_flat() {
        insta::assert_snapshot!(render(OutputFormat::Csv), @r###"
        sentence_id,sentence_num,global_sentence_num,pronoun_text,pronoun_kind,pronoun_token_idx,pronoun_grammatical_role,pronoun_thematic_role,pronoun_clause,pronoun_coref_ids,clause_mate_text,clause_mate_coref_id,clause_mate_coref_type,clause_mate_animacy,clause_mate_start_idx,clause_mate_end_idx,clause_mate_grammatical_role,clause_mate_thematic_role,num_clause_mates,most_recent_antecedent_text,most_recent_antecedent_distance,most_recent_antecedent_sentence,first_antecedent_text,first_antecedent_distance,first_antecedent_sentence,antecedent_choice_count,antecedent_status
        sent_2,2,2,Er,personal,1,SubjA,agent,1,animate#5,sie,4,PersPron,animate,3,3,dirObj,theme,1,,,,,,,,unresolved
        sent_2,2,2,sie,personal,3,dirObj,theme,1,animate#4,Er,5,PersPron,animate,1,1,SubjA,agent,1,Anna,4,1,Anna,4,1,1,resolved
        "###);
    }

    #[test]
    fn json_lines_keep_nesting() {
        let out = render(OutputFormat::Json);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["pronoun"]["text"], "sie");
        assert_eq!(lines[1]["clause_mate"]["text"], "Er");
        assert_eq!(lines[1]["antecedent"]["most_recent_text"], "Anna");
        assert_eq!(lines[1]["antecedent"]["status"], "resolved");
        assert!(lines[0]["antecedent"]["most_recent_text"].is_null());
    }
}
