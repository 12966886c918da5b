//! End-to-end analysis: parse, extract, resolve.
//!
//! ```text
//! file ─▶ CorpusReader ─▶ sentences ─▶ phrases ─┬─▶ AntecedentResolver::observe
//!                                               └─▶ RelationshipExtractor
//!                                                      └─▶ resolve ─▶ RecordSink
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use clause_mates::{
    ChainKey, ClauseMateError, ClauseMateResult, CorpusReader, DiagnosticSummary, Diagnostics,
    LayoutDescriptor, TokenOffsets,
};
use clause_mates_relations::{segment_phrases, ClauseMateRelationship, RelationshipExtractor};

use crate::config::AnalyzerConfig;
use crate::resolver::AntecedentResolver;
use crate::unifier::{chapter_offsets, ChainSummary, CrossFileUnifier};

/// Destination for finished relationship records.
pub trait RecordSink {
    fn accept(&mut self, record: ClauseMateRelationship) -> ClauseMateResult<()>;
}

impl RecordSink for Vec<ClauseMateRelationship> {
    fn accept(&mut self, record: ClauseMateRelationship) -> ClauseMateResult<()> {
        self.push(record);
        Ok(())
    }
}

/// The layout a file was read with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileLayout {
    pub source: String,
    pub layout: LayoutDescriptor,
}

/// A file that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    pub source: String,
    pub error: ClauseMateError,
}

/// What streaming one file produced.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub layout: FileLayout,
    pub diagnostics: Diagnostics,
    pub records: usize,
    /// Offsets a following chapter starts from
    pub next_offsets: TokenOffsets,
}

/// Results of a run over one or more files.
///
/// `relationships` is empty when records were streamed to a sink; `records`
/// counts them either way.
#[derive(Debug, Default)]
pub struct AnalysisReport {
    pub layouts: Vec<FileLayout>,
    pub relationships: Vec<ClauseMateRelationship>,
    pub diagnostics: Vec<Diagnostics>,
    pub failures: Vec<FileFailure>,
    pub records: usize,
}

impl AnalysisReport {
    fn push_outcome(&mut self, outcome: FileOutcome) {
        self.records += outcome.records;
        self.layouts.push(outcome.layout);
        self.diagnostics.push(outcome.diagnostics);
    }

    fn push_failure(&mut self, source: String, error: ClauseMateError) {
        log::warn!("{}: {}", source, error);
        self.failures.push(FileFailure { source, error });
    }

    fn merge(&mut self, other: AnalysisReport) {
        self.layouts.extend(other.layouts);
        self.relationships.extend(other.relationships);
        self.diagnostics.extend(other.diagnostics);
        self.failures.extend(other.failures);
        self.records += other.records;
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Diagnostic counts over every file.
    pub fn summary(&self) -> DiagnosticSummary {
        let mut total = DiagnosticSummary::default();
        for summary in self.diagnostics.iter().map(Diagnostics::summary) {
            total.skipped_rows += summary.skipped_rows;
            total.unresolved_antecedents += summary.unresolved_antecedents;
            total.layout_disagreements += summary.layout_disagreements;
            total.degraded |= summary.degraded;
        }
        total
    }
}

/// Runs the analysis with one configuration.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalyzerConfig,
    extractor: RelationshipExtractor,
    unifier: CrossFileUnifier,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            extractor: RelationshipExtractor::new(config.pronouns.clone()),
            unifier: CrossFileUnifier::new(config.unifier.min_similarity, config.pronouns.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn open(&self, path: &Path) -> ClauseMateResult<CorpusReader<BufReader<File>>> {
        CorpusReader::open(path, &self.config.schema)
    }

    fn stream<R, S>(
        &self,
        corpus: CorpusReader<R>,
        offsets: TokenOffsets,
        resolver: &mut AntecedentResolver,
        sink: &mut S,
    ) -> ClauseMateResult<FileOutcome>
    where
        R: BufRead,
        S: RecordSink + ?Sized,
    {
        let source = corpus.source_name().to_string();
        let layout = corpus.layout().clone();
        let mut sentences = corpus.sentences(offsets);
        let mut resolution = Diagnostics::new(source.clone());
        let mut records = 0;

        for sentence in &mut sentences {
            let phrases = segment_phrases(&sentence);
            resolver.observe(&sentence, &phrases);
            for mut relationship in self.extractor.extract_with_phrases(&sentence, &phrases) {
                resolver.resolve(&mut relationship, &mut resolution);
                sink.accept(relationship)?;
                records += 1;
            }
        }

        let next_offsets = sentences.next_offsets();
        let mut diagnostics = sentences.finish()?;
        diagnostics.extend(resolution);
        log::info!(
            "{}: {} layout, {} relationships, {}",
            source,
            layout.variant,
            records,
            diagnostics.summary()
        );

        Ok(FileOutcome {
            layout: FileLayout { source, layout },
            diagnostics,
            records,
            next_offsets,
        })
    }

    /// Stream one source into a sink with a fresh resolver.
    pub fn run_reader<R, S>(&self, reader: R, source_name: &str, sink: &mut S) -> ClauseMateResult<FileOutcome>
    where
        R: BufRead,
        S: RecordSink + ?Sized,
    {
        let corpus = CorpusReader::from_reader(reader, source_name, &self.config.schema)?;
        self.stream(corpus, TokenOffsets::default(), &mut AntecedentResolver::new(), sink)
    }

    /// Stream one file into a sink with a fresh resolver.
    pub fn run_file<S>(&self, path: &Path, sink: &mut S) -> ClauseMateResult<FileOutcome>
    where
        S: RecordSink + ?Sized,
    {
        let corpus = self.open(path)?;
        self.stream(corpus, TokenOffsets::default(), &mut AntecedentResolver::new(), sink)
    }

    pub fn analyze_reader<R: BufRead>(&self, reader: R, source_name: &str) -> ClauseMateResult<AnalysisReport> {
        let mut report = AnalysisReport::default();
        let outcome = self.run_reader(reader, source_name, &mut report.relationships)?;
        report.push_outcome(outcome);
        Ok(report)
    }

    pub fn analyze_file(&self, path: &Path) -> ClauseMateResult<AnalysisReport> {
        let mut report = AnalysisReport::default();
        let outcome = self.run_file(path, &mut report.relationships)?;
        report.push_outcome(outcome);
        Ok(report)
    }

    /// Analyze unrelated files in parallel, one resolver each. Results keep
    /// the input order.
    pub fn analyze_independent(&self, paths: &[PathBuf]) -> AnalysisReport {
        let results: Vec<(String, ClauseMateResult<AnalysisReport>)> = paths
            .par_iter()
            .map(|path| (path.display().to_string(), self.analyze_file(path)))
            .collect();

        let mut report = AnalysisReport::default();
        for (source, result) in results {
            match result {
                Ok(file_report) => report.merge(file_report),
                Err(error) => report.push_failure(source, error),
            }
        }
        report
    }

    /// Mention texts per chain and the file's size, without resolving.
    fn scan<R: BufRead>(
        &self,
        corpus: CorpusReader<R>,
        file: usize,
    ) -> ClauseMateResult<(Vec<ChainSummary>, (usize, usize))> {
        let mut sentences = corpus.sentences(TokenOffsets::default());
        let mut texts: BTreeMap<ChainKey, Vec<String>> = BTreeMap::new();
        for sentence in &mut sentences {
            for phrase in segment_phrases(&sentence) {
                texts.entry(phrase.key()).or_default().push(phrase.text);
            }
        }
        let size = (sentences.sentence_count(), sentences.token_count());
        sentences.finish()?;

        let summaries = texts
            .into_iter()
            .map(|(key, texts)| ChainSummary { file, key, texts })
            .collect();
        Ok((summaries, size))
    }

    /// Stream files as consecutive chapters of one document.
    ///
    /// Numbering continues across files and chains with matching ids are
    /// unified, so antecedents resolve into earlier chapters. A file that
    /// cannot be read is reported and left out; a sink error ends the run.
    pub fn run_chapters<S>(&self, paths: &[PathBuf], sink: &mut S) -> ClauseMateResult<AnalysisReport>
    where
        S: RecordSink + ?Sized,
    {
        let mut report = AnalysisReport::default();
        let mut summaries = Vec::new();
        let mut sizes = Vec::new();
        let mut readable = Vec::new();

        for (file, path) in paths.iter().enumerate() {
            match self.open(path).and_then(|corpus| self.scan(corpus, file)) {
                Ok((found, size)) => {
                    summaries.extend(found);
                    sizes.push(size);
                    readable.push((file, path));
                }
                Err(error) => report.push_failure(path.display().to_string(), error),
            }
        }

        let plan = self.unifier.plan(&summaries);
        log::debug!(
            "{} chapters, {} chains after unification",
            readable.len(),
            plan.component_count()
        );

        let mut resolver = AntecedentResolver::new();
        for ((file, path), offsets) in readable.into_iter().zip(chapter_offsets(&sizes)) {
            resolver.set_chain_map(plan.chain_map(file));
            let result = match self.open(path) {
                Ok(corpus) => self.stream(corpus, offsets, &mut resolver, sink),
                Err(error) => Err(error),
            };
            match result {
                Ok(outcome) => report.push_outcome(outcome),
                Err(error @ ClauseMateError::Output { .. }) => return Err(error),
                Err(error) => report.push_failure(path.display().to_string(), error),
            }
        }
        Ok(report)
    }

    pub fn analyze_chapters(&self, paths: &[PathBuf]) -> ClauseMateResult<AnalysisReport> {
        let mut relationships = Vec::new();
        let mut report = self.run_chapters(paths, &mut relationships)?;
        report.relationships = relationships;
        Ok(report)
    }
}
