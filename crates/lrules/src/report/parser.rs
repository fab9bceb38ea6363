//! State machine that walks report blocks and assembles a rule collection.
//!
//! Both report layouts start with the same header: a cell reading
//! [`FEATURE_SPACE_MARKER`], followed by a row holding the feature count and a
//! row holding the class count (the number is the second text of each row).
//!
//! * [`ReportLayout::RulesTable`]: one or more sections headed by
//!   [`RULES_TABLE_MARKER`]. The next row holds the number of rules, then one
//!   row per rule: `"... (класс N)"`, rule text.
//! * [`ReportLayout::PerClass`]: one section per class headed by `"Класс N"`;
//!   every following multi-cell row is a rule whose third cell is the rule
//!   text, until a single-cell row or the next class header.

use super::bounds::{BoundDelimiter, BoundParser};
use super::markup::{blocks, tokenize, Block};
use crate::diagnostics::Diagnostics;
use crate::error::{LrulesError, Result};
use crate::rule::{push_unique, ClassLabel, IntervalRule, RuleCollection};
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const FEATURE_SPACE_MARKER: &str = "Пространство";
pub const RULES_TABLE_MARKER: &str = "Найденные закономерности";
const CLASS_SECTION_PATTERN: &str = r"^Класс (\d+)$";
const RULE_CLASS_PATTERN: &str = r"\(класс (\d+)\)$";
const PER_CLASS_RULE_CELLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportLayout {
    #[value(name = "rules")]
    RulesTable,
    #[value(name = "classes")]
    PerClass,
}

impl ReportLayout {
    /// Feature letter used by reports of this layout.
    pub fn feature_letter(&self) -> &'static str {
        match self {
            ReportLayout::RulesTable => "X",
            ReportLayout::PerClass => "x",
        }
    }

    pub fn default_delimiter(&self) -> BoundDelimiter {
        match self {
            ReportLayout::RulesTable => BoundDelimiter::Le,
            ReportLayout::PerClass => BoundDelimiter::Lt,
        }
    }
}

/// Header counts of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportHeader {
    pub n_features: usize,
    pub n_classes: usize,
}

/// Rules recovered from a report together with its header.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub header: ReportHeader,
    pub rules: RuleCollection,
}

#[derive(Debug)]
enum State {
    SeekHeader,
    FeatureCount,
    ClassCount { n_features: usize },
    SeekSection,
    RuleCount,
    TableRows { remaining: usize, total: usize },
    ClassRows { label: ClassLabel },
}

pub struct ReportParser<'a> {
    layout: ReportLayout,
    bounds: BoundParser,
    class_section: Regex,
    rule_class: Regex,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ReportParser<'a> {
    /// Parser for `layout` using the layout's usual delimiter.
    pub fn new(layout: ReportLayout, diagnostics: &'a dyn Diagnostics) -> Result<Self> {
        Self::with_delimiter(layout, layout.default_delimiter(), diagnostics)
    }

    pub fn with_delimiter(
        layout: ReportLayout,
        delimiter: BoundDelimiter,
        diagnostics: &'a dyn Diagnostics,
    ) -> Result<Self> {
        let compile = |source: &str| {
            Regex::new(source).map_err(|e| LrulesError::Config(format!("Invalid pattern: {}", e)))
        };

        Ok(Self {
            layout,
            bounds: BoundParser::new(layout.feature_letter(), delimiter)?,
            class_section: compile(CLASS_SECTION_PATTERN)?,
            rule_class: compile(RULE_CLASS_PATTERN)?,
            diagnostics,
        })
    }

    pub fn layout(&self) -> ReportLayout {
        self.layout
    }

    pub fn parse_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<ParsedReport> {
        let markup = super::read_report(path, self.diagnostics)?;
        self.parse(&markup)
    }

    pub fn parse(&self, markup: &str) -> Result<ParsedReport> {
        let blocks = blocks(&tokenize(markup));
        self.parse_blocks(&blocks)
    }

    pub fn parse_blocks(&self, blocks: &[Block]) -> Result<ParsedReport> {
        let mut state = State::SeekHeader;
        let mut header: Option<ReportHeader> = None;
        let mut rules = RuleCollection::new();
        let mut table: BTreeMap<ClassLabel, Vec<IntervalRule>> = BTreeMap::new();
        let mut sections = 0usize;

        let mut i = 0;
        while i < blocks.len() {
            let block = &blocks[i];
            let mut advance = true;

            state = match state {
                State::SeekHeader => {
                    if has_text(block, |t| t == FEATURE_SPACE_MARKER) {
                        State::FeatureCount
                    } else {
                        State::SeekHeader
                    }
                }

                State::FeatureCount => match block {
                    Block::Row(cells) => State::ClassCount {
                        n_features: header_count(cells, "feature")?,
                    },
                    Block::Text(_) => State::FeatureCount,
                },

                State::ClassCount { n_features } => match block {
                    Block::Row(cells) => {
                        let n_classes = header_count(cells, "class")?;
                        self.diagnostics.debug(&format!(
                            "finished common parsing: {} classes, {} features",
                            n_classes, n_features
                        ));
                        header = Some(ReportHeader {
                            n_features,
                            n_classes,
                        });
                        State::SeekSection
                    }
                    Block::Text(_) => State::ClassCount { n_features },
                },

                State::SeekSection => match self.layout {
                    ReportLayout::RulesTable => {
                        if has_text(block, |t| t == RULES_TABLE_MARKER) {
                            State::RuleCount
                        } else {
                            State::SeekSection
                        }
                    }
                    ReportLayout::PerClass => {
                        if let Some(number) = self.class_marker(block) {
                            sections += 1;
                            self.diagnostics.debug(&format!(
                                "section 'Класс {}' holds rules of class {}",
                                number, sections
                            ));
                            State::ClassRows { label: sections }
                        } else {
                            State::SeekSection
                        }
                    }
                },

                State::RuleCount => match block {
                    Block::Row(cells) => {
                        let total = cells
                            .get(1)
                            .and_then(|c| c.trim().parse::<usize>().ok())
                            .ok_or_else(|| {
                                LrulesError::Parse(format!("no rule count in row {:?}", cells))
                            })?;
                        self.diagnostics
                            .info(&format!("there are a total of {} rules", total));
                        if total == 0 {
                            State::SeekSection
                        } else {
                            State::TableRows {
                                remaining: total,
                                total,
                            }
                        }
                    }
                    Block::Text(_) => State::RuleCount,
                },

                State::TableRows { remaining, total } => match block {
                    Block::Row(cells) => {
                        let n_features = header.map_or(0, |h| h.n_features);
                        let (label, rule) = self.table_rule(cells, n_features)?;
                        table.entry(label).or_default().push(rule);

                        if remaining == 1 {
                            self.merge_table(&mut rules, std::mem::take(&mut table));
                            State::SeekSection
                        } else {
                            State::TableRows {
                                remaining: remaining - 1,
                                total,
                            }
                        }
                    }
                    Block::Text(_) => State::TableRows { remaining, total },
                },

                State::ClassRows { label } => {
                    if self.class_marker(block).is_some() {
                        advance = false;
                        self.finish_section(&mut rules, label);
                        State::SeekSection
                    } else {
                        match block {
                            Block::Row(cells) if cells.len() > 1 => {
                                let n_features = header.map_or(0, |h| h.n_features);
                                let rule = self.class_rule(cells, n_features)?;
                                rules.entry(label).or_default().push(rule);
                                State::ClassRows { label }
                            }
                            Block::Row(_) => {
                                self.finish_section(&mut rules, label);
                                State::SeekSection
                            }
                            Block::Text(_) => State::ClassRows { label },
                        }
                    }
                }
            };

            if advance {
                i += 1;
            }
        }

        let header = match (header, &state) {
            (Some(header), _) => header,
            (None, State::SeekHeader) => {
                return Err(LrulesError::MalformedHeader(format!(
                    "no '{}' cell",
                    FEATURE_SPACE_MARKER
                )))
            }
            (None, _) => {
                return Err(LrulesError::MalformedHeader(
                    "report ends inside the header".to_string(),
                ))
            }
        };

        match state {
            State::TableRows { remaining, total } => {
                return Err(LrulesError::Parse(format!(
                    "rules table ends after {} of {} rules",
                    total - remaining,
                    total
                )))
            }
            State::RuleCount => {
                return Err(LrulesError::Parse(
                    "rules table has no rule count row".to_string(),
                ))
            }
            State::ClassRows { label } => self.finish_section(&mut rules, label),
            _ => {}
        }

        match self.layout {
            ReportLayout::RulesTable if rules.is_empty() => {
                return Err(LrulesError::Parse(format!(
                    "no '{}' table with rules",
                    RULES_TABLE_MARKER
                )));
            }
            ReportLayout::PerClass if sections != header.n_classes => {
                return Err(LrulesError::Parse(format!(
                    "found {} class sections, header declares {} classes",
                    sections, header.n_classes
                )));
            }
            _ => {}
        }

        Ok(ParsedReport { header, rules })
    }

    fn class_marker(&self, block: &Block) -> Option<usize> {
        block.texts().iter().find_map(|text| {
            self.class_section
                .captures(text)
                .and_then(|caps| caps[1].parse().ok())
        })
    }

    fn table_rule(&self, cells: &[String], n_features: usize) -> Result<(ClassLabel, IntervalRule)> {
        let (tag, text) = match cells {
            [tag, text, ..] => (tag, text),
            _ => {
                return Err(LrulesError::Parse(format!(
                    "rule row needs a class cell and a rule cell: {:?}",
                    cells
                )))
            }
        };
        let label = self
            .rule_class
            .captures(tag)
            .and_then(|caps| caps[1].parse::<ClassLabel>().ok())
            .ok_or_else(|| LrulesError::Parse(format!("no class in rule tag '{}'", tag)))?;

        Ok((label, self.bounds.parse_rule(text, n_features)?))
    }

    fn class_rule(&self, cells: &[String], n_features: usize) -> Result<IntervalRule> {
        if cells.len() != PER_CLASS_RULE_CELLS {
            return Err(LrulesError::Parse(format!(
                "class rule row has {} cells, expected {}: {:?}",
                cells.len(),
                PER_CLASS_RULE_CELLS,
                cells
            )));
        }
        self.bounds.parse_rule(&cells[2], n_features)
    }

    /// Adds one table's rules, skipping rules a class already has.
    fn merge_table(&self, rules: &mut RuleCollection, table: BTreeMap<ClassLabel, Vec<IntervalRule>>) {
        for (label, table_rules) in table {
            match rules.get_mut(&label) {
                Some(existing) => {
                    let before = existing.len();
                    for rule in table_rules {
                        push_unique(existing, rule);
                    }
                    self.diagnostics.debug(&format!(
                        "class {}, there were {} rules, now there are {}",
                        label,
                        before,
                        existing.len()
                    ));
                }
                None => {
                    self.diagnostics.info(&format!(
                        "class {}, {} candidate rules",
                        label,
                        table_rules.len()
                    ));
                    rules.insert(label, table_rules);
                }
            }
        }
    }

    fn finish_section(&self, rules: &mut RuleCollection, label: ClassLabel) {
        let count = rules.entry(label).or_default().len();
        self.diagnostics
            .debug(&format!("{} rules for class {}", count, label));
    }
}

fn has_text(block: &Block, pred: impl Fn(&str) -> bool) -> bool {
    block.texts().iter().any(|t| pred(t.as_str()))
}

fn header_count(cells: &[String], what: &str) -> Result<usize> {
    let count = cells
        .get(1)
        .and_then(|c| c.trim().parse::<usize>().ok())
        .ok_or_else(|| LrulesError::MalformedHeader(format!("no {} count in row {:?}", what, cells)))?;
    if count < 1 {
        return Err(LrulesError::MalformedHeader(format!(
            "{} count must be at least 1",
            what
        )));
    }
    Ok(count)
}
