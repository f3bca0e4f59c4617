//! Whole-buffer rewriting.
//!
//! Every idiom of the catalog is matched against the original buffer. Field
//! maps are parsed and destination calls rendered per match; a match that
//! fails to parse is recorded as skipped and its text left alone. Accepted
//! spans never overlap (earlier idioms in the catalog win) and are replaced
//! in one pass, so reported line numbers always refer to the input.

use std::ops::Range;

use anyhow::Result;

use super::{
    fields::{ScanMode, parse_fields},
    idiom::{CallIdiom, Level},
    location::{LineIndex, SourceLocation},
    matcher::{CompiledIdiom, SkipReason},
    synth::render_call,
};

/// One call site that was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedRewrite {
    pub idiom: String,
    pub level: Level,
    pub location: SourceLocation,
    /// First line of the original call, for previews.
    pub source_line: String,
    pub original: String,
    pub replacement: String,
}

/// One call site that matched an idiom head but was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSite {
    pub idiom: String,
    pub location: SourceLocation,
    pub source_line: String,
    pub reason: SkipReason,
}

/// Result of rewriting one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferRewrite {
    pub content: String,
    pub rewrites: Vec<AppliedRewrite>,
    pub skipped: Vec<SkippedSite>,
}

impl BufferRewrite {
    pub fn is_changed(&self) -> bool {
        !self.rewrites.is_empty()
    }
}

struct Planned {
    span: Range<usize>,
    rewrite: AppliedRewrite,
}

/// The compiled catalog plus scan mode. Immutable; share freely across threads.
pub struct Rewriter {
    idioms: Vec<CompiledIdiom>,
    mode: ScanMode,
}

impl Rewriter {
    pub fn new(catalog: &[CallIdiom], mode: ScanMode) -> Result<Self> {
        let idioms = catalog
            .iter()
            .map(CompiledIdiom::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { idioms, mode })
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn idioms(&self) -> impl Iterator<Item = &CallIdiom> {
        self.idioms.iter().map(|compiled| &compiled.idiom)
    }

    /// Rewrite every recognized call site in `buffer`.
    pub fn rewrite(&self, buffer: &str) -> BufferRewrite {
        let index = LineIndex::new(buffer);
        let mut planned: Vec<Planned> = Vec::new();
        let mut skipped: Vec<(Range<usize>, SkippedSite)> = Vec::new();

        for compiled in &self.idioms {
            let name = &compiled.idiom.name;
            let results = compiled.find_call_sites(buffer, self.mode);

            for rejection in results.rejections {
                let offset = rejection.offset;
                skipped.push((
                    offset..offset + 1,
                    SkippedSite {
                        idiom: name.clone(),
                        location: index.location(offset),
                        source_line: index.line_text(offset).to_string(),
                        reason: rejection.reason,
                    },
                ));
            }

            for site in results.matches {
                let start = site.span.start;
                let fields = match parse_fields(&site.fields_text, self.mode) {
                    Ok(fields) => fields,
                    Err(err) => {
                        skipped.push((
                            site.span.clone(),
                            SkippedSite {
                                idiom: name.clone(),
                                location: index.location(start),
                                source_line: index.line_text(start).to_string(),
                                reason: SkipReason::Fields(err),
                            },
                        ));
                        continue;
                    }
                };

                if planned.iter().any(|p| overlaps(&p.span, &site.span)) {
                    continue;
                }

                let replacement = render_call(&site.qualifier, site.level, &site.message, &fields);
                planned.push(Planned {
                    span: site.span,
                    rewrite: AppliedRewrite {
                        idiom: name.clone(),
                        level: site.level,
                        location: index.location(start),
                        source_line: index.line_text(start).to_string(),
                        original: site.raw_text,
                        replacement,
                    },
                });
            }
        }

        planned.sort_by_key(|p| p.span.start);

        let mut content = String::with_capacity(buffer.len());
        let mut cursor = 0;
        for p in &planned {
            content.push_str(&buffer[cursor..p.span.start]);
            content.push_str(&p.rewrite.replacement);
            cursor = p.span.end;
        }
        content.push_str(&buffer[cursor..]);

        // a site swallowed by an accepted rewrite is no longer a pending site
        let mut skipped: Vec<SkippedSite> = skipped
            .into_iter()
            .filter(|(span, _)| !planned.iter().any(|p| overlaps(&p.span, span)))
            .map(|(_, site)| site)
            .collect();
        skipped.sort_by_key(|site| site.location);

        BufferRewrite {
            content,
            rewrites: planned.into_iter().map(|p| p.rewrite).collect(),
            skipped,
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
