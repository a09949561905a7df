use super::{column_of, BlockExtractor, PendingBlock, RawBlock};
use log::{debug, warn};
use std::path::Path;

/// Extractor for languages with `//` line comments and `/* */` block comments.
///
/// Consecutive `//` lines form one block. Rust-style `///` and `//!` markers
/// are accepted too. Both comment kinds only count when they start the line. Inside a `/* */` block a leading `*` on each line is
/// stripped together with one following space; lines without it are kept
/// verbatim.
pub struct CStyleExtractor;

impl BlockExtractor for CStyleExtractor {
    fn extract_blocks(&self, path: &Path, content: &str) -> Vec<RawBlock> {
        let mut blocks = Vec::new();
        let mut line_run: Option<PendingBlock> = None;
        let mut open_block: Option<PendingBlock> = None;

        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;

            if let Some(mut block) = open_block.take() {
                match line.find("*/") {
                    Some(end) => {
                        block.push(strip_star(&line[..end]));
                        block.finish(path, &mut blocks);
                    }
                    None => {
                        block.push(strip_star(line));
                        open_block = Some(block);
                    }
                }
                continue;
            }

            if let Some(after) = line.trim_start().strip_prefix("//") {
                let after = after
                    .strip_prefix(|c: char| c == '/' || c == '!')
                    .unwrap_or(after);
                let text = after.strip_prefix(' ').unwrap_or(after);
                line_run
                    .get_or_insert_with(|| PendingBlock::new(line_no, column_of(line, text)))
                    .push(text);
                continue;
            }

            if let Some(run) = line_run.take() {
                run.finish(path, &mut blocks);
            }

            // A `/*` after code may sit inside a string literal such as "text/*"
            if let Some(after) = line.trim_start().strip_prefix("/*") {
                let after = match after.strip_prefix('*') {
                    Some(rest) if !rest.starts_with('/') => rest,
                    _ => after,
                };
                let text = after.strip_prefix(' ').unwrap_or(after);
                let mut block = PendingBlock::new(line_no, column_of(line, text));
                match text.find("*/") {
                    Some(end) => {
                        block.push(&text[..end]);
                        block.finish(path, &mut blocks);
                    }
                    None => {
                        block.push(text);
                        open_block = Some(block);
                    }
                }
            }
        }

        if let Some(run) = line_run {
            run.finish(path, &mut blocks);
        }
        if let Some(block) = open_block {
            warn!("Unterminated block comment in {}", path.display());
            block.finish(path, &mut blocks);
        }

        debug!("Extracted {} blocks from {}", blocks.len(), path.display());
        blocks
    }
}

fn strip_star(line: &str) -> &str {
    match line.trim_start().strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}
