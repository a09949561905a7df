use super::{column_of, BlockExtractor, PendingBlock, RawBlock};
use log::debug;
use std::path::Path;

/// Extractor for languages with `#` line comments (Python, Ruby, shell).
///
/// Consecutive `#` lines form one block; a shebang on the first line is not
/// a comment.
pub struct HashExtractor;

impl BlockExtractor for HashExtractor {
    fn extract_blocks(&self, path: &Path, content: &str) -> Vec<RawBlock> {
        let mut blocks = Vec::new();
        let mut run: Option<PendingBlock> = None;

        for (index, line) in content.lines().enumerate() {
            let is_shebang = index == 0 && line.starts_with("#!");
            match line.trim_start().strip_prefix('#') {
                Some(after) if !is_shebang => {
                    let text = after.strip_prefix(' ').unwrap_or(after);
                    run.get_or_insert_with(|| PendingBlock::new(index + 1, column_of(line, text)))
                        .push(text);
                }
                _ => {
                    if let Some(block) = run.take() {
                        block.finish(path, &mut blocks);
                    }
                }
            }
        }

        if let Some(block) = run {
            block.finish(path, &mut blocks);
        }

        debug!("Extracted {} blocks from {}", blocks.len(), path.display());
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Location;

    #[test]
    fn test_hash_comment_run() {
        let source = "#!/usr/bin/env python\n# @api GET /pets list pets\n#   @apiTags pets\ndef list_pets():\n    pass\n";
        let blocks = HashExtractor.extract_blocks(Path::new("pets.py"), source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].location, Location::new(2, 3));
        assert_eq!(blocks[0].text, "@api GET /pets list pets\n  @apiTags pets");
    }

    #[test]
    fn test_shebang_with_annotation_is_ignored() {
        let blocks = HashExtractor.extract_blocks(Path::new("x.rb"), "#!@api GET /x\nputs 1\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_indented_comment_block() {
        let source = "class Pets:\n    # @api POST /pets\n    # @apiTags pets\n    def create(self):\n        pass\n";
        let blocks = HashExtractor.extract_blocks(Path::new("pets.py"), source);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].location, Location::new(2, 7));
    }
}
