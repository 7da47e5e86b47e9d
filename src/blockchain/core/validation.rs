use crate::blockchain::core::chain::{Block, GENESIS_INDEX, GENESIS_PREVIOUS_HASH};
use crate::error::ChainError;

/// Checks a whole block sequence: non-empty, genesis sentinel, contiguous
/// 1-based indices, stored hashes match their fields, and every block links
/// to the hash of the one before it.
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let first = blocks.first().ok_or(ChainError::EmptyChain)?;
    if first.previous_hash() != GENESIS_PREVIOUS_HASH {
        return Err(ChainError::InvalidBlockLinkage {
            index: first.index(),
            expected: GENESIS_PREVIOUS_HASH.to_string(),
            found: first.previous_hash().to_string(),
        });
    }

    let mut previous: Option<&Block> = None;
    for (position, block) in blocks.iter().enumerate() {
        let expected_index = GENESIS_INDEX + position as u64;
        if block.index() != expected_index {
            return Err(ChainError::InvalidBlock {
                index: block.index(),
                reason: format!("expected index {}", expected_index),
            });
        }

        validate_block_hash(block)?;

        if let Some(prev) = previous {
            if block.previous_hash() != prev.hash() {
                return Err(ChainError::InvalidBlockLinkage {
                    index: block.index(),
                    expected: prev.hash().to_string(),
                    found: block.previous_hash().to_string(),
                });
            }
        }
        previous = Some(block);
    }
    Ok(())
}

pub fn validate_block_hash(block: &Block) -> Result<(), ChainError> {
    let computed = block.recompute_hash()?;
    if computed != block.hash() {
        return Err(ChainError::BlockHashMismatch {
            index: block.index(),
            expected: computed,
            found: block.hash().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(len: usize) -> Vec<Block> {
        let mut blocks = vec![Block::with_timestamp(1, vec![], 10.0, "0").unwrap()];
        for i in 1..len {
            let prev = blocks[i - 1].hash().to_string();
            blocks.push(Block::with_timestamp(i as u64 + 1, vec![], 10.0 + i as f64, prev).unwrap());
        }
        blocks
    }

    #[test]
    fn test_valid_chain() {
        assert!(validate_chain(&chain_of(4)).is_ok());
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert_eq!(validate_chain(&[]), Err(ChainError::EmptyChain));
    }

    #[test]
    fn test_bad_genesis_sentinel() {
        let blocks = vec![Block::with_timestamp(1, vec![], 10.0, "1").unwrap()];
        assert!(matches!(
            validate_chain(&blocks),
            Err(ChainError::InvalidBlockLinkage { index: 1, .. })
        ));
    }

    #[test]
    fn test_broken_link_detected() {
        let mut blocks = chain_of(3);
        blocks[2] = Block::with_timestamp(3, vec![], 99.0, "deadbeef").unwrap();
        assert!(matches!(
            validate_chain(&blocks),
            Err(ChainError::InvalidBlockLinkage { index: 3, .. })
        ));
    }

    #[test]
    fn test_index_gap_detected() {
        let mut blocks = chain_of(2);
        let prev = blocks[1].hash().to_string();
        blocks.push(Block::with_timestamp(5, vec![], 50.0, prev).unwrap());
        assert!(matches!(
            validate_chain(&blocks),
            Err(ChainError::InvalidBlock { index: 5, .. })
        ));
    }

    #[test]
    fn test_stored_hash_mismatch_detected() {
        let blocks = chain_of(2);
        let json = serde_json::to_string(&blocks).unwrap();
        let tampered: Vec<Block> = serde_json::from_str(&json.replace("11.0", "12.0")).unwrap();
        assert!(matches!(
            validate_chain(&tampered),
            Err(ChainError::BlockHashMismatch { index: 2, .. })
        ));
    }
}
