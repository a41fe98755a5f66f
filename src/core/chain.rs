use crate::core::Block;
use crate::error::Result;

/// Append-only ordered sequence of accepted blocks, seeded with genesis.
/// Each node owns exactly one chain; there is no shared chain across nodes
/// and no persistence across restarts.
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    pub fn new() -> Result<Chain> {
        Ok(Chain {
            blocks: vec![Block::genesis()?],
        })
    }

    /// The most recently accepted block. The chain always holds at least
    /// genesis, so a tip always exists.
    pub fn tip(&self) -> &Block {
        self.blocks
            .last()
            .expect("Chain always holds the genesis block")
    }

    pub fn append(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        self.blocks.as_slice()
    }
}
