use crate::blockchain::core::chain::Block;
use crate::blockchain::core::validation::validate_chain;
use crate::error::{ChainError, Result};
use crate::transaction::Transaction;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{error, info, warn};

#[derive(Debug)]
struct LedgerState {
    pending: Vec<Transaction>,
    blocks: Vec<Block>,
}

/// The chain manager: a buffer of verified transactions awaiting sealing and
/// the append-only sequence of sealed blocks.
///
/// All mutation goes through a single lock, so `submit_transaction` and
/// `seal_block` calls from different threads are linearizable. Signature
/// checks run before the lock is taken.
#[derive(Debug)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Creates a ledger holding only the genesis block.
    pub fn new() -> Result<Self> {
        let genesis = Block::genesis()?;
        info!(hash = %genesis.hash(), "Genesis block created");

        Ok(Ledger {
            state: Mutex::new(LedgerState {
                pending: Vec::new(),
                blocks: vec![genesis],
            }),
        })
    }

    /// Verifies `signature` against the sender key the transaction declares
    /// and, if it holds, appends the transaction to the pending buffer.
    ///
    /// A rejected transaction leaves the ledger untouched.
    pub fn submit_transaction(&self, transaction: Transaction, signature: &str) -> Result<()> {
        if let Err(e) = transaction.verify_signature(signature) {
            warn!(
                recipient = %transaction.recipient(),
                amount = transaction.amount(),
                reason = %e,
                "Transaction rejected"
            );
            return Err(e);
        }

        let mut state = self.state.lock();
        state.pending.push(transaction);
        info!(pending = state.pending.len(), "Transaction admitted");
        Ok(())
    }

    /// Verifies every submission in parallel, then admits the valid ones in
    /// input order under a single lock acquisition.
    pub fn submit_batch(&self, submissions: Vec<(Transaction, String)>) -> Vec<Result<()>> {
        let verdicts: Vec<Result<()>> = submissions
            .par_iter()
            .map(|(tx, signature)| tx.verify_signature(signature))
            .collect();

        let mut state = self.state.lock();
        let mut admitted = 0usize;
        for ((tx, _), verdict) in submissions.into_iter().zip(&verdicts) {
            if verdict.is_ok() {
                state.pending.push(tx);
                admitted += 1;
            }
        }
        info!(
            admitted,
            rejected = verdicts.len() - admitted,
            pending = state.pending.len(),
            "Batch processed"
        );
        verdicts
    }

    /// Seals every pending transaction into a new block linked to the current
    /// tip, appends it, and empties the buffer, all under one lock.
    pub fn seal_block(&self) -> Result<Block> {
        let mut state = self.state.lock();

        let (index, previous_hash) = match state.blocks.last() {
            Some(tip) => (tip.index() + 1, tip.hash().to_string()),
            None => {
                error!("Attempted to seal a block on an empty chain");
                return Err(ChainError::EmptyChain);
            }
        };

        let block = Block::new(index, &state.pending, previous_hash)?;
        state.pending.clear();
        state.blocks.push(block.clone());

        info!(
            index = block.index(),
            hash = %block.hash(),
            transactions = block.transactions().len(),
            "Block sealed"
        );
        Ok(block)
    }

    /// A copy of the sealed blocks, genesis first.
    pub fn list_blocks(&self) -> Vec<Block> {
        self.state.lock().blocks.clone()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state.lock().pending.clone()
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn block_count(&self) -> usize {
        self.state.lock().blocks.len()
    }

    pub fn last_block(&self) -> Option<Block> {
        self.state.lock().blocks.last().cloned()
    }

    /// Re-checks hashes and linkage over the whole chain.
    pub fn validate(&self) -> Result<()> {
        validate_chain(&self.state.lock().blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn signed(keypair: &KeyPair, recipient: &str, amount: f64) -> (Transaction, String) {
        let tx = Transaction::new(keypair.public_key_bytes().to_vec(), recipient, amount).unwrap();
        let signature = tx.sign_with(keypair).unwrap();
        (tx, signature)
    }

    #[test]
    fn test_new_ledger_has_genesis() {
        let ledger = Ledger::new().unwrap();
        let blocks = ledger.list_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].index(), 1);
        assert_eq!(blocks[0].previous_hash(), "0");
        assert!(blocks[0].transactions().is_empty());
        assert_eq!(ledger.pending_len(), 0);
    }

    #[test]
    fn test_submit_and_seal() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        let (tx, sig) = signed(&alice, "bob", 10.0);

        ledger.submit_transaction(tx.clone(), &sig).unwrap();
        assert_eq!(ledger.pending_transactions(), vec![tx.clone()]);

        let genesis_hash = ledger.list_blocks()[0].hash().to_string();
        let block = ledger.seal_block().unwrap();
        assert_eq!(block.index(), 2);
        assert_eq!(block.transactions(), &[tx]);
        assert_eq!(block.previous_hash(), genesis_hash);
        assert_eq!(ledger.pending_len(), 0);
        assert_eq!(ledger.last_block(), Some(block));
    }

    #[test]
    fn test_rejected_submission_changes_nothing() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        let mallory = KeyPair::generate();

        let (good, good_sig) = signed(&alice, "bob", 10.0);
        ledger.submit_transaction(good.clone(), &good_sig).unwrap();

        let forged = Transaction::new(alice.public_key_bytes().to_vec(), "bob", 10.0).unwrap();
        let forged_sig = forged.sign_with(&mallory).unwrap();
        let result = ledger.submit_transaction(forged, &forged_sig);

        assert_eq!(result, Err(ChainError::InvalidSignature));
        assert_eq!(ledger.pending_transactions(), vec![good]);
        assert_eq!(ledger.block_count(), 1);
    }

    #[test]
    fn test_malformed_sender_key_reported() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        let tx = Transaction::new(vec![0x05; 12], "bob", 1.0).unwrap();
        let sig = tx.sign_with(&alice).unwrap();

        let err = ledger.submit_transaction(tx, &sig).unwrap_err();
        assert!(matches!(err, ChainError::MalformedKey(_)));
        assert!(err.is_authentication_failure());
        assert_eq!(ledger.pending_len(), 0);
    }

    #[test]
    fn test_seal_empty_buffer_produces_empty_block() {
        let ledger = Ledger::new().unwrap();
        let block = ledger.seal_block().unwrap();
        assert_eq!(block.index(), 2);
        assert!(block.transactions().is_empty());
    }

    #[test]
    fn test_seal_preserves_submission_order() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        let mut expected = Vec::new();
        for i in 0..5 {
            let (tx, sig) = signed(&alice, &format!("r{}", i), i as f64);
            ledger.submit_transaction(tx.clone(), &sig).unwrap();
            expected.push(tx);
        }
        let block = ledger.seal_block().unwrap();
        assert_eq!(block.transactions(), expected.as_slice());
    }

    #[test]
    fn test_chain_linkage_after_many_seals() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        for n in 0..6 {
            let (tx, sig) = signed(&alice, "bob", n as f64);
            ledger.submit_transaction(tx, &sig).unwrap();
            ledger.seal_block().unwrap();
        }

        let blocks = ledger.list_blocks();
        assert_eq!(blocks.len(), 7);
        assert_eq!(blocks[0].previous_hash(), "0");
        for pair in blocks.windows(2) {
            assert_eq!(pair[1].previous_hash(), pair[0].hash());
            assert_eq!(pair[1].index(), pair[0].index() + 1);
        }
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn test_sealed_hash_stable() {
        let ledger = Ledger::new().unwrap();
        let block = ledger.seal_block().unwrap();
        let alice = KeyPair::generate();
        let (tx, sig) = signed(&alice, "bob", 1.0);
        ledger.submit_transaction(tx, &sig).unwrap();
        ledger.seal_block().unwrap();

        let stored = &ledger.list_blocks()[1];
        assert_eq!(stored.hash(), block.hash());
        assert_eq!(stored.recompute_hash().unwrap(), block.hash());
    }

    #[test]
    fn test_submit_batch_keeps_order_and_skips_invalid() {
        let ledger = Ledger::new().unwrap();
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();

        let (a, a_sig) = signed(&alice, "x", 1.0);
        let (b, _) = signed(&alice, "y", 2.0);
        let b_bad_sig = b.sign_with(&bob).unwrap();
        let (c, c_sig) = signed(&bob, "z", 3.0);

        let results = ledger.submit_batch(vec![
            (a.clone(), a_sig),
            (b, b_bad_sig),
            (c.clone(), c_sig),
            (a.clone(), "!!".to_string()),
        ]);

        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(ChainError::InvalidSignature));
        assert!(results[2].is_ok());
        assert!(matches!(results[3], Err(ChainError::MalformedSignature(_))));
        assert_eq!(ledger.pending_transactions(), vec![a, c]);
    }

    #[test]
    fn test_seal_on_empty_chain_reports_invariant() {
        let ledger = Ledger {
            state: Mutex::new(LedgerState {
                pending: Vec::new(),
                blocks: Vec::new(),
            }),
        };
        assert_eq!(ledger.seal_block(), Err(ChainError::EmptyChain));
        assert_eq!(ledger.validate(), Err(ChainError::EmptyChain));
    }
}
