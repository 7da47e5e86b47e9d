//! Interactive shell over a [`Ledger`]
//!
//! Reads menu choices from any `BufRead` and writes to any `Write`, so the
//! binary drives it with stdin/stdout and tests drive it with buffers. Every
//! recoverable ledger error is printed and the loop continues.

use crate::blockchain::{Block, Ledger};
use crate::crypto::{decode_key_hex, parse_public_key, KeyPair};
use crate::error::ChainError;
use crate::transaction::Transaction;
use colored::*;
use std::io::{self, BufRead, Write};
use tracing::warn;

const MENU: &str = "\n1. Add Transaction\n2. Mine Block\n3. View Blockchain\n4. Exit";

pub struct Shell<'a> {
    ledger: &'a Ledger,
    private_key: Vec<u8>,
    public_key: Vec<u8>,
    show_transactions: bool,
}

impl<'a> Shell<'a> {
    pub fn new(ledger: &'a Ledger, private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Shell {
            ledger,
            private_key,
            public_key,
            show_transactions: true,
        }
    }

    pub fn show_transactions(mut self, show: bool) -> Self {
        self.show_transactions = show;
        self
    }

    /// Runs the menu loop until the user exits or input ends.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> io::Result<()> {
        loop {
            writeln!(out, "{}", MENU)?;
            let Some(choice) = prompt(&mut input, &mut out, "Choose an option: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => {
                    if !self.add_transaction(&mut input, &mut out)? {
                        break;
                    }
                }
                "2" => self.mine_block(&mut out)?,
                "3" => self.view_blockchain(&mut out)?,
                "4" => break,
                _ => writeln!(out, "{}", "Invalid option. Please try again.".yellow())?,
            }
        }
        out.flush()
    }

    /// Returns `false` when input ended mid-entry.
    fn add_transaction<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<bool> {
        let Some(recipient) = prompt(input, out, "Recipient: ")? else {
            return Ok(false);
        };
        let Some(amount_text) = prompt(input, out, "Amount: ")? else {
            return Ok(false);
        };

        let amount = match amount_text.parse::<f64>() {
            Ok(amount) => amount,
            Err(_) => {
                writeln!(out, "{}", format!("Invalid amount: {}", amount_text).red())?;
                return Ok(true);
            }
        };

        match self.submit(recipient, amount) {
            Ok(tx) => match tx.canonical_string() {
                Ok(shown) => writeln!(out, "{}", format!("Transaction added: {}", shown).green())?,
                Err(e) => writeln!(out, "{}", format!("Transaction added, but {}", e).yellow())?,
            },
            Err(e) => writeln!(out, "{}", e.to_string().red())?,
        }
        Ok(true)
    }

    fn submit(&self, recipient: String, amount: f64) -> Result<Transaction, ChainError> {
        let tx = Transaction::new(self.public_key.clone(), recipient, amount)?;
        let signature = tx.sign(&self.private_key)?;
        self.ledger.submit_transaction(tx.clone(), &signature)?;
        Ok(tx)
    }

    fn mine_block<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.ledger.seal_block() {
            Ok(block) => writeln!(
                out,
                "{}",
                format!("Block mined: {} with hash: {}", block.index(), block.hash()).green()
            ),
            Err(e) => writeln!(out, "{}", e.to_string().red()),
        }
    }

    fn view_blockchain<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let blocks = self.ledger.list_blocks();
        if blocks.is_empty() {
            return writeln!(out, "{}", "No blocks mined yet.".yellow());
        }
        for block in &blocks {
            render_block(out, block, self.show_transactions)?;
        }
        Ok(())
    }
}

pub fn render_block<W: Write>(out: &mut W, block: &Block, show_transactions: bool) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("Block {}: {}", block.index(), block.hash()).bright_cyan()
    )?;
    if show_transactions {
        for tx in block.transactions() {
            match tx.canonical_string() {
                Ok(shown) => writeln!(out, "  Transaction: {}", shown)?,
                Err(e) => writeln!(out, "  {}", e.to_string().red())?,
            }
        }
    }
    Ok(())
}

/// Decodes and checks the session's hex key pair before any menu is shown.
///
/// A public key that does not belong to the private key is allowed, since the
/// ledger will reject what it signs, but it is logged.
pub fn session_keys(private_hex: &str, public_hex: &str) -> Result<(Vec<u8>, Vec<u8>), ChainError> {
    let private_key = decode_key_hex(private_hex)?;
    let public_key = decode_key_hex(public_hex)?;

    let keypair = KeyPair::from_secret_bytes(&private_key)?;
    let declared = parse_public_key(&public_key)?;
    if declared != keypair.public_key {
        warn!("Public key does not match the private key; submissions will be rejected");
    }
    Ok((private_key, public_key))
}

/// Prints `label`, reads one line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
