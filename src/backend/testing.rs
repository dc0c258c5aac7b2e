// src/backend/testing.rs

//! Recording fakes for backend tests

use crate::error::{Error, Result};
use crate::repository::{RepositoryProbe, SigningKey};
use crate::system::{CommandLine, CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::collections::HashSet;

/// Answers `capture` from canned outputs keyed by leading words
pub(crate) struct FakeRunner {
    responses: Vec<(Vec<String>, CommandOutput)>,
    captures: RefCell<Vec<CommandLine>>,
    runs: RefCell<Vec<CommandLine>>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self {
            responses: Vec::new(),
            captures: RefCell::new(Vec::new()),
            runs: RefCell::new(Vec::new()),
        }
    }

    /// Reply with `output` to any capture whose words start with `prefix`
    pub(crate) fn respond(mut self, prefix: &[&str], output: CommandOutput) -> Self {
        self.responses
            .push((prefix.iter().map(|w| w.to_string()).collect(), output));
        self
    }

    pub(crate) fn captures(&self) -> Vec<CommandLine> {
        self.captures.borrow().clone()
    }

    pub(crate) fn runs(&self) -> Vec<CommandLine> {
        self.runs.borrow().clone()
    }
}

fn words(cmd: &CommandLine) -> Vec<&str> {
    std::iter::once(cmd.program.as_str())
        .chain(cmd.args.iter().map(String::as_str))
        .collect()
}

impl CommandRunner for FakeRunner {
    fn capture(&self, cmd: &CommandLine) -> Result<CommandOutput> {
        self.captures.borrow_mut().push(cmd.clone());
        let words = words(cmd);
        let output = self
            .responses
            .iter()
            .find(|(prefix, _)| {
                prefix.len() <= words.len() && prefix.iter().zip(&words).all(|(p, w)| p == w)
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));
        Ok(output)
    }

    fn run(&self, cmd: &CommandLine) -> Result<()> {
        self.runs.borrow_mut().push(cmd.clone());
        Ok(())
    }
}

/// Serves a fixed set of URLs and a dummy key
pub(crate) struct FakeRepository {
    existing: HashSet<String>,
    probed: RefCell<Vec<String>>,
}

impl FakeRepository {
    pub(crate) fn serving(urls: &[&str]) -> Self {
        Self {
            existing: urls.iter().map(|u| u.to_string()).collect(),
            probed: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

impl RepositoryProbe for FakeRepository {
    fn exists(&self, url: &str) -> Result<bool> {
        self.probed.borrow_mut().push(url.to_string());
        Ok(self.existing.contains(url))
    }

    fn fetch_key(&self, url: &str) -> Result<SigningKey> {
        self.probed.borrow_mut().push(url.to_string());
        if url.ends_with("/gpg") {
            Ok(SigningKey {
                fingerprint: "0123456789ABCDEF".to_string(),
                data: b"-----BEGIN PGP PUBLIC KEY BLOCK-----".to_vec(),
            })
        } else {
            Err(Error::Download(format!("no key at {}", url)))
        }
    }
}
