//! Shared collection and lock-aware command execution

use super::{Command, CommandOutput, ShellConfig, ShellResult};
use crate::collection::GraphCollection;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A collection shared between tasks
pub type SharedCollection = Arc<RwLock<GraphCollection>>;

/// One interactive session over a shared collection
pub struct Session {
    config: ShellConfig,
    collection: SharedCollection,
}

impl Session {
    /// Start a session over an empty collection
    pub fn new(config: ShellConfig) -> Self {
        Self::with_collection(config, Arc::new(RwLock::new(GraphCollection::new())))
    }

    /// Start a session over an existing shared collection
    pub fn with_collection(config: ShellConfig, collection: SharedCollection) -> Self {
        Self { config, collection }
    }

    /// Start a session, loading the configured startup file if any
    pub fn open(config: ShellConfig) -> ShellResult<Self> {
        let collection = match &config.startup_file {
            Some(path) => {
                let collection = GraphCollection::from_file(path)?;
                info!(
                    "Startup file {} provided {} graph(s)",
                    path.display(),
                    collection.len()
                );
                collection
            }
            None => GraphCollection::new(),
        };
        Ok(Self::with_collection(
            config,
            Arc::new(RwLock::new(collection)),
        ))
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn collection(&self) -> SharedCollection {
        Arc::clone(&self.collection)
    }

    /// Parse and run one line
    ///
    /// Mutating commands take the write lock; everything else shares the
    /// read lock.
    pub async fn execute(&self, line: &str) -> ShellResult<CommandOutput> {
        let Some(command) = Command::parse(line)? else {
            return Ok(CommandOutput::Empty);
        };

        if command.is_mutation() {
            debug!(verb = command.verb(), "taking write lock");
            let mut guard = self.collection.write().await;
            command.execute(&mut guard)
        } else {
            let guard = self.collection.read().await;
            command.query(&guard)
        }
    }
}
