// Debug logging module for asynchronous AI decision logging
//
// Fire-and-forget writes keep the tick handler from blocking on disk.
// Each AI decision becomes one line of a JSONL file.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::Difficulty;
use crate::policy::{Decision, DecisionReason};
use crate::types::{Coord, Direction};

/// Represents a single debug log entry
#[derive(Debug, Clone, Serialize)]
pub struct DecisionLogEntry {
    pub tick: u64,
    pub difficulty: Difficulty,
    pub ai_move: Direction,
    pub reason: DecisionReason,
    pub ai_head: Coord,
    pub food: Coord,
    pub timestamp: String,
}

impl DecisionLogEntry {
    pub fn new(tick: u64, difficulty: Difficulty, decision: Decision, ai_head: Coord, food: Coord) -> Self {
        DecisionLogEntry {
            tick,
            difficulty,
            ai_move: decision.direction,
            reason: decision.reason,
            ai_head,
            food,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> so spawned writers append in turn
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs an AI decision without waiting for the write
    /// Must be called from inside a tokio runtime
    pub fn log_decision(&self, entry: DecisionLogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Logs an AI decision and waits until it is flushed
    pub async fn log_decision_now(&self, entry: DecisionLogEntry) {
        if !self.enabled {
            return;
        }
        Self::write_entry(self.file.clone(), entry).await;
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DecisionLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}
