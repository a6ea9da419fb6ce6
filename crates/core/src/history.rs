//! 실행 이력 저장소 — 평가 결과를 JSON Lines 파일에 누적합니다.
//!
//! 평가 한 번마다 [`JobRecord`] 한 줄을 추가합니다. 성공이든 실패든 기록하며,
//! 파일이 없으면 첫 기록 시 상위 디렉토리와 함께 생성합니다.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::StorageError;
use crate::types::JobRecord;

/// 실행 이력 저장소 trait
pub trait HistoryStore: Send + Sync {
    /// 레코드 하나를 추가합니다.
    fn append(&self, record: &JobRecord) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// 기록된 순서대로 모든 레코드를 읽습니다.
    fn read_all(&self) -> impl Future<Output = Result<Vec<JobRecord>, StorageError>> + Send;
}

/// JSON Lines 파일 기반 이력 저장소
#[derive(Debug, Clone)]
pub struct JsonlHistoryStore {
    path: PathBuf,
}

impl JsonlHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonlHistoryStore {
    async fn append(&self, record: &JobRecord) -> Result<(), StorageError> {
        let mut line =
            serde_json::to_string(record).map_err(|e| StorageError::Write(e.to_string()))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Write(format!("{}: {e}", parent.display())))?;
        }

        let write_failed = |e: std::io::Error| StorageError::Write(format!("{}: {e}", self.path.display()));
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_failed)?;
        file.write_all(line.as_bytes()).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;

        debug!(
            path = %self.path.display(),
            run_id = %record.run_id,
            "job record appended"
        );
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<JobRecord>, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Read(format!("{}: {e}", self.path.display())));
            }
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    StorageError::Read(format!(
                        "{} line {}: {e}",
                        self.path.display(),
                        index + 1
                    ))
                })
            })
            .collect()
    }
}
