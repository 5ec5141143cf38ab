use std::sync::Arc;

use tokio::sync::mpsc;

use crate::git::{DiffQuery, VcsClient};

use super::channel::{DiffRequest, DiffResult};

/// Runs change-list queries off the UI task.
pub struct DiffWorker {
    request_tx: mpsc::UnboundedSender<DiffRequest>,
    result_rx: mpsc::UnboundedReceiver<DiffResult>,
}

impl DiffWorker {
    pub fn new(client: Arc<dyn VcsClient>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<DiffRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<DiffResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let client = Arc::clone(&client);
                let tx = result_tx.clone();

                tokio::task::spawn_blocking(move || {
                    let options = request.options;
                    let query = DiffQuery {
                        range: options.range.clone(),
                        scope: options.scope.clone(),
                    };
                    let entries = client
                        .diff(&options.repository, &query)
                        .map_err(|e| format!("{e:#}"));
                    if let Err(ref e) = entries {
                        tracing::warn!(generation = request.generation, error = %e, "diff failed");
                    }
                    let _ = tx.send(DiffResult {
                        generation: request.generation,
                        entries,
                    });
                });
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    pub fn request(&self, req: DiffRequest) {
        tracing::debug!(generation = req.generation, "requesting change list");
        let _ = self.request_tx.send(req);
    }

    pub fn try_recv(&mut self) -> Option<DiffResult> {
        self.result_rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::types::{ChangeEntry, FileStatus};
    use crate::state::DiffOptions;
    use crate::uri::ResourceUri;
    use anyhow::Result;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    struct FixedClient;

    impl VcsClient for FixedClient {
        fn diff(&self, repository: &Path, _query: &DiffQuery) -> Result<Vec<ChangeEntry>> {
            if repository.ends_with("broken") {
                anyhow::bail!("no repository");
            }
            Ok(vec![ChangeEntry {
                uri: ResourceUri::file(&repository.join("a.txt")),
                old_uri: None,
                status: FileStatus::Modified,
            }])
        }
    }

    async fn next_result(worker: &mut DiffWorker) -> DiffResult {
        for _ in 0..200 {
            if let Some(result) = worker.try_recv() {
                return result;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("worker produced no result");
    }

    #[tokio::test]
    async fn results_carry_request_generation() {
        let mut worker = DiffWorker::new(Arc::new(FixedClient));
        worker.request(DiffRequest {
            generation: 7,
            options: DiffOptions::new(PathBuf::from("/repo")),
        });
        let result = next_result(&mut worker).await;
        assert_eq!(result.generation, 7);
        assert_eq!(result.entries.unwrap().len(), 1);

        worker.request(DiffRequest {
            generation: 8,
            options: DiffOptions::new(PathBuf::from("/broken")),
        });
        let result = next_result(&mut worker).await;
        assert_eq!(result.generation, 8);
        assert_eq!(result.entries.unwrap_err(), "no repository");
    }
}
