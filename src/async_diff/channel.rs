use crate::git::types::ChangeEntry;
use crate::state::DiffOptions;

#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub generation: u64,
    pub options: DiffOptions,
}

#[derive(Debug)]
pub struct DiffResult {
    pub generation: u64,
    pub entries: Result<Vec<ChangeEntry>, String>,
}
