//! Derived dataset and output locations.

const ENTITY_EMBEDDING_ROOT: &str = "data/entity_emb";
const WIKIPEDIA_DATASET_ROOT: &str = "data/wikipedia";
const RUNS_ROOT: &str = "runs";

/// Everything after the first `/` of a model id (`org/model` -> `model`).
/// Ids without a separator are returned unchanged.
pub fn dir_name_suffix(model_name_or_path: &str) -> &str {
    model_name_or_path
        .split_once('/')
        .map(|(_, rest)| rest)
        .unwrap_or(model_name_or_path)
}

/// Entity embeddings are always built from English Wikipedia.
pub fn default_entity_embedding_dir(suffix: &str) -> String {
    format!("{ENTITY_EMBEDDING_ROOT}/en_{suffix}")
}

pub fn default_wikipedia_dataset_dir(language: &str, suffix: &str) -> String {
    format!("{WIKIPEDIA_DATASET_ROOT}/{language}_{suffix}")
}

pub fn default_output_dir(run_name: &str) -> String {
    format!("{RUNS_ROOT}/{run_name}")
}
