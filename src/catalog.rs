//! Ranking of the model catalog.
//!
//! Every stage keeps the relative order of its input, so the pipeline can be
//! rerun on its own output without changing it.

use crate::providers::ModelDescriptor;

/// Number of models shown per report.
pub const TOP_N: usize = 10;

const TEXT: &str = "text";

/// Accepts and produces text.
pub fn has_text_io(model: &ModelDescriptor) -> bool {
    let arch = &model.architecture;
    arch.input_modalities.iter().any(|m| m == TEXT)
        && arch.output_modalities.iter().any(|m| m == TEXT)
}

/// Catalogs use -1 (or lower) for routers whose price is unknown in advance.
pub fn has_known_pricing(model: &ModelDescriptor) -> bool {
    model.pricing.prompt > -1.0
}

pub fn is_free(model: &ModelDescriptor) -> bool {
    model.pricing.prompt == 0.0 && model.pricing.completion == 0.0
}

/// Stable sort, largest context first.
pub fn sort_by_context_length(models: &mut [ModelDescriptor]) {
    models.sort_by(|a, b| b.context_length.cmp(&a.context_length));
}

/// Text-capable, priced models ordered by context length. Covers the whole catalog;
/// callers truncate for display.
pub fn rank(models: Vec<ModelDescriptor>) -> Vec<ModelDescriptor> {
    let mut ranked: Vec<ModelDescriptor> = models
        .into_iter()
        .filter(has_text_io)
        .filter(has_known_pricing)
        .collect();
    sort_by_context_length(&mut ranked);
    ranked
}

/// Free models taken from an already ranked list, keeping its order.
pub fn free_tier(ranked: &[ModelDescriptor]) -> Vec<ModelDescriptor> {
    ranked.iter().filter(|m| is_free(m)).cloned().collect()
}
