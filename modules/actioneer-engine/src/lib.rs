pub mod catalog;
pub mod evaluator;
pub mod matcher;
pub mod performer;
pub mod queue;
pub mod reaction;
pub mod supersede;

pub use catalog::{CachedCatalog, CatalogSnapshot, CatalogStore, FileCatalog, MemoryCatalog};
pub use evaluator::{evaluate_match, process_batch, EvaluationOutcome, RecordResult};
pub use matcher::actions_to_take;
pub use performer::{perform_label_action, ActionPerformer, PerformerRegistry};
pub use queue::{MemoryQueue, OutboundQueue};
pub use reaction::{ReactionPolicy, StaticReactionPolicy};
pub use supersede::{remove_superseded, Resolution, SupersessionConflict};
