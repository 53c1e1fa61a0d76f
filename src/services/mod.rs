pub mod enrichment;
pub mod recommendation;
pub mod sync_history;
pub mod trekking;
