//! Content pipeline
//!
//! Orchestrates search -> structure -> generate -> persist for one topic,
//! plus the batch driver that iterates a topic list.

mod batch;
mod workflow;

pub use batch::{run_batch, BatchOptions, BatchReport, DEFAULT_TOPICS};
pub use workflow::{
    ContentPipeline, RecordOutcome, RecordStatus, TopicReport, TopicStatus,
};
