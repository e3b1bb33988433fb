mod completion;
mod materialize;
mod partition;
mod reassemble;

pub use completion::{ensure_open, mark_done, CompletionBoard, GroupStatus};
pub use materialize::{label_records, materialize_groups};
pub use partition::{partition, total_groups, GroupAssignment, SplitLayout};
pub use reassemble::reassemble;
