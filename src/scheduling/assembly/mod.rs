mod result_assembler;
mod schedule;

pub use result_assembler::ResultAssembler;
pub use schedule::{Schedule, ScheduleDecision, ScheduleViolation, UnselectedRequest};
